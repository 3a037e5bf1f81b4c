//! AWS Bedrock `InvokeModel` backend.
//!
//! Transport, request signing and endpoint resolution are delegated to the
//! AWS SDK. This module only shapes the body and decodes the reply.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::config::Credentials;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use tracing::debug;

use super::client::{extract_reply, ChatRequest, InferenceBackend, InferenceError, ModelConfig};
use crate::settings::AwsCredentials;

const PROVIDER_NAME: &str = "bedrock-chat";

/// Bedrock runtime client bound to one model and region.
pub struct BedrockBackend {
    client: Client,
    model_id: String,
}

impl BedrockBackend {
    /// Build an SDK client from explicit credentials.
    pub async fn connect(config: &ModelConfig, credentials: &AwsCredentials) -> Self {
        let provider = Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            credentials.session_token.clone(),
            None,
            PROVIDER_NAME,
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(provider)
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
            model_id: config.model_id.clone(),
        }
    }
}

#[async_trait]
impl InferenceBackend for BedrockBackend {
    async fn send(&self, prompt: &str, temperature: f32) -> Result<String, InferenceError> {
        let body = serde_json::to_vec(&ChatRequest::user(prompt, temperature))
            .map_err(|e| InferenceError::ParseError(e.to_string()))?;
        debug!(model = %self.model_id, bytes = body.len(), "invoking bedrock model");

        let output = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| InferenceError::Sdk(DisplayErrorContext(&e).to_string()))?;

        extract_reply(output.body().as_ref())
    }

    fn name(&self) -> &str {
        "bedrock"
    }
}
