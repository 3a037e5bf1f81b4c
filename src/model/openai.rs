//! Backend for servers speaking the OpenAI `/chat/completions` protocol.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::client::{extract_reply, ChatRequest, InferenceBackend, InferenceError, ModelConfig};

/// Client for OpenAI-compatible chat completion endpoints.
pub struct OpenAiBackend {
    client: Client,
    url: String,
    api_key: String,
    model_id: String,
}

impl OpenAiBackend {
    /// Create a backend from the model configuration.
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model_id: config.model_id.clone(),
        }
    }

    /// Full URL requests are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl InferenceBackend for OpenAiBackend {
    async fn send(&self, prompt: &str, temperature: f32) -> Result<String, InferenceError> {
        let body = ChatRequest::user(prompt, temperature).with_model(&self.model_id);
        debug!(url = %self.url, model = %self.model_id, "posting chat completion");

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        extract_reply(&bytes)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
