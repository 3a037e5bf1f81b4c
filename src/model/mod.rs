//! Model backends for remote inference.

mod bedrock;
mod client;
mod openai;

pub use bedrock::BedrockBackend;
pub use client::{
    extract_reply, BackendKind, ChatMessage, ChatRequest, InferenceBackend, InferenceError,
    ModelConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID, DEFAULT_REGION,
    DEFAULT_TEMPERATURE,
};
pub use openai::OpenAiBackend;

use tracing::info;

use crate::settings::{AwsCredentials, ConfigError};

/// Construct the backend selected by `config.backend`.
///
/// Bedrock requires credentials; a credential error is returned as-is
/// before any client is built or any request is sent. Other backends
/// ignore it.
pub async fn connect_backend(
    config: &ModelConfig,
    credentials: Result<&AwsCredentials, ConfigError>,
) -> Result<Box<dyn InferenceBackend>, ConfigError> {
    info!(backend = %config.backend, model = %config.model_id, "connecting inference backend");
    match config.backend {
        BackendKind::Bedrock => {
            let credentials = credentials?;
            Ok(Box::new(BedrockBackend::connect(config, credentials).await))
        }
        BackendKind::OpenAi => Ok(Box::new(OpenAiBackend::new(config))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppSettings;

    #[tokio::test]
    async fn test_bedrock_without_credentials_fails_eagerly() {
        let settings = AppSettings::from_lookup(|_| None).unwrap();
        let result = connect_backend(&settings.model, settings.aws_credentials()).await;
        match result {
            Err(ConfigError::MissingCredentials(vars)) => {
                assert_eq!(vars, vec!["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"]);
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("bedrock backend built without credentials"),
        }
    }

    #[tokio::test]
    async fn test_bedrock_error_names_only_the_missing_secret() {
        let settings = AppSettings::from_lookup(|key| {
            (key == "AWS_ACCESS_KEY_ID").then(|| "AKIA".to_string())
        })
        .unwrap();
        let result = connect_backend(&settings.model, settings.aws_credentials()).await;
        match result {
            Err(ConfigError::MissingCredentials(vars)) => {
                assert_eq!(vars, vec!["AWS_SECRET_ACCESS_KEY"]);
                assert_eq!(
                    ConfigError::MissingCredentials(vars).to_string(),
                    "missing required credentials: AWS_SECRET_ACCESS_KEY"
                );
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("bedrock backend built without a secret key"),
        }
    }

    #[tokio::test]
    async fn test_openai_needs_no_aws_credentials() {
        let config = ModelConfig::default().with_backend(BackendKind::OpenAi);
        let missing = Err(ConfigError::MissingCredentials(
            AwsCredentials::REQUIRED_VARS.to_vec(),
        ));
        let backend = connect_backend(&config, missing).await.unwrap();
        assert_eq!(backend.name(), "openai");
    }
}
