//! Shared model configuration, wire types and the backend capability trait.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default Bedrock model identifier.
pub const DEFAULT_MODEL_ID: &str = "ai21.jamba-1-5-mini-v1:0";

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default upper bound on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default base URL for OpenAI-compatible endpoints.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/v1";

/// Errors raised while invoking a backend or decoding its reply.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Bedrock invocation failed: {0}")]
    Sdk(String),
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("No choices in response")]
    NoChoices,
    #[error("First choice has no message content")]
    MissingContent,
}

/// Which remote service answers the prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// AWS Bedrock `InvokeModel`.
    #[default]
    Bedrock,
    /// Any server exposing `/chat/completions`.
    OpenAi,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bedrock" | "aws" => Ok(Self::Bedrock),
            "openai" | "openai-compatible" => Ok(Self::OpenAi),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bedrock => f.write_str("bedrock"),
            Self::OpenAi => f.write_str("openai"),
        }
    }
}

/// Immutable per-session model configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub backend: BackendKind,
    pub model_id: String,
    pub region: String,
    /// Upper bound hint for the reply length. Not part of the request body.
    pub max_tokens: u32,
    pub temperature: f32,
    /// Only used by [`BackendKind::OpenAi`].
    pub base_url: String,
    /// Only used by [`BackendKind::OpenAi`].
    pub api_key: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Bedrock,
            model_id: DEFAULT_MODEL_ID.to_string(),
            region: DEFAULT_REGION.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: "EMPTY".to_string(),
        }
    }
}

impl ModelConfig {
    /// Select the backend.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Set the model identifier.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Set the service region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the base URL of an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the bearer key of an OpenAI-compatible server.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }
}

/// One chat message in the request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Request body: a single user message plus temperature.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
}

impl<'a> ChatRequest<'a> {
    /// Wrap a composed prompt as the only user message.
    pub fn user(prompt: &'a str, temperature: f32) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            model: None,
        }
    }

    /// Name the model inside the body (OpenAI-compatible servers need it).
    pub fn with_model(mut self, model: &'a str) -> Self {
        self.model = Some(model);
        self
    }
}

/// Chat completion response structures.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

/// Pull `choices[0].message.content` out of a raw response body.
///
/// The text is returned as sent by the model, without trimming.
pub fn extract_reply(body: &[u8]) -> Result<String, InferenceError> {
    let completion: ChatCompletionResponse =
        serde_json::from_slice(body).map_err(|e| InferenceError::ParseError(e.to_string()))?;

    let first = completion
        .choices
        .into_iter()
        .next()
        .ok_or(InferenceError::NoChoices)?;

    first.message.content.ok_or(InferenceError::MissingContent)
}

/// Capability interface of a remote model: one prompt in, one reply out.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Send a composed prompt and return the raw reply text.
    async fn send(&self, prompt: &str, temperature: f32) -> Result<String, InferenceError>;

    /// Short human-readable name used in logs.
    fn name(&self) -> &str;
}
