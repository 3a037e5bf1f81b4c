//! Chat session: prompt composition, model invocation and transcript upkeep.

use tracing::{debug, warn};

use super::history::{ChatHistory, Turn};
use crate::config::get_messages;
use crate::model::{connect_backend, InferenceBackend, InferenceError, ModelConfig};
use crate::settings::{AppSettings, ConfigError};

/// Flatten a system instruction, prior turns and a new input into one prompt.
///
/// The layout is:
///
/// ```text
/// {system}\n                 (only when a non-empty system instruction is given)
/// {history_label}\n          (only when there are prior turns)
/// Human: ...\nAssistant: ...\n
/// Human: {prompt}\nAssistant:
/// ```
pub fn compose_prompt(
    system_prompt: Option<&str>,
    history_label: &str,
    turns: &[Turn],
    prompt: &str,
) -> String {
    let mut composed = String::new();

    if let Some(system) = system_prompt.filter(|s| !s.is_empty()) {
        composed.push_str(system);
        composed.push('\n');
    }

    if !turns.is_empty() {
        composed.push_str(history_label);
        composed.push('\n');
        for turn in turns {
            composed.push_str(&turn.to_string());
            composed.push('\n');
        }
    }

    composed.push_str("Human: ");
    composed.push_str(prompt);
    composed.push_str("\nAssistant:");
    composed
}

/// A conversation with a remote model.
///
/// Every successful [`generate`](ChatSession::generate) call records the
/// exchange; failed calls leave the transcript untouched.
///
/// # Example
///
/// ```rust,no_run
/// use bedrock_chat::{AppSettings, ChatSession};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let settings = AppSettings::from_env()?;
///     let mut session = ChatSession::connect(&settings).await?;
///
///     let reply = session.generate("안녕?", Some("Be brief.")).await?;
///     println!("{}", reply);
///     Ok(())
/// }
/// ```
pub struct ChatSession {
    backend: Box<dyn InferenceBackend>,
    config: ModelConfig,
    history: ChatHistory,
    history_label: &'static str,
}

impl ChatSession {
    /// Create a session over an already constructed backend.
    pub fn new(backend: Box<dyn InferenceBackend>, config: ModelConfig) -> Self {
        Self {
            backend,
            config,
            history: ChatHistory::new(),
            history_label: get_messages("ko").history_label,
        }
    }

    /// Build the configured backend and a session around it.
    ///
    /// Fails with [`ConfigError::MissingCredentials`] before any network
    /// activity when the Bedrock backend is selected without credentials.
    pub async fn connect(settings: &AppSettings) -> Result<Self, ConfigError> {
        let backend = connect_backend(&settings.model, settings.aws_credentials()).await?;
        Ok(Self::new(backend, settings.model.clone())
            .with_history_label(get_messages(&settings.lang).history_label)
            .with_history_limit(settings.history_limit))
    }

    /// Override the label placed before the transcript.
    pub fn with_history_label(mut self, label: &'static str) -> Self {
        self.history_label = label;
        self
    }

    /// Keep at most `limit` exchanges (None = unbounded).
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history = ChatHistory::with_limit(limit);
        self
    }

    /// Compose the prompt the next call would send for `prompt`.
    pub fn compose(&self, prompt: &str, system_prompt: Option<&str>) -> String {
        compose_prompt(system_prompt, self.history_label, self.history.turns(), prompt)
    }

    /// Send `prompt` to the model and record the exchange.
    ///
    /// # Arguments
    /// * `prompt` - The user's input line.
    /// * `system_prompt` - Optional instruction placed before the transcript.
    ///   It is not stored in the history.
    ///
    /// # Returns
    /// The reply with surrounding whitespace trimmed. The history keeps the
    /// reply exactly as the model sent it.
    pub async fn generate(
        &mut self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, InferenceError> {
        let composed = self.compose(prompt, system_prompt);
        debug!(
            backend = self.backend.name(),
            chars = composed.chars().count(),
            turns = self.history.len(),
            "sending composed prompt"
        );

        let reply = self.backend.send(&composed, self.config.temperature).await?;
        self.history.record_exchange(prompt, reply.as_str());

        Ok(reply.trim().to_string())
    }

    /// Like [`generate`](ChatSession::generate), but logs failures and
    /// returns an empty string instead.
    pub async fn generate_or_empty(&mut self, prompt: &str, system_prompt: Option<&str>) -> String {
        match self.generate(prompt, system_prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "text generation failed");
                String::new()
            }
        }
    }

    /// Recorded turns, oldest first.
    pub fn history(&self) -> &[Turn] {
        self.history.turns()
    }

    /// Forget all recorded turns.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Configuration the session was created with.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}
