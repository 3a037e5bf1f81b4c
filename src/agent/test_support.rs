//! Scripted backend shared by the agent tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::model::{InferenceBackend, InferenceError};

/// Replays canned replies and records every prompt it receives.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, InferenceError>>>,
    pub calls: Arc<Mutex<Vec<(String, f32)>>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<String, InferenceError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }
}

#[async_trait]
impl InferenceBackend for ScriptedBackend {
    async fn send(&self, prompt: &str, temperature: f32) -> Result<String, InferenceError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), temperature));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(InferenceError::NoChoices))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
