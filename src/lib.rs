// Copyright 2025 ModerRAS
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Bedrock Chat
//!
//! A small chat client for hosted large-language-model endpoints.
//!
//! Each turn flattens an optional system instruction, the running
//! transcript and the new input into one prompt, sends it as a single user
//! message, and records the reply. AWS Bedrock (AI21 Jamba by default) and
//! OpenAI-compatible servers are supported as backends.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bedrock_chat::{AppSettings, ChatSession};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = AppSettings::from_env()?;
//!     let mut session = ChatSession::connect(&settings).await?;
//!
//!     let reply = session.generate("Hello!", None).await?;
//!     println!("AI: {}", reply);
//!
//!     // The next prompt carries the previous exchange as history.
//!     let reply = session.generate("What did I just say?", None).await?;
//!     println!("AI: {}", reply);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod config;
pub mod model;
pub mod settings;

pub use agent::{compose_prompt, run_interactive, ChatHistory, ChatSession, Turn, TurnError};
pub use config::{get_messages, get_system_prompt, Messages};
pub use model::{
    connect_backend, BackendKind, BedrockBackend, InferenceBackend, InferenceError, ModelConfig,
    OpenAiBackend,
};
pub use settings::{AppSettings, AwsCredentials, ConfigError};
