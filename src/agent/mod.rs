//! Chat session state and the interactive loop.

mod chat;
mod history;
mod interactive;
#[cfg(test)]
pub(crate) mod test_support;

pub use chat::{compose_prompt, ChatSession};
pub use history::{ChatHistory, Turn};
pub use interactive::{run_interactive, TurnError};
