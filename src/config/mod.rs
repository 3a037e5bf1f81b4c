//! Localized console strings and default prompts.

mod i18n;
mod prompts;

pub use i18n::{get_messages, Messages, MESSAGES_EN, MESSAGES_KO};
pub use prompts::{get_system_prompt, SYSTEM_PROMPT_EN, SYSTEM_PROMPT_KO};
