//! Default system instructions for the interactive loop.

pub const SYSTEM_PROMPT_KO: &str = "너는 친절하고 도움이 되는 AI 어시스턴트야.";

pub const SYSTEM_PROMPT_EN: &str = "You are a kind and helpful AI assistant.";

/// Get the default system instruction for a language.
pub fn get_system_prompt(lang: &str) -> &'static str {
    match lang {
        "en" => SYSTEM_PROMPT_EN,
        _ => SYSTEM_PROMPT_KO,
    }
}
