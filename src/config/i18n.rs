//! Internationalization (i18n) module for console messages.

/// Console messages and prompt labels for one language.
#[derive(Debug, Clone)]
pub struct Messages {
    pub greeting: &'static str,
    pub farewell: &'static str,
    pub user_label: &'static str,
    pub assistant_label: &'static str,
    pub error_label: &'static str,
    /// Header placed before the transcript inside the composed prompt.
    pub history_label: &'static str,
    /// Exact input that ends the interactive session.
    pub sentinel: &'static str,
}

/// Korean messages
pub static MESSAGES_KO: Messages = Messages {
    greeting: "AI 텍스트 생성기 시작. '종료'를 입력하면 종료합니다.",
    farewell: "텍스트 생성기를 종료합니다.",
    user_label: "사용자: ",
    assistant_label: "AI: ",
    error_label: "오류 발생: ",
    history_label: "대화 히스토리:",
    sentinel: "종료",
};

/// English messages
pub static MESSAGES_EN: Messages = Messages {
    greeting: "AI text generator started. Type 'exit' to quit.",
    farewell: "Closing the text generator.",
    user_label: "User: ",
    assistant_label: "AI: ",
    error_label: "Error: ",
    history_label: "conversation history:",
    sentinel: "exit",
};

/// Get console messages by language.
///
/// # Arguments
/// * `lang` - Language code, "ko" for Korean, "en" for English.
///
/// # Returns
/// Reference to Messages struct.
pub fn get_messages(lang: &str) -> &'static Messages {
    match lang {
        "en" => &MESSAGES_EN,
        _ => &MESSAGES_KO,
    }
}
