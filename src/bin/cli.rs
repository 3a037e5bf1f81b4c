//! Bedrock Chat - interactive console chat with a hosted model
//!
//! This is the CLI entry point for the bedrock-chat tool.
//! Run with: cargo run --bin bedrock-chat

use std::io;

use anyhow::Context;
use bedrock_chat::model::BackendKind;
use bedrock_chat::settings::{validate_history_limit, validate_lang, validate_temperature};
use bedrock_chat::{
    get_messages, get_system_prompt, run_interactive, AppSettings, ChatSession, ConfigError,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Command line overrides. Anything not given falls back to the environment.
#[derive(Parser, Debug)]
#[command(name = "bedrock-chat", version, about = "Chat with a hosted LLM from the console")]
struct Cli {
    /// Backend to use: "bedrock" or "openai"
    #[arg(long)]
    backend: Option<String>,

    /// Model identifier
    #[arg(long)]
    model: Option<String>,

    /// AWS region for the Bedrock backend
    #[arg(long)]
    region: Option<String>,

    /// Maximum output tokens
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Base URL of an OpenAI-compatible server
    #[arg(long)]
    base_url: Option<String>,

    /// Console language: "ko" or "en"
    #[arg(long)]
    lang: Option<String>,

    /// System instruction sent with every turn
    #[arg(long)]
    system_prompt: Option<String>,

    /// Keep only the newest N exchanges in the prompt
    #[arg(long)]
    history_limit: Option<usize>,

    /// Ask a single question and exit instead of starting the loop
    prompt: Vec<String>,
}

impl Cli {
    fn apply(self, mut settings: AppSettings) -> anyhow::Result<(AppSettings, Option<String>)> {
        if let Some(backend) = self.backend {
            let kind = backend
                .parse::<BackendKind>()
                .map_err(ConfigError::UnknownBackend)?;
            settings.model = settings.model.with_backend(kind);
        }
        if let Some(model) = self.model {
            settings.model = settings.model.with_model_id(model);
        }
        if let Some(region) = self.region {
            settings.model = settings.model.with_region(region);
        }
        if let Some(max_tokens) = self.max_tokens {
            settings.model = settings.model.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            settings.model = settings
                .model
                .with_temperature(validate_temperature(temperature)?);
        }
        if let Some(base_url) = self.base_url {
            settings.model = settings.model.with_base_url(base_url);
        }
        if let Some(lang) = self.lang {
            settings.lang = validate_lang(&lang)?;
        }
        if let Some(system_prompt) = self.system_prompt {
            settings.system_prompt = Some(system_prompt);
        }
        if let Some(limit) = self.history_limit {
            settings.history_limit = Some(validate_history_limit(limit)?);
        }

        let one_shot = if self.prompt.is_empty() {
            None
        } else {
            Some(self.prompt.join(" "))
        };
        Ok((settings, one_shot))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with replies
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = AppSettings::from_env().context("failed to load settings")?;
    let (settings, one_shot) = cli.apply(settings)?;

    let mut session = ChatSession::connect(&settings)
        .await
        .context("failed to create chat session")?;

    let messages = get_messages(&settings.lang);
    let system_prompt = settings
        .system_prompt
        .clone()
        .unwrap_or_else(|| get_system_prompt(&settings.lang).to_string());

    if let Some(prompt) = one_shot {
        let reply = session.generate(&prompt, Some(&system_prompt)).await?;
        println!("{}{}", messages.assistant_label, reply);
        return Ok(());
    }

    let stdin = io::stdin();
    run_interactive(
        &mut session,
        Some(&system_prompt),
        messages,
        stdin.lock(),
        io::stdout(),
    )
    .await?;

    Ok(())
}
