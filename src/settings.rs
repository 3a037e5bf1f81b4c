//! Settings for the chat client.
//!
//! Values come from the process environment, falling back to an optional
//! `.env` file in the working directory. The `.env` file is read with
//! [`dotenvy::dotenv_iter`], so nothing is ever written back into the
//! process environment.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{BackendKind, ModelConfig};

/// Configuration errors. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown backend {0:?} (expected \"bedrock\" or \"openai\")")]
    UnknownBackend(String),
}

/// Static AWS credentials handed explicitly to the Bedrock client.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AwsCredentials {
    /// Variables that must be present and non-empty.
    pub const REQUIRED_VARS: [&'static str; 2] = ["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"];

    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Read credentials through `lookup`, listing every missing variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let access_key_id = non_empty(Self::REQUIRED_VARS[0]);
        let secret_access_key = non_empty(Self::REQUIRED_VARS[1]);

        match (access_key_id, secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Ok(Self {
                access_key_id,
                secret_access_key,
                session_token: non_empty("AWS_SESSION_TOKEN"),
            }),
            (id, secret) => {
                let mut missing = Vec::new();
                if id.is_none() {
                    missing.push(Self::REQUIRED_VARS[0]);
                }
                if secret.is_none() {
                    missing.push(Self::REQUIRED_VARS[1]);
                }
                Err(ConfigError::MissingCredentials(missing))
            }
        }
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Application settings resolved at startup.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Model and backend selection.
    pub model: ModelConfig,
    /// AWS credentials, when both required variables are set.
    pub credentials: Option<AwsCredentials>,
    /// Required AWS variables that were absent or empty.
    pub missing_credentials: Vec<&'static str>,
    /// Language code ("ko" or "en").
    pub lang: String,
    /// System instruction for the interactive loop (None = localized default).
    pub system_prompt: Option<String>,
    /// Number of turn pairs to keep (None = unbounded).
    pub history_limit: Option<usize>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            credentials: None,
            missing_credentials: AwsCredentials::REQUIRED_VARS.to_vec(),
            lang: "ko".to_string(),
            system_prompt: None,
            history_limit: None,
        }
    }
}

impl AppSettings {
    /// Load settings from the process environment and `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let dotenv = match dotenvy::dotenv_iter() {
            Ok(iter) => collect_dotenv(iter),
            Err(_) => HashMap::new(),
        };
        debug!(entries = dotenv.len(), "read .env entries");

        Self::from_lookup(|key| env::var(key).ok().or_else(|| dotenv.get(key).cloned()))
    }

    /// Resolve settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ModelConfig::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get("CHAT_BACKEND") {
            Some(raw) => raw
                .parse::<BackendKind>()
                .map_err(ConfigError::UnknownBackend)?,
            None => defaults.backend,
        };

        let region = get("AWS_REGION")
            .or_else(|| get("AWS_DEFAULT_REGION"))
            .unwrap_or(defaults.region);

        let model = ModelConfig {
            backend,
            model_id: get("CHAT_MODEL_ID").unwrap_or(defaults.model_id),
            region,
            max_tokens: parse_var(&get, "CHAT_MAX_TOKENS")?.unwrap_or(defaults.max_tokens),
            temperature: match parse_var::<f32, _>(&get, "CHAT_TEMPERATURE")? {
                Some(t) => validate_temperature(t)?,
                None => defaults.temperature,
            },
            base_url: get("CHAT_BASE_URL").unwrap_or(defaults.base_url),
            api_key: get("CHAT_API_KEY").unwrap_or(defaults.api_key),
        };

        let lang = match get("CHAT_LANG") {
            Some(lang) => validate_lang(&lang)?,
            None => "ko".to_string(),
        };

        let history_limit = match parse_var::<usize, _>(&get, "CHAT_HISTORY_LIMIT")? {
            Some(limit) => Some(validate_history_limit(limit)?),
            None => None,
        };

        let (credentials, missing_credentials) = match AwsCredentials::from_lookup(&lookup) {
            Ok(credentials) => (Some(credentials), Vec::new()),
            Err(ConfigError::MissingCredentials(missing)) => (None, missing),
            Err(e) => return Err(e),
        };

        Ok(Self {
            model,
            credentials,
            missing_credentials,
            lang,
            system_prompt: get("CHAT_SYSTEM_PROMPT"),
            history_limit,
        })
    }

    /// The AWS credentials, or an error naming exactly the missing variables.
    pub fn aws_credentials(&self) -> Result<&AwsCredentials, ConfigError> {
        self.credentials.as_ref().ok_or_else(|| {
            let missing = if self.missing_credentials.is_empty() {
                AwsCredentials::REQUIRED_VARS.to_vec()
            } else {
                self.missing_credentials.clone()
            };
            ConfigError::MissingCredentials(missing)
        })
    }
}

/// Gather `.env` entries, warning about each line that fails to parse.
fn collect_dotenv<I>(entries: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = Result<(String, String), dotenvy::Error>>,
{
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(pair) => Some(pair),
            Err(e) => {
                warn!(error = %e, "skipping malformed .env entry");
                None
            }
        })
        .collect()
}

fn parse_var<T, G>(get: &G, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(None),
    }
}

/// Reject non-finite or negative temperatures.
pub fn validate_temperature(temperature: f32) -> Result<f32, ConfigError> {
    if temperature.is_finite() && temperature >= 0.0 {
        Ok(temperature)
    } else {
        Err(ConfigError::InvalidValue {
            key: "CHAT_TEMPERATURE",
            value: temperature.to_string(),
        })
    }
}

/// Accept only the supported language codes.
pub fn validate_lang(lang: &str) -> Result<String, ConfigError> {
    match lang.trim().to_lowercase().as_str() {
        "ko" => Ok("ko".to_string()),
        "en" => Ok("en".to_string()),
        _ => Err(ConfigError::InvalidValue {
            key: "CHAT_LANG",
            value: lang.to_string(),
        }),
    }
}

/// A limit of zero would discard every exchange.
pub fn validate_history_limit(limit: usize) -> Result<usize, ConfigError> {
    if limit == 0 {
        Err(ConfigError::InvalidValue {
            key: "CHAT_HISTORY_LIMIT",
            value: "0".to_string(),
        })
    } else {
        Ok(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_from_empty_environment() {
        let settings = AppSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.model, ModelConfig::default());
        assert!(settings.credentials.is_none());
        assert_eq!(
            settings.missing_credentials,
            vec!["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"]
        );
        assert_eq!(settings.lang, "ko");
        assert!(settings.system_prompt.is_none());
        assert!(settings.history_limit.is_none());
    }

    #[test]
    fn test_full_environment() {
        let settings = AppSettings::from_lookup(lookup_from(&[
            ("AWS_ACCESS_KEY_ID", "AKIA"),
            ("AWS_SECRET_ACCESS_KEY", "shh"),
            ("AWS_SESSION_TOKEN", "tok"),
            ("AWS_DEFAULT_REGION", "ap-northeast-2"),
            ("CHAT_BACKEND", "openai"),
            ("CHAT_MODEL_ID", "jamba-large"),
            ("CHAT_MAX_TOKENS", "64"),
            ("CHAT_TEMPERATURE", "0.1"),
            ("CHAT_BASE_URL", "http://localhost:9000/v1"),
            ("CHAT_API_KEY", "key"),
            ("CHAT_LANG", "EN"),
            ("CHAT_SYSTEM_PROMPT", "Be brief."),
            ("CHAT_HISTORY_LIMIT", "4"),
        ]))
        .unwrap();

        assert_eq!(settings.model.backend, BackendKind::OpenAi);
        assert_eq!(settings.model.model_id, "jamba-large");
        assert_eq!(settings.model.region, "ap-northeast-2");
        assert_eq!(settings.model.max_tokens, 64);
        assert!((settings.model.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(settings.model.base_url, "http://localhost:9000/v1");
        assert_eq!(settings.model.api_key, "key");
        assert_eq!(settings.lang, "en");
        assert_eq!(settings.system_prompt.as_deref(), Some("Be brief."));
        assert_eq!(settings.history_limit, Some(4));

        let credentials = settings.credentials.unwrap();
        assert_eq!(credentials.access_key_id, "AKIA");
        assert_eq!(credentials.session_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_aws_region_wins_over_default_region() {
        let settings = AppSettings::from_lookup(lookup_from(&[
            ("AWS_REGION", "eu-central-1"),
            ("AWS_DEFAULT_REGION", "us-west-2"),
        ]))
        .unwrap();
        assert_eq!(settings.model.region, "eu-central-1");
    }

    #[test]
    fn test_missing_credentials_are_listed() {
        match AwsCredentials::from_lookup(lookup_from(&[("AWS_ACCESS_KEY_ID", "AKIA")])) {
            Err(ConfigError::MissingCredentials(vars)) => {
                assert_eq!(vars, vec!["AWS_SECRET_ACCESS_KEY"]);
            }
            other => panic!("unexpected: {:?}", other),
        }

        match AwsCredentials::from_lookup(lookup_from(&[
            ("AWS_ACCESS_KEY_ID", ""),
            ("AWS_SECRET_ACCESS_KEY", "  "),
        ])) {
            Err(ConfigError::MissingCredentials(vars)) => {
                assert_eq!(vars, vec!["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            AppSettings::from_lookup(lookup_from(&[("CHAT_MAX_TOKENS", "lots")])),
            Err(ConfigError::InvalidValue { key: "CHAT_MAX_TOKENS", .. })
        ));
        assert!(matches!(
            AppSettings::from_lookup(lookup_from(&[("CHAT_TEMPERATURE", "-1")])),
            Err(ConfigError::InvalidValue { key: "CHAT_TEMPERATURE", .. })
        ));
        assert!(matches!(
            AppSettings::from_lookup(lookup_from(&[("CHAT_LANG", "fr")])),
            Err(ConfigError::InvalidValue { key: "CHAT_LANG", .. })
        ));
        assert!(matches!(
            AppSettings::from_lookup(lookup_from(&[("CHAT_HISTORY_LIMIT", "0")])),
            Err(ConfigError::InvalidValue { key: "CHAT_HISTORY_LIMIT", .. })
        ));
        assert!(matches!(
            AppSettings::from_lookup(lookup_from(&[("CHAT_BACKEND", "vertex")])),
            Err(ConfigError::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_settings_report_only_the_missing_secret() {
        let settings =
            AppSettings::from_lookup(lookup_from(&[("AWS_ACCESS_KEY_ID", "AKIA")])).unwrap();
        match settings.aws_credentials() {
            Err(ConfigError::MissingCredentials(vars)) => {
                assert_eq!(vars, vec!["AWS_SECRET_ACCESS_KEY"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_dotenv_lines_are_skipped() {
        let entries = vec![
            Ok(("CHAT_LANG".to_string(), "en".to_string())),
            Err(dotenvy::Error::LineParse("CHAT_MODEL_ID 'x".to_string(), 14)),
            Ok(("CHAT_MAX_TOKENS".to_string(), "32".to_string())),
        ];
        let dotenv = collect_dotenv(entries);

        assert_eq!(dotenv.len(), 2);
        assert_eq!(dotenv.get("CHAT_LANG").map(String::as_str), Some("en"));
        assert!(!dotenv.contains_key("CHAT_MODEL_ID"));
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let rendered = format!("{:?}", AwsCredentials::new("AKIA", "top-secret"));
        assert!(rendered.contains("AKIA"));
        assert!(!rendered.contains("top-secret"));
    }
}
