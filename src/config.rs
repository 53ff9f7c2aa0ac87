//! Service configuration
//!
//! Every option can come from a command-line flag or its environment
//! variable; flags win.

use crate::adapters::services::notify::ntfy::NTFY_DEFAULT_SERVER;
use crate::error::{AppError, Result};
use crate::ports::llm::LlmConfig;
use clap::Parser;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "transcript-tasks", version, about)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "TT_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Google Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    /// Gemini model used for extraction and questions
    #[arg(long, env = "TT_MODEL", default_value = "gemini-1.5-flash")]
    pub model: String,

    #[arg(long, env = "TT_TEMPERATURE", default_value_t = 0.2)]
    pub temperature: f32,

    #[arg(long, env = "TT_MAX_TOKENS", default_value_t = 4096)]
    pub max_tokens: u32,

    /// Timeout for a single LLM request
    #[arg(long, env = "TT_LLM_TIMEOUT_SECS", default_value_t = 120)]
    pub llm_timeout_secs: u64,

    /// SQLite database file; meetings are kept in memory only when absent
    #[arg(long, env = "TT_DATABASE")]
    pub database: Option<PathBuf>,

    /// Accepted session tokens, comma separated; auth is off when empty
    #[arg(
        long,
        env = "TT_SESSION_TOKENS",
        value_delimiter = ',',
        hide_env_values = true
    )]
    pub session_tokens: Vec<String>,

    /// ntfy server for push notifications
    #[arg(long, env = "TT_NTFY_URL", default_value = NTFY_DEFAULT_SERVER)]
    pub ntfy_url: String,

    /// ntfy topic; notifications are off when absent
    #[arg(long, env = "TT_NTFY_TOPIC")]
    pub ntfy_topic: Option<String>,
}

impl Config {
    /// Reject values clap cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.gemini_api_key.trim().is_empty() {
            return Err(AppError::Config("GEMINI_API_KEY must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::Config(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.llm_timeout_secs == 0 {
            return Err(AppError::Config("llm timeout must be positive".to_string()));
        }
        Ok(())
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            model: self.model.clone(),
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        }
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// Non-blank session tokens
    pub fn session_token_set(&self) -> HashSet<String> {
        self.session_tokens
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["transcript-tasks", "--gemini-api-key", "k"]).unwrap();
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.model, "gemini-1.5-flash");
        assert!(config.database.is_none());
        assert!(config.ntfy_topic.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.llm_config().max_tokens, Some(4096));
    }

    #[test]
    fn test_session_tokens_split_and_trimmed() {
        let config = Config::try_parse_from([
            "transcript-tasks",
            "--gemini-api-key",
            "k",
            "--session-tokens",
            "abc, def,,",
        ])
        .unwrap();

        let tokens = config.session_token_set();
        assert_eq!(tokens.len(), 2);
        assert!(tokens.contains("abc"));
        assert!(tokens.contains("def"));
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let config = Config::try_parse_from([
            "transcript-tasks",
            "--gemini-api-key",
            "k",
            "--temperature",
            "3.5",
        ])
        .unwrap();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }
}
