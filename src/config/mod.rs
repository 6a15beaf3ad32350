pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AgentError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Environment variable holding the AI Pipe bearer token.
pub const TOKEN_ENV_VAR: &str = "AIPIPE_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "askpipe")]
#[command(about = "LLM-driven scrape-and-answer pipeline service")]
pub struct CliConfig {
    /// Base URL of the AI Pipe chat-completion gateway
    #[arg(long, default_value = "https://aipipe.org/openrouter/v1")]
    pub base_url: String,

    /// Model name forwarded in every completion request
    #[arg(long, default_value = "gpt-4o-mini")]
    pub model: String,

    /// Directory holding one workspace folder per request
    #[arg(long, default_value = "./uploads")]
    pub upload_dir: String,

    /// Address the HTTP server binds to
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Timeout for each outbound API call, in seconds
    #[arg(long, default_value = "60")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn upload_dir(&self) -> &str {
        &self.upload_dir
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_non_empty_string("model", &self.model)?;
        validation::validate_path("upload_dir", &self.upload_dir)?;
        validation::validate_non_empty_string("bind", &self.bind)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        Ok(())
    }
}

/// Bearer token resolution: an explicit value wins, the environment is the
/// fallback. The service refuses to start without one.
pub fn resolve_token(explicit: Option<&str>) -> Result<String> {
    if let Some(token) = explicit {
        if !token.trim().is_empty() {
            return Ok(token.to_string());
        }
    }

    match std::env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(AgentError::MissingConfigError {
            field: TOKEN_ENV_VAR.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> CliConfig {
        CliConfig::parse_from(["askpipe"])
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_seconds, 60);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = default_config();
        config.base_url = "not-a-url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = default_config();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_token_prefers_explicit_value() {
        let token = resolve_token(Some("sk-test")).unwrap();
        assert_eq!(token, "sk-test");
    }

    #[test]
    fn test_resolve_token_falls_back_to_env() {
        std::env::set_var(TOKEN_ENV_VAR, "env-token");
        assert_eq!(resolve_token(Some("   ")).unwrap(), "env-token");
        std::env::remove_var(TOKEN_ENV_VAR);
    }
}
