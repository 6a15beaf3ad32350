use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AgentError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub api: ApiConfig,
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: Option<u64>,
    /// Usually written as "${AIPIPE_TOKEN}" and filled in from the environment.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub upload_dir: String,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AgentError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AgentError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` placeholders with environment values. Unset
    /// variables are left as-is so validation can point at them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(60)
    }

    /// A token that survived substitution; unresolved placeholders do not count.
    pub fn token(&self) -> Option<&str> {
        self.api
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty() && !t.starts_with("${"))
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn model(&self) -> &str {
        &self.api.model
    }

    fn upload_dir(&self) -> &str {
        &self.workspace.upload_dir
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_non_empty_string("api.model", &self.api.model)?;
        validation::validate_path("workspace.upload_dir", &self.workspace.upload_dir)?;
        validation::validate_positive_number("api.timeout_seconds", self.timeout_seconds(), 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[pipeline]
name = "test-pipeline"
description = "Test pipeline"
version = "1.0.0"

[api]
base_url = "https://aipipe.org/openrouter/v1"
model = "gpt-4o-mini"
timeout_seconds = 30

[workspace]
upload_dir = "./uploads"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "test-pipeline");
        assert_eq!(config.api.model, "gpt-4o-mini");
        assert_eq!(config.timeout_seconds(), 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_ASKPIPE_BASE_URL", "https://test.aipipe.org/v1");

        let toml_content = r#"
[pipeline]
name = "test"
description = "test"
version = "1.0"

[api]
base_url = "${TEST_ASKPIPE_BASE_URL}"
model = "gpt-4o-mini"

[workspace]
upload_dir = "./uploads"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, "https://test.aipipe.org/v1");

        std::env::remove_var("TEST_ASKPIPE_BASE_URL");
    }

    #[test]
    fn test_unresolved_token_placeholder_is_ignored() {
        let toml_content = r#"
[pipeline]
name = "test"
description = "test"
version = "1.0"

[api]
base_url = "https://aipipe.org/openrouter/v1"
model = "gpt-4o-mini"
token = "${ASKPIPE_NO_SUCH_TOKEN_VAR}"

[workspace]
upload_dir = "./uploads"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.token().is_none());
    }

    #[test]
    fn test_config_validation_rejects_bad_url() {
        let toml_content = r#"
[pipeline]
name = "test"
description = "test"
version = "1.0"

[api]
base_url = "invalid-url"
model = "gpt-4o-mini"

[workspace]
upload_dir = "./uploads"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"
description = "File test"
version = "1.0"

[api]
base_url = "https://aipipe.org/openrouter/v1"
model = "gpt-4o-mini"

[workspace]
upload_dir = "./uploads"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
    }
}
