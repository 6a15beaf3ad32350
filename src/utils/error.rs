use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("AI Pipe returned status {status}: {body}")]
    ApiStatusError { status: u16, body: String },

    #[error("Model output error: {message}")]
    ModelOutputError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Model,
    Config,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AgentError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AgentError::ApiError(_) | AgentError::ApiStatusError { .. } => ErrorCategory::Network,
            AgentError::ModelOutputError { .. } => ErrorCategory::Model,
            AgentError::MissingConfigError { .. }
            | AgentError::InvalidConfigValueError { .. }
            | AgentError::ConfigError { .. } => ErrorCategory::Config,
            AgentError::CsvError(_)
            | AgentError::SerializationError(_)
            | AgentError::ProcessingError { .. } => ErrorCategory::Data,
            AgentError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // A second attempt against the hosted API may simply work.
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Model | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Config | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AgentError::ApiError(_) => {
                "Check network connectivity and the AI Pipe base URL".to_string()
            }
            AgentError::ApiStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Verify that AIPIPE_TOKEN is set to a valid token".to_string()
            }
            AgentError::ApiStatusError { .. } => {
                "Check the AI Pipe service status and the configured model name".to_string()
            }
            AgentError::ModelOutputError { .. } => {
                "Re-run the request; the model occasionally returns malformed JSON".to_string()
            }
            AgentError::CsvError(_) => {
                "Inspect data.csv in the workspace folder for malformed rows".to_string()
            }
            AgentError::IoError(_) => {
                "Check that the upload directory exists and is writable".to_string()
            }
            AgentError::SerializationError(_) => {
                "Inspect the raw model output logged at error level".to_string()
            }
            AgentError::MissingConfigError { field } => {
                format!("Set the '{}' configuration value", field)
            }
            AgentError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' configuration value", field)
            }
            AgentError::ConfigError { .. } => "Review the configuration file".to_string(),
            AgentError::ProcessingError { .. } => {
                "Inspect the workspace folder contents".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the AI Pipe API: {}", self),
            ErrorCategory::Model => format!("The model returned an unusable answer: {}", self),
            ErrorCategory::Config => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Could not process the data: {}", self),
            ErrorCategory::System => format!("File system problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
