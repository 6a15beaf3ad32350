pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use crate::config::{cli::LocalStorage, CliConfig};
pub use crate::core::engine::AgentEngine;
pub use crate::core::llm::AiPipeClient;
pub use crate::core::pipeline::AgentPipeline;
pub use crate::core::workspace::Workspace;
pub use crate::domain::model::{AnalysisPlan, QuestionRequest, RunOutcome, ScrapePlan};
pub use crate::utils::error::{AgentError, Result};
