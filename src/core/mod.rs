pub mod engine;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod workspace;

pub use crate::domain::model::{
    AnalysisPlan, DatasetSummary, QuestionRequest, RunOutcome, ScrapePlan,
};
pub use crate::domain::ports::{ConfigProvider, LlmClient, Pipeline, Storage};
pub use crate::utils::error::Result;
