use crate::domain::model::{AnalysisPlan, DatasetSummary, QuestionRequest, ScrapePlan};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
    /// File names directly under the given directory, sorted; empty when the
    /// directory does not exist yet.
    fn list_dir(&self, path: &str)
        -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn upload_dir(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
}

/// One round trip to the hosted chat-completion API.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        (**self).generate(system, user).await
    }
}

/// The sequential two-call flow: plan scraping, take stock of the workspace,
/// then ask for analysis code.
#[async_trait]
pub trait Pipeline: Send + Sync {
    fn workspace_id(&self) -> &str;
    fn workspace_folder(&self) -> String;

    async fn plan(&self, request: &QuestionRequest) -> Result<ScrapePlan>;
    async fn collect(&self, request: &QuestionRequest, plan: &ScrapePlan)
        -> Result<DatasetSummary>;
    async fn answer(
        &self,
        request: &QuestionRequest,
        plan: &ScrapePlan,
        summary: &DatasetSummary,
    ) -> Result<AnalysisPlan>;
}
