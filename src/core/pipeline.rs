use crate::core::workspace::{Workspace, DATA_FILE, METADATA_FILE, RESULT_FILE};
use crate::core::{llm, prompts};
use crate::core::{ConfigProvider, LlmClient, Pipeline, Storage};
use crate::domain::model::{AnalysisPlan, DatasetSummary, QuestionRequest, ScrapePlan};
use crate::utils::error::Result;

/// The two-call flow around one workspace: ask the model for scraping code,
/// take stock of what landed in the folder, then ask for analysis code.
pub struct AgentPipeline<S: Storage, C: ConfigProvider, L: LlmClient> {
    storage: S,
    config: C,
    llm: L,
    workspace: Workspace,
}

impl<S: Storage, C: ConfigProvider, L: LlmClient> AgentPipeline<S, C, L> {
    pub fn new(storage: S, config: C, llm: L, workspace: Workspace) -> Self {
        Self {
            storage,
            config,
            llm,
            workspace,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, L: LlmClient> Pipeline for AgentPipeline<S, C, L> {
    fn workspace_id(&self) -> &str {
        self.workspace.id()
    }

    fn workspace_folder(&self) -> String {
        self.workspace.folder(self.config.upload_dir())
    }

    async fn plan(&self, request: &QuestionRequest) -> Result<ScrapePlan> {
        let folder = self.workspace_folder();
        let user_prompt = prompts::scrape_user_prompt(request, &folder);

        tracing::debug!("Requesting scrape plan from model {}", self.config.model());
        let raw = self
            .llm
            .generate(prompts::SCRAPE_SYSTEM_PROMPT, &user_prompt)
            .await?;
        let plan: ScrapePlan = llm::decode_plan(&raw)?;

        // The generated code appends to metadata.txt; seed it so the path is there.
        self.workspace
            .ensure_placeholder(&self.storage, METADATA_FILE)
            .await?;

        Ok(plan)
    }

    async fn collect(
        &self,
        _request: &QuestionRequest,
        _plan: &ScrapePlan,
    ) -> Result<DatasetSummary> {
        let data_path = self.workspace.file_path(DATA_FILE);
        if self.storage.exists(&data_path).await? {
            let bytes = self.storage.read_file(&data_path).await?;
            let raw = String::from_utf8_lossy(&bytes);
            return Ok(DatasetSummary::CsvPreview(prompts::csv_preview(&raw)));
        }

        let metadata_path = self.workspace.file_path(METADATA_FILE);
        if self.storage.exists(&metadata_path).await? {
            let bytes = self.storage.read_file(&metadata_path).await?;
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            if !text.is_empty() {
                return Ok(DatasetSummary::Metadata(text));
            }
        }

        // The scrape code may have produced files beyond the named uploads,
        // so list what is actually in the workspace folder.
        let files = self.storage.list_dir(self.workspace.id()).await?;
        Ok(DatasetSummary::FileListing(files))
    }

    async fn answer(
        &self,
        request: &QuestionRequest,
        plan: &ScrapePlan,
        summary: &DatasetSummary,
    ) -> Result<AnalysisPlan> {
        // The generated analysis code overwrites this file with the real answers.
        self.workspace
            .ensure_placeholder(&self.storage, RESULT_FILE)
            .await?;

        let questions = if plan.questions.is_empty() {
            vec![request.question.clone()]
        } else {
            plan.questions.clone()
        };

        let folder = self.workspace_folder();
        let system_prompt = prompts::analysis_system_prompt(&folder);
        let user_prompt = prompts::analysis_user_prompt(&questions, summary);

        tracing::debug!("Requesting analysis code from model {}", self.config.model());
        let raw = self.llm.generate(&system_prompt, &user_prompt).await?;
        llm::decode_plan(&raw)
    }
}
