use crate::core::Pipeline;
use crate::domain::model::{QuestionRequest, RunOutcome};
use crate::utils::error::Result;

/// Runs the three phases of a request in order and assembles the outcome.
pub struct AgentEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AgentEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self, request: &QuestionRequest) -> Result<RunOutcome> {
        tracing::info!(
            "Step-1: requesting scrape plan for workspace {}",
            self.pipeline.workspace_id()
        );
        let scrape = self.pipeline.plan(request).await?;
        tracing::info!(
            "Step-1: plan ready ({} libraries, {} questions)",
            scrape.libraries.len(),
            scrape.questions.len()
        );

        tracing::info!("Step-2: collecting dataset summary");
        let summary = self.pipeline.collect(request, &scrape).await?;
        tracing::info!("Step-2: summary ready ({})", summary.kind());

        tracing::info!("Step-3: requesting analysis code");
        let analysis = self.pipeline.answer(request, &scrape, &summary).await?;
        tracing::info!(
            "Step-3: analysis ready ({} libraries)",
            analysis.libraries.len()
        );

        Ok(RunOutcome {
            workspace_id: self.pipeline.workspace_id().to_string(),
            folder: self.pipeline.workspace_folder(),
            scrape,
            analysis,
            finished_at: chrono::Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AnalysisPlan, DatasetSummary, ScrapePlan};
    use crate::utils::error::AgentError;
    use async_trait::async_trait;

    struct MockPipeline {
        fail_plan: bool,
    }

    #[async_trait]
    impl Pipeline for MockPipeline {
        fn workspace_id(&self) -> &str {
            "ws-1"
        }

        fn workspace_folder(&self) -> String {
            "uploads/ws-1".to_string()
        }

        async fn plan(&self, _request: &QuestionRequest) -> Result<ScrapePlan> {
            if self.fail_plan {
                return Err(AgentError::ModelOutputError {
                    message: "bad completion".to_string(),
                });
            }
            Ok(ScrapePlan {
                code: "import pandas".to_string(),
                libraries: vec!["pandas".to_string()],
                questions: vec!["How many?".to_string()],
            })
        }

        async fn collect(
            &self,
            _request: &QuestionRequest,
            _plan: &ScrapePlan,
        ) -> Result<DatasetSummary> {
            Ok(DatasetSummary::Metadata("120 rows".to_string()))
        }

        async fn answer(
            &self,
            _request: &QuestionRequest,
            _plan: &ScrapePlan,
            _summary: &DatasetSummary,
        ) -> Result<AnalysisPlan> {
            Ok(AnalysisPlan {
                code: "df.count()".to_string(),
                libraries: vec!["pandas".to_string()],
            })
        }
    }

    #[tokio::test]
    async fn test_run_assembles_outcome() {
        let engine = AgentEngine::new(MockPipeline { fail_plan: false });
        let request = QuestionRequest {
            question: "How many?".to_string(),
            uploaded_files: vec![],
            urls: vec![],
        };

        let outcome = engine.run(&request).await.unwrap();

        assert_eq!(outcome.workspace_id, "ws-1");
        assert_eq!(outcome.folder, "uploads/ws-1");
        assert_eq!(outcome.scrape.libraries, vec!["pandas"]);
        assert_eq!(outcome.analysis.code, "df.count()");
    }

    #[tokio::test]
    async fn test_run_propagates_plan_failure() {
        let engine = AgentEngine::new(MockPipeline { fail_plan: true });
        let request = QuestionRequest::default();

        let err = engine.run(&request).await.unwrap_err();
        assert!(matches!(err, AgentError::ModelOutputError { .. }));
    }
}
