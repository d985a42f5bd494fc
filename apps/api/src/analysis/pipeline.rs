//! Resume analysis pipeline.
//!
//! Flow: staged file → extract text → release file → build prompt →
//!       model call → normalize → `AnalysisResult`.
//!
//! The staged file is released as soon as its text is in memory. Any failure
//! before that point drops the `StagedFile` guard, which removes the file.

use std::sync::Arc;

use tracing::{info, warn};

use crate::analysis::extract::extract_text;
use crate::analysis::models::AnalysisResult;
use crate::analysis::normalize::normalize;
use crate::analysis::prompts::build_prompt;
use crate::analysis::staging::{StagedFile, StagingArea};
use crate::errors::AppError;
use crate::llm_client::ModelClient;

/// Process-scoped analysis service, built once at startup.
#[derive(Clone)]
pub struct AnalysisService {
    staging: StagingArea,
    llm: Arc<dyn ModelClient>,
    model: Option<String>,
}

impl AnalysisService {
    pub fn new(staging: StagingArea, llm: Arc<dyn ModelClient>, model: Option<String>) -> Self {
        Self {
            staging,
            llm,
            model,
        }
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    /// Runs the full analysis for one staged upload. Consumes the guard, so
    /// the file is gone by the time this returns, whatever the outcome.
    pub async fn analyze(&self, staged: StagedFile) -> Result<AnalysisResult, AppError> {
        let text = extract_text(staged.path()).await?;
        staged.release();

        if text.is_empty() {
            warn!("Resume yielded no text; sending empty document to the model");
        }

        let prompt = build_prompt(&text);
        let model = self.model.as_deref().ok_or_else(|| {
            AppError::Configuration("LLM_MODEL is not set".to_string())
        })?;

        info!(model, text_chars = text.len(), "Requesting resume analysis");
        let raw = self.llm.invoke(&prompt, model).await?;

        let result = normalize(&raw)?;
        info!(
            questions = result.interview_questions.len(),
            "Resume analysis complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::analysis::fixtures::{pdf_bytes, staged_count, VALID_ANALYSIS};
    use crate::analysis::prompts::AnalysisPrompt;
    use crate::llm_client::LlmError;

    /// Canned model backend. Records every prompt it receives.
    pub(crate) struct StubModel {
        reply: fn() -> Result<String, LlmError>,
        pub(crate) prompts: Mutex<Vec<(String, String)>>,
    }

    impl StubModel {
        pub(crate) fn new(reply: fn() -> Result<String, LlmError>) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelClient for StubModel {
        async fn invoke(&self, prompt: &AnalysisPrompt, model: &str) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.user().to_string()));
            (self.reply)()
        }
    }

    pub(crate) fn valid_reply() -> Result<String, LlmError> {
        Ok(VALID_ANALYSIS.to_string())
    }

    pub(crate) fn fenced_reply() -> Result<String, LlmError> {
        Ok(format!("```json\n{VALID_ANALYSIS}\n```"))
    }

    pub(crate) fn prose_reply() -> Result<String, LlmError> {
        Ok("I'm sorry, I can only describe this resume in words.".to_string())
    }

    pub(crate) fn unreachable_reply() -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 503,
            message: "upstream unavailable".to_string(),
        })
    }

    async fn run(
        reply: fn() -> Result<String, LlmError>,
        model: Option<&str>,
    ) -> (TempDir, Arc<StubModel>, Result<AnalysisResult, AppError>) {
        let tmp = TempDir::new().unwrap();
        let stub = Arc::new(StubModel::new(reply));
        let service = AnalysisService::new(
            StagingArea::new(tmp.path()),
            stub.clone(),
            model.map(str::to_string),
        );
        let staged = service
            .staging()
            .stage("resume.pdf", "application/pdf", &pdf_bytes(50 * 1024))
            .await
            .unwrap();
        assert_eq!(staged_count(tmp.path()), 1);

        let result = service.analyze(staged).await;
        (tmp, stub, result)
    }

    #[tokio::test]
    async fn test_success_returns_result_and_cleans_up() {
        let (tmp, stub, result) = run(valid_reply, Some("llama-3.3-70b")).await;

        let result = result.unwrap();
        assert_eq!(result.interview_questions.len(), 5);
        assert_eq!(staged_count(tmp.path()), 0);

        let prompts = stub.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, "llama-3.3-70b");
        assert!(prompts[0].1.contains("Jane Doe - Senior Rust Engineer"));
    }

    #[tokio::test]
    async fn test_fenced_reply_is_accepted() {
        let (tmp, _, result) = run(fenced_reply, Some("m")).await;
        assert_eq!(result.unwrap().interview_questions.len(), 5);
        assert_eq!(staged_count(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_prose_reply_is_schema_error_and_cleans_up() {
        let (tmp, _, result) = run(prose_reply, Some("m")).await;
        assert!(matches!(result, Err(AppError::SchemaParse(_))));
        assert_eq!(staged_count(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_invocation_error_and_cleans_up() {
        let (tmp, _, result) = run(unreachable_reply, Some("m")).await;
        assert!(matches!(result, Err(AppError::ModelInvocation(_))));
        assert_eq!(staged_count(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_missing_model_is_configuration_error_without_call() {
        let (tmp, stub, result) = run(valid_reply, None).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
        assert!(stub.prompts.lock().unwrap().is_empty());
        assert_eq!(staged_count(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_missing_staged_file_is_internal_error() {
        let tmp = TempDir::new().unwrap();
        let stub = Arc::new(StubModel::new(valid_reply));
        let service = AnalysisService::new(StagingArea::new(tmp.path()), stub.clone(), None);
        let staged = service
            .staging()
            .stage("resume.pdf", "application/pdf", &pdf_bytes(64))
            .await
            .unwrap();
        std::fs::remove_file(staged.path()).unwrap();

        let result = service.analyze(staged).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(stub.prompts.lock().unwrap().is_empty());
    }
}
