use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{AnalysisReport, AnalysisResult, AudioUpload};
use super::parse::parse_analysis;
use super::providers::{CallScorer, ProviderError, Transcriber};
use crate::scoring::prompt::{analysis_prompt, SYSTEM_PROMPT};
use crate::scoring::{Rubric, ValidationError};

/// Service wiring a transcriber and an LLM scorer to the rubric.
///
/// Each call runs upload → transcript → prompt → LLM → parse → validate →
/// aggregate, once, and surfaces the first failure.
pub struct CallAnalysisService<T: ?Sized, S: ?Sized> {
    rubric: &'static Rubric,
    transcriber: Arc<T>,
    scorer: Arc<S>,
}

/// Service over boxed providers, chosen at runtime from configuration.
pub type DynCallAnalysisService = CallAnalysisService<dyn Transcriber, dyn CallScorer>;

impl<T, S> CallAnalysisService<T, S>
where
    T: Transcriber + ?Sized + 'static,
    S: CallScorer + ?Sized + 'static,
{
    pub fn new(transcriber: Arc<T>, scorer: Arc<S>) -> Self {
        Self::with_rubric(Rubric::canonical(), transcriber, scorer)
    }

    pub fn with_rubric(rubric: &'static Rubric, transcriber: Arc<T>, scorer: Arc<S>) -> Self {
        Self {
            rubric,
            transcriber,
            scorer,
        }
    }

    pub fn rubric(&self) -> &'static Rubric {
        self.rubric
    }

    /// Transcribe and score a recorded call.
    pub async fn analyze(&self, upload: AudioUpload) -> Result<AnalysisReport, AnalysisError> {
        let result = self.run_pipeline(&upload).await;
        match &result {
            Ok(report) => info!(
                file = %upload.file_name,
                achieved = report.totals.achieved,
                possible = report.totals.possible,
                "call analysis completed"
            ),
            Err(err) => warn!(
                file = %upload.file_name,
                kind = err.kind(),
                error = %err,
                "call analysis failed"
            ),
        }
        result
    }

    async fn run_pipeline(&self, upload: &AudioUpload) -> Result<AnalysisReport, AnalysisError> {
        let transcript = self.transcriber.transcribe(upload).await?;
        if transcript.text.trim().is_empty() {
            return Err(ProviderError::Payload {
                provider: self.transcriber.provider_id(),
                message: "transcript is empty".to_string(),
            }
            .into());
        }

        let prompt = analysis_prompt(self.rubric, &transcript.text);
        let reply = self.scorer.score(SYSTEM_PROMPT, &prompt).await?;
        let result = parse_analysis(&reply)?;

        result.evaluate(self.rubric, Some(transcript), Utc::now())
    }

    /// Validate an analysis produced elsewhere, without calling any provider.
    pub fn review(&self, result: AnalysisResult) -> Result<AnalysisReport, AnalysisError> {
        result.evaluate(self.rubric, None, Utc::now())
    }
}

/// Error raised by the analysis pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid upload: {0}")]
    InvalidUpload(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("analysis response is malformed: {0}")]
    MalformedResponse(String),
    #[error("score validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("{field} must not be empty")]
    EmptyNarrative { field: &'static str },
}

impl AnalysisError {
    /// Stable snake_case tag reported to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUpload(_) => "invalid_upload",
            Self::Provider(_) => "provider",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Validation(err) => err.kind.label(),
            Self::EmptyNarrative { .. } => "empty_narrative",
        }
    }

    /// Offending rubric key or field, when there is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Validation(err) => err.key.as_deref(),
            Self::EmptyNarrative { field } => Some(*field),
            _ => None,
        }
    }
}
