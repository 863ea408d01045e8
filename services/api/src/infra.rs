use call_qa::analysis::{
    CallAnalysisService, CallScorer, DynCallAnalysisService, MockScorer, MockTranscriber,
    OpenAiChatScorer, OpenAiTranscriber, Transcriber,
};
use call_qa::config::{AnalysisMode, AppConfig};
use call_qa::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Pick the provider pair named by `ANALYSIS_MODE`.
pub(crate) fn analysis_service(config: &AppConfig) -> Result<DynCallAnalysisService, AppError> {
    let (transcriber, scorer): (Arc<dyn Transcriber>, Arc<dyn CallScorer>) =
        match config.analysis.mode {
            AnalysisMode::Mock => (
                Arc::new(MockTranscriber),
                Arc::new(MockScorer::new(config.analysis.mock_delay)),
            ),
            AnalysisMode::Live => (
                Arc::new(OpenAiTranscriber::new(
                    config.transcription.clone(),
                    config.analysis.provider_timeout,
                )?),
                Arc::new(OpenAiChatScorer::new(
                    config.llm.clone(),
                    config.analysis.provider_timeout,
                )?),
            ),
        };

    Ok(CallAnalysisService::new(transcriber, scorer))
}
