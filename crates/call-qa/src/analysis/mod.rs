//! Recorded-call analysis: transcription, LLM scoring, and rubric validation.

pub mod domain;
mod parse;
pub mod providers;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{AnalysisReport, AnalysisResult, AudioUpload, Transcript};
pub use providers::{
    CallScorer, MockScorer, MockTranscriber, OpenAiChatScorer, OpenAiTranscriber, ProviderError,
    Transcriber,
};
pub use router::analysis_router;
pub use service::{AnalysisError, CallAnalysisService, DynCallAnalysisService};
