//! Outbound speech-to-text and LLM integrations.

mod mock;
mod openai;

use async_trait::async_trait;

use super::domain::{AudioUpload, Transcript};

pub use mock::{MockScorer, MockTranscriber};
pub use openai::{OpenAiChatScorer, OpenAiTranscriber};

/// Speech-to-text backend turning a recorded call into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    fn provider_id(&self) -> &'static str;

    async fn transcribe(&self, audio: &AudioUpload) -> Result<Transcript, ProviderError>;
}

/// LLM backend that answers the rubric prompt with raw JSON text.
#[async_trait]
pub trait CallScorer: Send + Sync {
    fn provider_id(&self) -> &'static str;

    async fn score(&self, system: &str, prompt: &str) -> Result<String, ProviderError>;
}

/// Failure talking to a third-party provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },
    #[error("{provider} responded with status {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{provider} returned an unexpected payload: {message}")]
    Payload {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Transport { provider, .. }
            | Self::Status { provider, .. }
            | Self::Payload { provider, .. } => provider,
        }
    }
}
