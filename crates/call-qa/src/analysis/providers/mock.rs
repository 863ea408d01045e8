use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{CallScorer, ProviderError, Transcriber};
use crate::analysis::domain::{AudioUpload, Transcript};

const MOCK_PROVIDER: &str = "mock";

const SAMPLE_TRANSCRIPT: &str = "Agent: Good morning, this is Priya calling from the \
collections team regarding your overdue credit card payment. \
Customer: I already told you people I can't pay the late penalty this month. \
Agent: I understand. If the minimum amount is cleared by Friday the penalty will be \
reversed. Can I book that payment for you now? \
Customer: Fine, put me down for Friday. \
Agent: Done. Thank you for your time, have a good day.";

/// Offline transcriber returning a fixed sample conversation.
#[derive(Debug, Clone, Default)]
pub struct MockTranscriber;

#[async_trait]
impl Transcriber for MockTranscriber {
    fn provider_id(&self) -> &'static str {
        MOCK_PROVIDER
    }

    async fn transcribe(&self, _audio: &AudioUpload) -> Result<Transcript, ProviderError> {
        Ok(Transcript::new(SAMPLE_TRANSCRIPT))
    }
}

/// Offline scorer that answers every prompt with the same sample analysis
/// after simulating provider latency.
#[derive(Debug, Clone, Default)]
pub struct MockScorer {
    delay: Duration,
}

impl MockScorer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn sample_response() -> serde_json::Value {
        json!({
            "scores": {
                "greeting": 5,
                "collectionUrgency": 12,
                "rebuttalCustomerHandling": 10,
                "callEtiquette": 10,
                "callDisclaimer": 0,
                "correctDisposition": 10,
                "callClosing": 5,
                "fatalIdentification": 5,
                "fatalTapeDiscloser": 0,
                "fatalToneLanguage": 15
            },
            "overallFeedback": "The agent was confident and persuasive, though failed to provide disclaimer.",
            "observation": "Customer raised objections about penalty. Agent managed well but missed tape disclosure."
        })
    }
}

#[async_trait]
impl CallScorer for MockScorer {
    fn provider_id(&self) -> &'static str {
        MOCK_PROVIDER
    }

    async fn score(&self, _system: &str, _prompt: &str) -> Result<String, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Self::sample_response().to_string())
    }
}
