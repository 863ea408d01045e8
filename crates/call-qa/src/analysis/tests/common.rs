use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::{json, Value};

use crate::analysis::domain::{AudioUpload, Transcript};
use crate::analysis::providers::{CallScorer, MockScorer, ProviderError, Transcriber};
use crate::analysis::CallAnalysisService;

pub(super) const BOUNDARY: &str = "call-qa-boundary";

#[derive(Debug, Clone)]
pub(super) struct StaticTranscriber(pub(super) &'static str);

#[async_trait]
impl Transcriber for StaticTranscriber {
    fn provider_id(&self) -> &'static str {
        "static"
    }

    async fn transcribe(&self, _audio: &AudioUpload) -> Result<Transcript, ProviderError> {
        Ok(Transcript::new(self.0))
    }
}

/// Scorer replying with a fixed string and recording every prompt it saw.
#[derive(Debug, Default)]
pub(super) struct ScriptedScorer {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedScorer {
    pub(super) fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

#[async_trait]
impl CallScorer for ScriptedScorer {
    fn provider_id(&self) -> &'static str {
        "scripted"
    }

    async fn score(&self, _system: &str, prompt: &str) -> Result<String, ProviderError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

#[derive(Debug, Default)]
pub(super) struct UnavailableScorer;

#[async_trait]
impl CallScorer for UnavailableScorer {
    fn provider_id(&self) -> &'static str {
        "unavailable"
    }

    async fn score(&self, _system: &str, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Status {
            provider: "unavailable",
            status: 503,
            body: "overloaded".to_string(),
        })
    }
}

pub(super) fn sample_analysis() -> Value {
    MockScorer::sample_response()
}

pub(super) fn analysis_with_score(key: &str, score: Value) -> Value {
    let mut analysis = sample_analysis();
    analysis["scores"][key] = score;
    analysis
}

pub(super) fn transcript() -> &'static str {
    "Agent: Hello, this call is recorded. Customer: Okay."
}

pub(super) fn scripted_service(
    reply: Value,
) -> (
    CallAnalysisService<StaticTranscriber, ScriptedScorer>,
    Arc<ScriptedScorer>,
) {
    let scorer = Arc::new(ScriptedScorer::replying(reply.to_string()));
    let service = CallAnalysisService::new(Arc::new(StaticTranscriber(transcript())), scorer.clone());
    (service, scorer)
}

pub(super) fn mp3_upload() -> AudioUpload {
    AudioUpload::new("call.mp3", Some("audio/mpeg"), vec![0xFF, 0xFB, 0x90, 0x64])
        .expect("valid upload")
}

pub(super) fn multipart_request(field: &str, file_name: &str, content_type: &str) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/analyze-call")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

pub(super) fn json_request(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn blank_narrative() -> Value {
    let mut analysis = sample_analysis();
    analysis["observation"] = json!("   ");
    analysis
}
