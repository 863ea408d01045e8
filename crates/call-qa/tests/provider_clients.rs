//! Provider clients exercised against an in-process fake provider.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use call_qa::analysis::{
    AudioUpload, CallAnalysisService, CallScorer, MockScorer, OpenAiChatScorer,
    OpenAiTranscriber, ProviderError, Transcriber,
};
use call_qa::config::{LlmConfig, TranscriptionConfig};

const API_KEY: &str = "test-key";

#[derive(Clone)]
struct FakeProvider {
    completion: Arc<String>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some("Bearer test-key")
}

async fn transcriptions(headers: HeaderMap, mut multipart: Multipart) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut model = None;
    let mut file = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name() {
            Some("model") => model = field.text().await.ok(),
            Some("file") => {
                let name = field.file_name().map(str::to_string);
                let mime = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map(|bytes| bytes.len()).unwrap_or(0);
                file = Some((name, mime, bytes));
            }
            _ => {}
        }
    }

    match (model.as_deref(), file) {
        (Some("whisper-1"), Some((Some(name), Some(mime), bytes))) if bytes > 0 => Json(json!({
            "text": format!("transcribed {name} ({mime}, {bytes} bytes)")
        }))
        .into_response(),
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn completions(
    State(provider): State<FakeProvider>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if request["response_format"]["type"] != "json_object"
        || request["messages"][0]["role"] != "system"
        || request["messages"][1]["role"] != "user"
    {
        return StatusCode::BAD_REQUEST.into_response();
    }

    Json(json!({
        "choices": [
            { "message": { "role": "assistant", "content": provider.completion.as_str() } }
        ]
    }))
    .into_response()
}

async fn spawn_provider(completion: String) -> SocketAddr {
    let app = Router::new()
        .route("/v1/audio/transcriptions", post(transcriptions))
        .route("/v1/chat/completions", post(completions))
        .with_state(FakeProvider {
            completion: Arc::new(completion),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake provider runs");
    });
    addr
}

fn transcription_config(addr: SocketAddr, api_key: &str) -> TranscriptionConfig {
    TranscriptionConfig {
        api_key: api_key.to_string(),
        base_url: format!("http://{addr}/v1/"),
        model: "whisper-1".to_string(),
    }
}

fn llm_config(addr: SocketAddr) -> LlmConfig {
    LlmConfig {
        api_key: API_KEY.to_string(),
        base_url: format!("http://{addr}/v1"),
        model: "gpt-4o-mini".to_string(),
        temperature: 0.2,
    }
}

fn upload() -> AudioUpload {
    AudioUpload::new("call.wav", Some("audio/wav"), vec![0x52, 0x49, 0x46, 0x46]).expect("upload")
}

#[tokio::test]
async fn transcriber_posts_multipart_audio() {
    let addr = spawn_provider(String::new()).await;
    let transcriber =
        OpenAiTranscriber::new(transcription_config(addr, API_KEY), Duration::from_secs(5))
            .expect("client builds");

    let transcript = transcriber.transcribe(&upload()).await.expect("transcribed");

    assert_eq!(transcript.text, "transcribed call.wav (audio/wav, 4 bytes)");
}

#[tokio::test]
async fn transcriber_reports_rejected_credentials() {
    let addr = spawn_provider(String::new()).await;
    let transcriber =
        OpenAiTranscriber::new(transcription_config(addr, "wrong"), Duration::from_secs(5))
            .expect("client builds");

    match transcriber.transcribe(&upload()).await {
        Err(ProviderError::Status { status, provider, .. }) => {
            assert_eq!(status, 401);
            assert_eq!(provider, "transcription");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn chat_scorer_returns_message_content() {
    let addr = spawn_provider("{\"ok\":true}".to_string()).await;
    let scorer =
        OpenAiChatScorer::new(llm_config(addr), Duration::from_secs(5)).expect("client builds");

    let content = scorer.score("system", "prompt").await.expect("scored");
    assert_eq!(content, "{\"ok\":true}");
}

#[tokio::test]
async fn chat_scorer_rejects_empty_completion() {
    let addr = spawn_provider("   ".to_string()).await;
    let scorer =
        OpenAiChatScorer::new(llm_config(addr), Duration::from_secs(5)).expect("client builds");

    assert!(matches!(
        scorer.score("system", "prompt").await,
        Err(ProviderError::Payload { .. })
    ));
}

#[tokio::test]
async fn unreachable_provider_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let scorer =
        OpenAiChatScorer::new(llm_config(addr), Duration::from_secs(5)).expect("client builds");
    assert!(matches!(
        scorer.score("system", "prompt").await,
        Err(ProviderError::Transport { .. })
    ));
}

#[tokio::test]
async fn live_clients_drive_full_analysis() {
    let addr = spawn_provider(MockScorer::sample_response().to_string()).await;
    let service = CallAnalysisService::new(
        Arc::new(
            OpenAiTranscriber::new(transcription_config(addr, API_KEY), Duration::from_secs(5))
                .expect("client builds"),
        ),
        Arc::new(OpenAiChatScorer::new(llm_config(addr), Duration::from_secs(5)).expect("client")),
    );

    let report = service.analyze(upload()).await.expect("analysis succeeds");

    assert_eq!(report.totals.achieved, 72);
    assert_eq!(report.totals.possible, 95);
    assert_eq!(
        report.transcript.as_deref(),
        Some("transcribed call.wav (audio/wav, 4 bytes)")
    );
}
