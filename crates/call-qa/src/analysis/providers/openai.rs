use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CallScorer, ProviderError, Transcriber};
use crate::analysis::domain::{AudioUpload, Transcript};
use crate::config::{LlmConfig, TranscriptionConfig};

const TRANSCRIPTION_PROVIDER: &str = "transcription";
const LLM_PROVIDER: &str = "llm";

fn build_client(provider: &'static str, timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| ProviderError::Transport {
            provider,
            message: err.to_string(),
        })
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

async fn ensure_success(
    provider: &'static str,
    response: Response,
) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        provider,
        status: status.as_u16(),
        body,
    })
}

/// Client for OpenAI-compatible `/audio/transcriptions` endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiTranscriber {
    client: Client,
    config: TranscriptionConfig,
}

impl OpenAiTranscriber {
    pub fn new(config: TranscriptionConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let client = build_client(TRANSCRIPTION_PROVIDER, timeout)?;
        Ok(Self { client, config })
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    fn provider_id(&self) -> &'static str {
        TRANSCRIPTION_PROVIDER
    }

    async fn transcribe(&self, audio: &AudioUpload) -> Result<Transcript, ProviderError> {
        let transport = |err: reqwest::Error| ProviderError::Transport {
            provider: TRANSCRIPTION_PROVIDER,
            message: err.to_string(),
        };

        let file = Part::bytes(audio.bytes.clone())
            .file_name(audio.file_name.clone())
            .mime_str(audio.content_type.essence_str())
            .map_err(transport)?;
        let form = Form::new()
            .text("model", self.config.model.clone())
            .part("file", file);

        debug!(
            file = %audio.file_name,
            bytes = audio.len(),
            model = %self.config.model,
            "requesting transcription"
        );

        let response = self
            .client
            .post(endpoint(&self.config.base_url, "audio/transcriptions"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(TRANSCRIPTION_PROVIDER, response).await?;

        let payload: TranscriptionResponse =
            response.json().await.map_err(|err| ProviderError::Payload {
                provider: TRANSCRIPTION_PROVIDER,
                message: err.to_string(),
            })?;

        Ok(Transcript::new(payload.text))
    }
}

/// Client for OpenAI-compatible `/chat/completions` endpoints in JSON mode.
#[derive(Debug, Clone)]
pub struct OpenAiChatScorer {
    client: Client,
    config: LlmConfig,
}

impl OpenAiChatScorer {
    pub fn new(config: LlmConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let client = build_client(LLM_PROVIDER, timeout)?;
        Ok(Self { client, config })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[async_trait]
impl CallScorer for OpenAiChatScorer {
    fn provider_id(&self) -> &'static str {
        LLM_PROVIDER
    }

    async fn score(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        debug!(
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "requesting call analysis"
        );

        let response = self
            .client
            .post(endpoint(&self.config.base_url, "chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ProviderError::Transport {
                provider: LLM_PROVIDER,
                message: err.to_string(),
            })?;
        let response = ensure_success(LLM_PROVIDER, response).await?;

        let payload: ChatResponse = response.json().await.map_err(|err| ProviderError::Payload {
            provider: LLM_PROVIDER,
            message: err.to_string(),
        })?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::Payload {
                provider: LLM_PROVIDER,
                message: "completion contained no message content".to_string(),
            })
    }
}
