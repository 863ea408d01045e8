use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::domain::{AnalysisReport, AnalysisResult, AudioUpload};
use super::providers::{CallScorer, Transcriber};
use super::service::{AnalysisError, CallAnalysisService};
use crate::error::AppError;
use crate::scoring::Parameter;

/// Multipart field carrying the recorded call.
pub const AUDIO_FIELD: &str = "audio";

/// Router exposing the rubric, direct score review, and call analysis.
pub fn analysis_router<T, S>(service: Arc<CallAnalysisService<T, S>>) -> Router
where
    T: Transcriber + ?Sized + 'static,
    S: CallScorer + ?Sized + 'static,
{
    Router::new()
        .route("/api/rubric", get(rubric_handler::<T, S>))
        .route("/api/score", post(score_handler::<T, S>))
        .route("/api/analyze-call", post(analyze_handler::<T, S>))
        .with_state(service)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricView {
    pub parameters: &'static [Parameter],
    pub total_possible_score: u32,
}

pub(crate) async fn rubric_handler<T, S>(
    State(service): State<Arc<CallAnalysisService<T, S>>>,
) -> Json<RubricView>
where
    T: Transcriber + ?Sized + 'static,
    S: CallScorer + ?Sized + 'static,
{
    let rubric = service.rubric();
    Json(RubricView {
        parameters: rubric.parameters(),
        total_possible_score: rubric.total_possible_score(),
    })
}

pub(crate) async fn score_handler<T, S>(
    State(service): State<Arc<CallAnalysisService<T, S>>>,
    payload: Result<Json<AnalysisResult>, JsonRejection>,
) -> Result<Json<AnalysisReport>, AppError>
where
    T: Transcriber + ?Sized + 'static,
    S: CallScorer + ?Sized + 'static,
{
    let Json(result) = payload
        .map_err(|rejection| AnalysisError::MalformedResponse(rejection.body_text()))?;
    Ok(Json(service.review(result)?))
}

pub(crate) async fn analyze_handler<T, S>(
    State(service): State<Arc<CallAnalysisService<T, S>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisReport>, AppError>
where
    T: Transcriber + ?Sized + 'static,
    S: CallScorer + ?Sized + 'static,
{
    let multipart =
        multipart.map_err(|rejection| AnalysisError::InvalidUpload(rejection.body_text()))?;
    let upload = read_upload(multipart).await?;
    Ok(Json(service.analyze(upload).await?))
}

async fn read_upload(mut multipart: Multipart) -> Result<AudioUpload, AnalysisError> {
    let invalid = |err: axum::extract::multipart::MultipartError| {
        AnalysisError::InvalidUpload(err.body_text())
    };

    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("recording").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(invalid)?;
        return AudioUpload::new(file_name, content_type.as_deref(), bytes.to_vec());
    }

    Err(AnalysisError::InvalidUpload(format!(
        "form field '{AUDIO_FIELD}' is required"
    )))
}
