use crate::analysis::{AnalysisError, ProviderError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Input(serde_json::Error),
    Analysis(AnalysisError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Input(err) => write!(f, "invalid input: {}", err),
            AppError::Analysis(err) => write!(f, "analysis error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Input(err) => Some(err),
            AppError::Analysis(err) => Some(err),
        }
    }
}

/// Every failure leaves the HTTP layer as `{ "error", "kind", "key" }`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, key) = match &self {
            AppError::Analysis(err) => {
                let status = match err {
                    AnalysisError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
                    AnalysisError::Provider(_) => StatusCode::BAD_GATEWAY,
                    AnalysisError::MalformedResponse(_)
                    | AnalysisError::Validation(_)
                    | AnalysisError::EmptyNarrative { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, err.kind(), err.key().map(str::to_string))
            }
            AppError::Input(_) => (StatusCode::BAD_REQUEST, "invalid_input", None),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Server(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None)
            }
        };

        let message = match &self {
            AppError::Analysis(err) => err.to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({ "error": message, "kind": kind, "key": key }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Input(value)
    }
}

impl From<AnalysisError> for AppError {
    fn from(value: AnalysisError) -> Self {
        Self::Analysis(value)
    }
}

impl From<ProviderError> for AppError {
    fn from(value: ProviderError) -> Self {
        Self::Analysis(AnalysisError::Provider(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ValidationError, ValidationErrorKind};

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn validation_failures_carry_kind_and_key() {
        let error = AppError::from(AnalysisError::Validation(ValidationError {
            kind: ValidationErrorKind::OutOfRange,
            key: Some("callEtiquette".to_string()),
            detail: "Call Etiquette (callEtiquette) scored 16".to_string(),
        }));

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_of(response).await;
        assert_eq!(body["kind"], "out_of_range");
        assert_eq!(body["key"], "callEtiquette");
    }

    #[tokio::test]
    async fn non_analysis_failures_are_internal() {
        let error = AppError::from(std::io::Error::other("disk gone"));

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body["kind"], "internal");
        assert!(body["key"].is_null());
    }
}
