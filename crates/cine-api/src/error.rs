//! API error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cine_core::CineError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Failure envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Always `false`
    pub success: bool,
    /// Error code
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,
    /// Human-readable message
    pub error: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            error: error.into(),
        }
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unavailable { code: &'static str, message: String },
    BadGateway(String),
    Internal { code: &'static str, message: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::NotFound(msg) => ApiError::new("NOT_FOUND", format!("{msg} not found")),
            AppError::BadRequest(msg) => ApiError::new("VALIDATION_ERROR", msg),
            AppError::Unavailable { code, message } => ApiError::new(code, message),
            AppError::BadGateway(msg) => ApiError::new("EMBEDDING_ERROR", msg),
            AppError::Internal { code, message } => {
                tracing::error!(code, "{}", message);
                ApiError::new(code, message)
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<CineError> for AppError {
    fn from(err: CineError) -> Self {
        let code = err.code();
        match err {
            CineError::ValidationError(msg) => AppError::BadRequest(msg),
            CineError::NotFound(msg) => AppError::NotFound(msg),
            CineError::StoreUnavailable(_) | CineError::IndexUnavailable(_) => {
                AppError::Unavailable {
                    code,
                    message: err.to_string(),
                }
            }
            CineError::EmbeddingError(_) => AppError::BadGateway(err.to_string()),
            other => AppError::Internal {
                code,
                message: other.to_string(),
            },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CineError::ValidationError("x".into()), StatusCode::BAD_REQUEST),
            (CineError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (CineError::StoreUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (CineError::IndexUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (CineError::EmbeddingError("x".into()), StatusCode::BAD_GATEWAY),
            (
                CineError::DimensionMismatch { expected: 3, got: 4 },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (CineError::ConfigError("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_unavailable_keeps_code() {
        match AppError::from(CineError::IndexUnavailable("down".into())) {
            AppError::Unavailable { code, .. } => assert_eq!(code, "INDEX_UNAVAILABLE"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
