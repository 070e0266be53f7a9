//! Error types for sovnote-ai
//!
//! Lookup and embedding failures never reach this module: the analyzer
//! downgrades them to a placeholder result. What remains are client errors on
//! the request body and startup failures.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::classifier::ClassifierError;
use crate::services::embedder::EmbedError;
use crate::services::encyclopedia::LookupError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body missing, not JSON, or not shaped like a Note
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// Body parsed but a field failed validation (422)
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::InvalidBody(rejection) => {
                let code = match &rejection {
                    JsonRejection::JsonDataError(_) => "INVALID_BODY",
                    JsonRejection::JsonSyntaxError(_) => "INVALID_JSON",
                    JsonRejection::MissingJsonContentType(_) => "UNSUPPORTED_MEDIA_TYPE",
                    _ => "BAD_REQUEST",
                };
                (rejection.status(), code, rejection.body_text())
            }
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures while building the analyzer at startup
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Classifier training failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Encyclopedia client setup failed: {0}")]
    Encyclopedia(#[from] LookupError),

    #[error("Embedder setup failed: {0}")]
    Embedder(#[from] EmbedError),
}
