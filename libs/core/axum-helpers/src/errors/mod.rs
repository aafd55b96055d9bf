pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error body returned by every failing endpoint.
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "User with id 999 not found"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Structured details, e.g. per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain errors convert into this type; it owns status mapping, logging and
/// the [`ErrorResponse`] body.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// Storage failure; the detail is logged, never returned to the client
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(_)
            | AppError::ValidationError(_)
            | AppError::InvalidId(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, details, code) = match self {
            // Missing fields, wrong types and malformed JSON are all client errors here,
            // including the 415/422 cases axum would report on its own.
            AppError::JsonExtractorRejection(e) => {
                tracing::info!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (e.body_text(), None, ErrorCode::JsonExtraction)
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                    ErrorCode::ValidationError,
                )
            }
            AppError::InvalidId(raw) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidId.code(),
                    "Invalid id in path: {}",
                    raw
                );
                (
                    format!("{}: {}", ErrorCode::InvalidId.default_message(), raw),
                    None,
                    ErrorCode::InvalidId,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                (msg, None, ErrorCode::BadRequest)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (msg, None, ErrorCode::NotFound)
            }
            AppError::Database(msg) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {}",
                    msg
                );
                (
                    ErrorCode::DatabaseError.default_message().to_string(),
                    None,
                    ErrorCode::DatabaseError,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Build an error response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}
