//! Type-safe error codes for API responses.
//!
//! Each code carries a client-facing identifier (e.g. "VALIDATION_ERROR"),
//! an integer for logs and monitoring (e.g. 1001) and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Request validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request body failed field validation
    ValidationError,

    /// Path id is not a valid integer
    InvalidId,

    /// Request body is not valid JSON or does not match the expected shape
    JsonExtraction,

    NotFound,

    /// Generic malformed request
    BadRequest,

    // Database errors (2000-2999)
    /// Storage engine failure surfaced through a domain error
    DatabaseError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for programmatic handling by clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Integer code used in structured logs.
    ///
    /// - 1000-1999: client errors
    /// - 2000-2999: database errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::BadRequest => 1012,

            Self::DatabaseError => 2003,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid id format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::BadRequest => "Bad request",
            Self::DatabaseError => "Database error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
