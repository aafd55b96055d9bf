//! Integer id path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// Extractor for `i64` path ids.
///
/// Rejects non-integer segments with a 400 `INVALID_ID` body instead of
/// axum's plain-text path rejection.
///
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::extractors::IdPath;
///
/// async fn get_user(IdPath(id): IdPath) -> String {
///     format!("User ID: {}", id)
/// }
///
/// let app = Router::new().route("/users/{id}", get(get_user));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        raw.parse::<i64>()
            .map(IdPath)
            .map_err(|_| AppError::InvalidId(raw).into_response())
    }
}
