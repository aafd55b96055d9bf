use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("User with id {0} not found")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<DbErr> for UserError {
    fn from(err: DbErr) -> Self {
        UserError::Storage(err.to_string())
    }
}

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::NotFound(id) => AppError::NotFound(format!("User with id {} not found", id)),
            UserError::Storage(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
