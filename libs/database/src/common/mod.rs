//! Utilities shared by the connector and health modules

pub mod error;
pub mod retry;

pub use error::DatabaseError;
pub use retry::{RetryConfig, retry, retry_with_backoff};
