//! Application state management.
//!
//! Shared state handed to the route builders and the readiness probe.

/// Shared application state.
///
/// Cloning is cheap: `DatabaseConnection` is a handle to the pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
}
