/// Unified error type for connection management, health checks and migrations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}
