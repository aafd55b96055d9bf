use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::time::Instant;
use tracing::debug;

use crate::common::DatabaseError;

/// Run `SELECT 1` against the pool.
///
/// Backs the readiness probe; the liveness probe never touches the database.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Running PostgreSQL health check");

    db.execute_unprepared("SELECT 1").await.map_err(|e| {
        DatabaseError::HealthCheckFailed(format!("PostgreSQL health check failed: {}", e))
    })?;

    debug!("PostgreSQL health check passed");
    Ok(())
}

/// Outcome of [`check_health_detailed`]
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: Option<String>,
    pub response_time_ms: u64,
}

impl HealthStatus {
    pub fn healthy(response_time_ms: u64) -> Self {
        Self {
            healthy: true,
            message: None,
            response_time_ms,
        }
    }

    pub fn unhealthy(message: String, response_time_ms: u64) -> Self {
        Self {
            healthy: false,
            message: Some(message),
            response_time_ms,
        }
    }
}

/// [`check_health`] plus how long the round trip took.
pub async fn check_health_detailed(db: &DatabaseConnection) -> HealthStatus {
    let start = Instant::now();
    let result = check_health(db).await;
    let elapsed = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => HealthStatus::healthy(elapsed),
        Err(e) => HealthStatus::unhealthy(e.to_string(), elapsed),
    }
}
