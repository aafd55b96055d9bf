//! Readiness check backed by a real database round trip.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health_detailed;

/// Readiness check endpoint: 200 when Postgres answers `SELECT 1`, 503 otherwise.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            let status = check_health_detailed(&state.db).await;
            tracing::debug!(response_time_ms = status.response_time_ms, "Database readiness");
            if status.healthy {
                Ok(())
            } else {
                Err(status
                    .message
                    .unwrap_or_else(|| "Database health check failed".to_string()))
            }
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
