use axum::Router;
use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

/// Grace period for closing the pool after the server stops accepting requests.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name).await?;
    } else {
        info!("RUN_MIGRATIONS=false, skipping migrations");
    }

    let state = AppState { config, db };
    let app = build_app(&state)?;

    info!("Starting users API with graceful shutdown (30s timeout)");

    // State moves here for cleanup
    create_production_app(app, &state.config.server, SHUTDOWN_TIMEOUT, async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}

/// Full application router.
///
/// - `/api/users`: CRUD endpoints
/// - `/health`: liveness with app name/version
/// - `/ready`: readiness with a database round trip
/// - `/swagger-ui`, `/api-docs/openapi.json`: API docs
fn build_app(state: &AppState) -> eyre::Result<Router> {
    let api_routes = api::routes(state);

    let router = create_router::<openapi::ApiDoc>(
        api_routes,
        &state.config.server,
        &state.config.environment,
    )?;

    Ok(router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone())))
}
