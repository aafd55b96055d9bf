//! Server bootstrap: router assembly with OpenAPI docs and middleware,
//! liveness/readiness helpers and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes, &config.server, &config.environment)?;
//! let app = router.merge(health_router(app_info!()));
//!
//! create_production_app(app, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{REQUEST_TIMEOUT, create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
