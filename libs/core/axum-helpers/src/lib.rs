//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`server`]**: router assembly (docs, middleware), health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: [`AppError`] and the standard [`ErrorResponse`] body
//! - **[`extractors`]**: [`ValidatedJson`] and [`IdPath`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::{Environment, server::ServerConfig};
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! let config = ServerConfig::default();
//! let router = create_router::<ApiDoc>(Router::new(), &config, &Environment::Development)?;
//! create_production_app(router, &config, Duration::from_secs(30), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, create_permissive_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson};
