//! PostgreSQL connectivity shared by the service binaries.
//!
//! - [`postgres`]: configuration, pooled connections (with retry), migrations, health checks
//! - [`common`]: the unified [`DatabaseError`] and the retry/backoff helper
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "users_api").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::DatabaseError;
