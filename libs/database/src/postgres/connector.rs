use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{RetryConfig, retry, retry_with_backoff};
use crate::DatabaseError;

/// Connect with explicit SeaORM options.
pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Connect using a [`PostgresConfig`], single attempt.
pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    connect_with_options(config.into_connect_options()).await
}

/// Connect using a [`PostgresConfig`], retrying with exponential backoff.
///
/// `None` uses [`RetryConfig::default`]. Handy at startup when the database
/// container comes up after the service.
///
/// ```ignore
/// let retry = RetryConfig::new().with_max_retries(10);
/// let db = connect_from_config_with_retry(config, Some(retry)).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> Result<DatabaseConnection, DatabaseError> {
    let options = config.into_connect_options();
    let attempt = || connect_with_options(options.clone());

    let result = match retry_config {
        Some(policy) => retry_with_backoff(attempt, policy).await,
        None => retry(attempt).await,
    };

    result.map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}

/// Apply every pending migration of `M`.
///
/// `app_name` is only used for logging.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DatabaseError> {
    info!("Running {} database migrations", app_name);
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!("Migrations completed for {}", app_name);
    Ok(())
}
