//! PostgreSQL data-access layer.
//!
//! Owns the connection pool, the schema migrations, the dynamic clause
//! builders and the repositories for users and work sessions.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use timetrack_core::error::CoreError;

pub mod clause;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Error returned by every repository operation.
///
/// Domain failures (missing rows, malformed identifiers, empty patches) are
/// carried as [`CoreError`]; anything the store itself reports is passed
/// through untouched as [`DbError::Store`].
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Connection pool sizing.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 20,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Create a connection pool from a database URL.
pub async fn create_pool(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await
}

/// Round-trip a trivial statement to confirm the store is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
