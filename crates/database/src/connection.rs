use crate::error::DbError;
use configuration::DatabaseConfig;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Opens a connection pool to the SQLite database named by `config.url`,
/// creating the database file if it does not exist yet.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DbError> {
    if config.max_connections == 0 {
        return Err(DbError::ConnectionConfigError("max_connections must be at least 1".to_string()));
    }

    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DbError::ConnectionConfigError(format!("{}: {}", config.url, e)))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    tracing::debug!(url = %config.url, "Connected to the database.");
    Ok(pool)
}

/// A private in-memory database, used by tests and one-off runs.
///
/// Every connection to `sqlite::memory:` sees its own database, so the pool is pinned
/// to a single connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool, DbError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    Ok(pool)
}

/// Applies the embedded migrations, bringing the schema up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
