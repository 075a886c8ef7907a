//! Database pool construction and embedded migrations.

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// The connection pool handed to every handler through `web::Data`.
pub type DbPool = SqlitePool;

/// Opens a pool against `database_url`, creating the database file if needed.
pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;

    info!("Connected to database at {}", database_url);
    Ok(pool)
}

/// Applies the migrations under `migrations/`.
pub async fn migrate(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
    info!("Migrations complete");
    Ok(())
}

/// A migrated in-memory database.
///
/// Every SQLite in-memory connection is its own database, so the pool is pinned
/// to a single connection that is never recycled.
pub async fn connect_in_memory() -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Round-trips a trivial query; used by the health check.
pub async fn ping(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_in_memory_pool_is_migrated() {
        let pool = connect_in_memory().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'todos', 'sessions') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(name,)| name.as_str()).collect();
        assert_eq!(names, vec!["sessions", "todos", "users"]);
        assert!(ping(&pool).await.is_ok());
    }
}
