//! SQLite connection pool with WAL mode.
//!
//! Every pooled connection is opened with foreign key enforcement on, since
//! SQLite scopes that setting to the connection rather than the file.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};

use crate::config::DbConfig;

/// Type alias for the SQLite connection pool.
pub type DbPool = Pool<Sqlite>;

/// Create a new connection pool for the database described by `config`.
///
/// The database file is created if missing, but its parent directory must
/// already exist.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let connect_options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout());

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_with(connect_options)
        .await?;

    let mode: (String,) = sqlx::query_as("PRAGMA journal_mode")
        .fetch_one(&pool)
        .await?;

    if !mode.0.eq_ignore_ascii_case("wal") {
        log::warn!(
            "Expected WAL journal mode for {}, got {}",
            config.path.display(),
            mode.0
        );
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_pool_with_wal_and_foreign_keys() {
        let dir = tempdir().unwrap();
        let config = DbConfig::at(dir.path().join("test.db"));

        let pool = create_pool(&config).await.unwrap();

        let mode: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(mode.0.to_lowercase(), "wal");

        let fk: (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(fk.0, 1);
    }

    #[tokio::test]
    async fn test_pool_applies_config_limits() {
        let dir = tempdir().unwrap();
        let config = DbConfig {
            max_connections: 2,
            min_connections: 0,
            busy_timeout_secs: 7,
            acquire_timeout_secs: 3,
            ..DbConfig::at(dir.path().join("limits.db"))
        };

        let pool = create_pool(&config).await.unwrap();

        assert_eq!(pool.options().get_max_connections(), 2);
        assert_eq!(pool.options().get_min_connections(), 0);
        assert_eq!(pool.options().get_acquire_timeout(), config.acquire_timeout());

        let busy: (i64,) = sqlx::query_as("PRAGMA busy_timeout")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(busy.0, 7_000);
    }
}
