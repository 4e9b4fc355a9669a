//! Database configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default database file name inside a data directory.
pub const DEFAULT_DB_FILE: &str = "reviews.db";

/// Connection settings for the review database.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,

    /// Upper bound on pooled connections.
    pub max_connections: u32,

    /// Connections kept open while idle.
    pub min_connections: u32,

    /// How long a connection waits on a locked database before failing.
    pub busy_timeout_secs: u64,

    /// How long `acquire` waits for a free pooled connection.
    pub acquire_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_FILE),
            max_connections: 5,
            min_connections: 1,
            busy_timeout_secs: 30,
            acquire_timeout_secs: 10,
        }
    }
}

impl DbConfig {
    /// Default settings for the database at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Get the path to the SQLite database file inside `data_dir`.
pub fn get_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DEFAULT_DB_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: DbConfig =
            serde_json::from_str(r#"{"path": "/tmp/r.db", "max_connections": 2}"#).unwrap();
        assert_eq!(config.path, PathBuf::from("/tmp/r.db"));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.busy_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_get_db_path() {
        let path = get_db_path(Path::new("/var/lib/reviews"));
        assert_eq!(path, PathBuf::from("/var/lib/reviews/reviews.db"));
    }
}
