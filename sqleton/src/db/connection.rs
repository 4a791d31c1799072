//! Database connection handling
//!
//! This module opens the SQLite database that is being diagrammed. The
//! database is always opened read-only.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// A read-only handle on a SQLite database file
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: SqlitePool,
    path: PathBuf,
}

impl DatabaseConnection {
    /// Open the database at `path` using the pool settings from configuration
    pub async fn connect(path: impl AsRef<Path>, config: &DatabaseConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let pool_size = config.pool_size.unwrap_or(DEFAULT_POOL_SIZE).max(1);
        let timeout_seconds = config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|source| Error::ConnectionError {
                path: path.display().to_string(),
                source,
            })?;

        tracing::debug!(path = %path.display(), pool_size, "Opened database");

        Ok(Self { pool, path })
    }

    /// The underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Name used for the graph: the file name without its extension
    pub fn display_name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// The file name including its extension
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
