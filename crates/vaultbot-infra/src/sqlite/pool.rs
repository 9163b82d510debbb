//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. `DatabasePool` keeps a
//! multi-connection reader pool for concurrent lookups and a single-connection
//! writer pool for serialized upserts and deletes.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use vaultbot_types::config::DatabaseConfig;
use vaultbot_types::error::StorageError;

/// Schema migrations for the SQLite backend.
pub(crate) static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: up to `max_connections` read-only connections for SELECTs.
/// - `writer`: one connection for INSERT/UPDATE/DELETE.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open both pools and bring the schema up to date.
    ///
    /// Migrations run on the writer before the reader pool is opened, so
    /// read-only connections never observe a half-created schema.
    pub async fn new(database_url: &str, config: &DatabaseConfig) -> Result<Self, StorageError> {
        let acquire_timeout = Duration::from_secs(config.acquire_timeout_secs);

        let base_opts = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(acquire_timeout)
            .connect_with(write_opts)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        MIGRATOR
            .run(&writer)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;

        let reader = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(acquire_timeout)
            .connect_with(read_opts)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        tracing::debug!(url = %database_url, "sqlite pool ready");

        Ok(Self { reader, writer })
    }

    /// Close both pools, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.writer.close().await;
        self.reader.close().await;
    }
}

/// SQLite URL of the database file inside `data_dir`.
pub fn default_database_url(data_dir: &Path) -> String {
    format!("sqlite://{}", data_dir.join("vaultbot.db").display())
}
