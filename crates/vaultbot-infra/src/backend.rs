//! Backend selection.
//!
//! The dialect is chosen once, from configuration, when the process starts.
//! Everything above this point only sees a `BoxCredentialStorage`.

use std::path::Path;

use vaultbot_core::repository::box_storage::BoxCredentialStorage;
use vaultbot_types::config::{DatabaseConfig, DatabaseKind};
use vaultbot_types::error::StorageError;

use crate::postgres::credential::PostgresCredentialStorage;
use crate::sqlite::credential::SqliteCredentialStorage;
use crate::sqlite::pool::default_database_url;

/// Open the configured backend, run its migrations and prepare statements.
///
/// SQLite without an explicit URL uses `vaultbot.db` inside `data_dir`,
/// creating the directory if needed. PostgreSQL requires a URL.
pub async fn open_backend(
    config: &DatabaseConfig,
    data_dir: &Path,
) -> Result<BoxCredentialStorage, StorageError> {
    match config.kind {
        DatabaseKind::Sqlite => {
            let url = match &config.url {
                Some(url) => url.clone(),
                None => {
                    tokio::fs::create_dir_all(data_dir).await.map_err(|e| {
                        StorageError::Connection(format!(
                            "cannot create data directory {}: {e}",
                            data_dir.display()
                        ))
                    })?;
                    default_database_url(data_dir)
                }
            };

            let storage = SqliteCredentialStorage::connect(&url, config).await?;
            tracing::info!(backend = %config.kind, "credential backend opened");
            Ok(BoxCredentialStorage::new(storage))
        }
        DatabaseKind::Postgres => {
            let url = config.url.as_deref().ok_or_else(|| {
                StorageError::Connection("postgres backend requires a database url".to_string())
            })?;

            let storage = PostgresCredentialStorage::connect(url, config).await?;
            tracing::info!(backend = %config.kind, "credential backend opened");
            Ok(BoxCredentialStorage::new(storage))
        }
    }
}
