//! SQLite credential storage.
//!
//! Implements `CredentialStorage` from `vaultbot-core` on top of the split
//! reader/writer pool. Every statement runs through the prepared handles of
//! a `QueryRegistry`; values are stored exactly as received (already
//! encrypted, service already hashed).

use sqlx::{Sqlite, Statement};

use vaultbot_core::repository::storage::CredentialStorage;
use vaultbot_types::config::{DatabaseConfig, DatabaseKind};
use vaultbot_types::credential::{ChatId, Credential, ServiceKey};
use vaultbot_types::error::StorageError;

use super::pool::DatabasePool;
use crate::queries::{QueryName, QueryRegistry, map_sqlx_error};

/// SQLite-backed implementation of `CredentialStorage`.
///
/// Never logs credential fields.
pub struct SqliteCredentialStorage {
    pool: DatabasePool,
    queries: QueryRegistry<Sqlite>,
}

impl SqliteCredentialStorage {
    /// Wrap an already migrated pool and prepare the statement set on it.
    pub async fn new(pool: DatabasePool) -> Result<Self, StorageError> {
        let queries = QueryRegistry::prepare(&pool.writer, DatabaseKind::Sqlite).await?;
        Ok(Self { pool, queries })
    }

    /// Open `database_url`, apply migrations and prepare statements.
    pub async fn connect(database_url: &str, config: &DatabaseConfig) -> Result<Self, StorageError> {
        let pool = DatabasePool::new(database_url, config).await?;
        Self::new(pool).await
    }

    pub fn queries(&self) -> &QueryRegistry<Sqlite> {
        &self.queries
    }
}

impl CredentialStorage for SqliteCredentialStorage {
    async fn save(
        &self,
        chat_id: ChatId,
        service: &ServiceKey,
        credential: &Credential,
    ) -> Result<(), StorageError> {
        let statement = self.queries.statement(QueryName::AddService)?;

        statement
            .query()
            .bind(service.as_str())
            .bind(&credential.login)
            .bind(&credential.password)
            .bind(chat_id.get())
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, chat_id: ChatId, service: &ServiceKey) -> Result<Credential, StorageError> {
        let statement = self.queries.statement(QueryName::GetService)?;

        let row = statement
            .query_as::<(String, String)>()
            .bind(service.as_str())
            .bind(chat_id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|(login, password)| Credential { login, password })
            .ok_or(StorageError::NotFound)
    }

    async fn delete(&self, chat_id: ChatId, service: &ServiceKey) -> Result<(), StorageError> {
        let statement = self.queries.statement(QueryName::DeleteService)?;

        let result = statement
            .query()
            .bind(service.as_str())
            .bind(chat_id.get())
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn get_lang(&self, chat_id: ChatId) -> Result<String, StorageError> {
        let statement = self.queries.statement(QueryName::GetLang)?;

        let row = statement
            .query_as::<(String,)>()
            .bind(chat_id.get())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|(lang,)| lang).ok_or(StorageError::NotFound)
    }

    async fn set_lang(&self, chat_id: ChatId, lang: &str) -> Result<(), StorageError> {
        let statement = self.queries.statement(QueryName::AddOrUpdateChatLang)?;

        statement
            .query()
            .bind(chat_id.get())
            .bind(lang)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn close(&self) {
        self.queries.close();
        self.pool.close().await;
        tracing::debug!("sqlite storage closed");
    }
}
