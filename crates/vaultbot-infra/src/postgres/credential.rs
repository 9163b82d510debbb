//! PostgreSQL credential storage.
//!
//! Same contract as the SQLite adapter, over a single `PgPool`. Migrations
//! run once on connect; all statements are prepared through a
//! `QueryRegistry` before the adapter is handed out.

use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Statement};

use vaultbot_core::repository::storage::CredentialStorage;
use vaultbot_types::config::{DatabaseConfig, DatabaseKind};
use vaultbot_types::credential::{ChatId, Credential, ServiceKey};
use vaultbot_types::error::StorageError;

use crate::queries::{QueryName, QueryRegistry, map_sqlx_error};

/// Schema migrations for the PostgreSQL backend.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/postgres");

/// PostgreSQL-backed implementation of `CredentialStorage`.
pub struct PostgresCredentialStorage {
    pool: PgPool,
    queries: QueryRegistry<Postgres>,
}

impl PostgresCredentialStorage {
    /// Wrap an existing pool: apply migrations, then prepare statements.
    pub async fn new(pool: PgPool) -> Result<Self, StorageError> {
        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;

        let queries = QueryRegistry::prepare(&pool, DatabaseKind::Postgres).await?;
        Ok(Self { pool, queries })
    }

    /// Connect to `database_url` with the pool limits from `config`.
    pub async fn connect(database_url: &str, config: &DatabaseConfig) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        tracing::debug!("postgres pool ready");

        Self::new(pool).await
    }
}

impl CredentialStorage for PostgresCredentialStorage {
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
            .execute(&self.pool)
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
            .fetch_optional(&self.pool)
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
            .execute(&self.pool)
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
            .fetch_optional(&self.pool)
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
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn close(&self) {
        self.queries.close();
        self.pool.close().await;
        tracing::debug!("postgres storage closed");
    }
}
