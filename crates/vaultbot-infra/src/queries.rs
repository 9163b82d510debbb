//! Named, dialect-specific SQL statements and their prepared handles.
//!
//! Every backend operation runs through a statement looked up by
//! [`QueryName`]. The text for each (dialect, name) pair lives in
//! [`statement_text`]; [`QueryRegistry::prepare`] compiles all of them once
//! against a freshly migrated pool so a schema mismatch fails at startup
//! instead of on the first user request.
//!
//! Each backend owns its own registry; there is no process-global table.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use sqlx::{Database, Executor};

use vaultbot_types::config::DatabaseKind;
use vaultbot_types::error::StorageError;

/// Stable names of the backend operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryName {
    /// Upsert a credential row keyed by (owner, service).
    AddService,
    /// Upsert the language of a chat.
    AddOrUpdateChatLang,
    GetService,
    GetLang,
    DeleteService,
}

impl QueryName {
    pub const ALL: [QueryName; 5] = [
        QueryName::AddService,
        QueryName::AddOrUpdateChatLang,
        QueryName::GetService,
        QueryName::GetLang,
        QueryName::DeleteService,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QueryName::AddService => "add_service",
            QueryName::AddOrUpdateChatLang => "add_or_update_chat_lang",
            QueryName::GetService => "get_service",
            QueryName::GetLang => "get_lang",
            QueryName::DeleteService => "delete_service",
        }
    }
}

impl fmt::Display for QueryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL text of a statement for the given dialect.
///
/// Parameter order is identical across dialects so the adapters bind the same
/// way regardless of backend.
pub fn statement_text(dialect: DatabaseKind, name: QueryName) -> &'static str {
    match (dialect, name) {
        (DatabaseKind::Sqlite, QueryName::AddService) => {
            "INSERT INTO services (service, login, password, owner) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (owner, service) DO UPDATE SET \
             login = excluded.login, password = excluded.password, owner = excluded.owner"
        }
        (DatabaseKind::Sqlite, QueryName::AddOrUpdateChatLang) => {
            "INSERT INTO chats (chat_id, chat_lang) VALUES (?1, ?2) \
             ON CONFLICT (chat_id) DO UPDATE SET chat_lang = excluded.chat_lang"
        }
        (DatabaseKind::Sqlite, QueryName::GetService) => {
            "SELECT login, password FROM services WHERE service = ?1 AND owner = ?2"
        }
        (DatabaseKind::Sqlite, QueryName::GetLang) => {
            "SELECT chat_lang FROM chats WHERE chat_id = ?1"
        }
        (DatabaseKind::Sqlite, QueryName::DeleteService) => {
            "DELETE FROM services WHERE service = ?1 AND owner = ?2"
        }
        (DatabaseKind::Postgres, QueryName::AddService) => {
            "INSERT INTO services (service, login, password, owner) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (owner, service) DO UPDATE SET \
             login = EXCLUDED.login, password = EXCLUDED.password, owner = EXCLUDED.owner"
        }
        (DatabaseKind::Postgres, QueryName::AddOrUpdateChatLang) => {
            "INSERT INTO chats (chat_id, chat_lang) VALUES ($1, $2) \
             ON CONFLICT (chat_id) DO UPDATE SET chat_lang = EXCLUDED.chat_lang"
        }
        (DatabaseKind::Postgres, QueryName::GetService) => {
            "SELECT login, password FROM services WHERE service = $1 AND owner = $2"
        }
        (DatabaseKind::Postgres, QueryName::GetLang) => {
            "SELECT chat_lang FROM chats WHERE chat_id = $1"
        }
        (DatabaseKind::Postgres, QueryName::DeleteService) => {
            "DELETE FROM services WHERE service = $1 AND owner = $2"
        }
    }
}

/// Prepared statement handles of one backend, keyed by [`QueryName`].
///
/// A slot is `None` once [`QueryRegistry::close`] has released it.
pub struct QueryRegistry<DB: Database> {
    dialect: DatabaseKind,
    statements: RwLock<HashMap<QueryName, Option<Arc<DB::Statement<'static>>>>>,
}

impl<DB: Database> QueryRegistry<DB> {
    /// Prepare every statement of `dialect` against `executor`.
    ///
    /// Fails on the first statement the database rejects, which normally
    /// means migrations did not run.
    pub async fn prepare<'c, E>(executor: E, dialect: DatabaseKind) -> Result<Self, StorageError>
    where
        E: Executor<'c, Database = DB> + Copy,
    {
        let mut statements = HashMap::with_capacity(QueryName::ALL.len());

        for name in QueryName::ALL {
            let statement = executor
                .prepare(statement_text(dialect, name))
                .await
                .map_err(|e| StorageError::Statement(format!("{name}: {e}")))?;
            statements.insert(name, Some(Arc::new(statement)));
        }

        tracing::debug!(%dialect, count = statements.len(), "prepared statements");

        Ok(Self {
            dialect,
            statements: RwLock::new(statements),
        })
    }

    pub fn dialect(&self) -> DatabaseKind {
        self.dialect
    }

    /// Prepared handle for `name`.
    ///
    /// Returns `StorageError::Statement` if the name was never prepared or
    /// the registry has been closed.
    pub fn statement(&self, name: QueryName) -> Result<Arc<DB::Statement<'static>>, StorageError> {
        let statements = self.statements.read().unwrap_or_else(PoisonError::into_inner);
        match statements.get(&name) {
            Some(Some(statement)) => Ok(Arc::clone(statement)),
            Some(None) => Err(StorageError::Statement(format!("{name}: statement closed"))),
            None => Err(StorageError::Statement(format!("{name}: statement not prepared"))),
        }
    }

    /// Release every handle. Later lookups fail with `StorageError::Statement`.
    pub fn close(&self) {
        let mut statements = self.statements.write().unwrap_or_else(PoisonError::into_inner);
        for slot in statements.values_mut() {
            *slot = None;
        }
    }
}

/// Translate a driver error into the shared storage taxonomy.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::RowNotFound => StorageError::NotFound,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageError::Connection(err.to_string())
        }
        other => StorageError::Query(other.to_string()),
    }
}
