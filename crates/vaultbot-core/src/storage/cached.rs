//! Write-through cache in front of a durable credential backend.
//!
//! Two concurrent maps live for the whole process: user -> (service ->
//! credential) and user -> language. Nothing is ever evicted.
//!
//! Secrets and languages follow different miss policies:
//! - A secret miss is served from the backend and NOT written back to the cache.
//! - A language miss stores the default immediately, then replaces it with
//!   whatever the backend holds.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::Mutex;

use vaultbot_types::credential::{ChatId, Credential, DEFAULT_LANGUAGE, ServiceKey};
use vaultbot_types::error::StorageError;

use crate::repository::storage::CredentialStorage;

/// Per-user slice of the secrets cache.
#[derive(Default)]
struct UserSecrets {
    entries: DashMap<ServiceKey, Credential>,
    /// Held across the cache write and the backend write of save/delete so
    /// both layers end up agreeing on the last completed write.
    write_lock: Mutex<()>,
}

/// Caching `CredentialStorage` wrapping any other `CredentialStorage`.
pub struct CachedStorage<S> {
    backend: S,
    secrets: DashMap<ChatId, Arc<UserSecrets>>,
    languages: DashMap<ChatId, String>,
    default_language: String,
}

impl<S: CredentialStorage> CachedStorage<S> {
    pub fn new(backend: S) -> Self {
        Self::with_default_language(backend, DEFAULT_LANGUAGE)
    }

    pub fn with_default_language(backend: S, default_language: impl Into<String>) -> Self {
        Self {
            backend,
            secrets: DashMap::new(),
            languages: DashMap::new(),
            default_language: default_language.into(),
        }
    }

    /// The language seeded into the cache when a user is first seen.
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Borrow the wrapped backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Get or atomically create the sub-map of a user.
    ///
    /// The map shard guard is released before returning, so callers may await
    /// while holding the returned `Arc`.
    fn user_secrets(&self, chat_id: ChatId) -> Arc<UserSecrets> {
        let entry = self.secrets.entry(chat_id).or_default();
        Arc::clone(entry.value())
    }
}

impl<S: CredentialStorage> CredentialStorage for CachedStorage<S> {
    async fn save(
        &self,
        chat_id: ChatId,
        service: &ServiceKey,
        credential: &Credential,
    ) -> Result<(), StorageError> {
        let user = self.user_secrets(chat_id);
        let _guard = user.write_lock.lock().await;

        // Cache first; a failed backend write leaves the cached value in place.
        user.entries.insert(service.clone(), credential.clone());
        self.backend.save(chat_id, service, credential).await
    }

    async fn get(&self, chat_id: ChatId, service: &ServiceKey) -> Result<Credential, StorageError> {
        let user = self.user_secrets(chat_id);

        let cached = user.entries.get(service).map(|entry| entry.value().clone());
        if let Some(credential) = cached {
            tracing::debug!(%chat_id, "credential cache hit");
            return Ok(credential);
        }

        tracing::debug!(%chat_id, "credential cache miss, reading backend");
        self.backend.get(chat_id, service).await
    }

    async fn delete(&self, chat_id: ChatId, service: &ServiceKey) -> Result<(), StorageError> {
        let user = self.user_secrets(chat_id);
        let _guard = user.write_lock.lock().await;

        user.entries.remove(service);
        self.backend.delete(chat_id, service).await
    }

    async fn get_lang(&self, chat_id: ChatId) -> Result<String, StorageError> {
        let seeded = match self.languages.entry(chat_id) {
            Entry::Occupied(entry) => Some(entry.get().clone()),
            Entry::Vacant(entry) => {
                entry.insert(self.default_language.clone());
                None
            }
        };
        if let Some(lang) = seeded {
            return Ok(lang);
        }

        // First sighting of this user: the default stays cached even if the
        // backend read below fails.
        let lang = self.backend.get_lang(chat_id).await?;
        self.languages.insert(chat_id, lang.clone());
        Ok(lang)
    }

    async fn set_lang(&self, chat_id: ChatId, lang: &str) -> Result<(), StorageError> {
        self.languages.insert(chat_id, lang.to_string());
        self.backend.set_lang(chat_id, lang).await
    }

    async fn close(&self) {
        self.backend.close().await
    }
}
