//! In-memory storage double shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use vaultbot_types::credential::{ChatId, Credential, ServiceKey};
use vaultbot_types::error::StorageError;

use crate::repository::storage::CredentialStorage;

#[derive(Default)]
struct Inner {
    secrets: Mutex<HashMap<(ChatId, ServiceKey), Credential>>,
    langs: Mutex<HashMap<ChatId, String>>,
    gets: AtomicUsize,
    lang_gets: AtomicUsize,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

/// Cloneable handle: clones share the same "durable" state, which lets a test
/// build a fresh cache over an existing backend to simulate a restart.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Inner>,
}

impl MemoryStorage {
    /// Number of credential reads that reached this backend.
    pub fn get_calls(&self) -> usize {
        self.inner.gets.load(Ordering::SeqCst)
    }

    /// Number of language reads that reached this backend.
    pub fn lang_get_calls(&self) -> usize {
        self.inner.lang_gets.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Peek at the stored row without counting as a backend read.
    pub fn stored(&self, chat_id: ChatId, service: &ServiceKey) -> Option<Credential> {
        self.inner
            .secrets
            .lock()
            .unwrap()
            .get(&(chat_id, service.clone()))
            .cloned()
    }

    pub fn stored_lang(&self, chat_id: ChatId) -> Option<String> {
        self.inner.langs.lock().unwrap().get(&chat_id).cloned()
    }

    fn check_write(&self) -> Result<(), StorageError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("backend unavailable".to_string()));
        }
        Ok(())
    }

    fn check_read(&self) -> Result<(), StorageError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("backend unavailable".to_string()));
        }
        Ok(())
    }
}

impl CredentialStorage for MemoryStorage {
    async fn save(
        &self,
        chat_id: ChatId,
        service: &ServiceKey,
        credential: &Credential,
    ) -> Result<(), StorageError> {
        self.check_write()?;
        // Yield so concurrent saves actually interleave in tests.
        tokio::task::yield_now().await;
        self.inner
            .secrets
            .lock()
            .unwrap()
            .insert((chat_id, service.clone()), credential.clone());
        Ok(())
    }

    async fn get(&self, chat_id: ChatId, service: &ServiceKey) -> Result<Credential, StorageError> {
        self.inner.gets.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        self.stored(chat_id, service).ok_or(StorageError::NotFound)
    }

    async fn delete(&self, chat_id: ChatId, service: &ServiceKey) -> Result<(), StorageError> {
        self.check_write()?;
        self.inner
            .secrets
            .lock()
            .unwrap()
            .remove(&(chat_id, service.clone()))
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn get_lang(&self, chat_id: ChatId) -> Result<String, StorageError> {
        self.inner.lang_gets.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        self.stored_lang(chat_id).ok_or(StorageError::NotFound)
    }

    async fn set_lang(&self, chat_id: ChatId, lang: &str) -> Result<(), StorageError> {
        self.check_write()?;
        self.inner
            .langs
            .lock()
            .unwrap()
            .insert(chat_id, lang.to_string());
        Ok(())
    }
}
