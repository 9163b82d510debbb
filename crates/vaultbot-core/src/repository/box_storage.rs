//! BoxCredentialStorage -- object-safe dynamic dispatch wrapper for CredentialStorage.
//!
//! 1. Define an object-safe `CredentialStorageDyn` trait with boxed futures
//! 2. Blanket-impl `CredentialStorageDyn` for all `T: CredentialStorage`
//! 3. `BoxCredentialStorage` wraps `Box<dyn CredentialStorageDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use vaultbot_types::credential::{ChatId, Credential, ServiceKey};
use vaultbot_types::error::StorageError;

use super::storage::CredentialStorage;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`CredentialStorage`] with boxed futures.
pub trait CredentialStorageDyn: Send + Sync {
    fn save_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        service: &'a ServiceKey,
        credential: &'a Credential,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    fn get_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        service: &'a ServiceKey,
    ) -> BoxFuture<'a, Result<Credential, StorageError>>;

    fn delete_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        service: &'a ServiceKey,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    fn get_lang_boxed(&self, chat_id: ChatId) -> BoxFuture<'_, Result<String, StorageError>>;

    fn set_lang_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        lang: &'a str,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    fn close_boxed(&self) -> BoxFuture<'_, ()>;
}

impl<T: CredentialStorage> CredentialStorageDyn for T {
    fn save_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        service: &'a ServiceKey,
        credential: &'a Credential,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(self.save(chat_id, service, credential))
    }

    fn get_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        service: &'a ServiceKey,
    ) -> BoxFuture<'a, Result<Credential, StorageError>> {
        Box::pin(self.get(chat_id, service))
    }

    fn delete_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        service: &'a ServiceKey,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(self.delete(chat_id, service))
    }

    fn get_lang_boxed(&self, chat_id: ChatId) -> BoxFuture<'_, Result<String, StorageError>> {
        Box::pin(self.get_lang(chat_id))
    }

    fn set_lang_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        lang: &'a str,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(self.set_lang(chat_id, lang))
    }

    fn close_boxed(&self) -> BoxFuture<'_, ()> {
        Box::pin(self.close())
    }
}

/// Type-erased storage backend for runtime dialect selection.
///
/// `CredentialStorage` uses RPITIT and cannot be a trait object directly, so
/// the backend chosen from configuration (SQLite or PostgreSQL) is wrapped in
/// this box, which implements `CredentialStorage` itself.
pub struct BoxCredentialStorage {
    inner: Box<dyn CredentialStorageDyn>,
}

impl BoxCredentialStorage {
    pub fn new<T: CredentialStorage + 'static>(storage: T) -> Self {
        Self {
            inner: Box::new(storage),
        }
    }
}

impl CredentialStorage for BoxCredentialStorage {
    async fn save(
        &self,
        chat_id: ChatId,
        service: &ServiceKey,
        credential: &Credential,
    ) -> Result<(), StorageError> {
        self.inner.save_boxed(chat_id, service, credential).await
    }

    async fn get(&self, chat_id: ChatId, service: &ServiceKey) -> Result<Credential, StorageError> {
        self.inner.get_boxed(chat_id, service).await
    }

    async fn delete(&self, chat_id: ChatId, service: &ServiceKey) -> Result<(), StorageError> {
        self.inner.delete_boxed(chat_id, service).await
    }

    async fn get_lang(&self, chat_id: ChatId) -> Result<String, StorageError> {
        self.inner.get_lang_boxed(chat_id).await
    }

    async fn set_lang(&self, chat_id: ChatId, lang: &str) -> Result<(), StorageError> {
        self.inner.set_lang_boxed(chat_id, lang).await
    }

    async fn close(&self) {
        self.inner.close_boxed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStorage;

    #[tokio::test]
    async fn test_box_delegates_to_inner() {
        let storage = BoxCredentialStorage::new(MemoryStorage::default());
        let key = ServiceKey::from_digest("digest");
        let cred = Credential::new("enc-login", "enc-password");

        storage.save(ChatId(1), &key, &cred).await.unwrap();
        assert_eq!(storage.get(ChatId(1), &key).await.unwrap(), cred);

        storage.delete(ChatId(1), &key).await.unwrap();
        assert!(matches!(
            storage.get(ChatId(1), &key).await,
            Err(StorageError::NotFound)
        ));

        storage.set_lang(ChatId(1), "pt").await.unwrap();
        assert_eq!(storage.get_lang(ChatId(1)).await.unwrap(), "pt");
    }
}
