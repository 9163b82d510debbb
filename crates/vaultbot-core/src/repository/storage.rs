//! Credential storage trait definition.

use vaultbot_types::credential::{ChatId, Credential, ServiceKey};
use vaultbot_types::error::StorageError;

/// Storage capability set for credentials and language preferences.
///
/// Implemented by the dialect-specific backends in vaultbot-infra and by the
/// cache that sits in front of them. Values passed in and out are exactly what
/// is persisted: credentials arrive already encrypted, services already hashed.
///
/// Missing records are reported as `StorageError::NotFound`, never as a
/// generic query error.
pub trait CredentialStorage: Send + Sync {
    /// Insert or overwrite the credential stored for `(chat_id, service)`.
    fn save(
        &self,
        chat_id: ChatId,
        service: &ServiceKey,
        credential: &Credential,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Fetch the credential stored for `(chat_id, service)`.
    fn get(
        &self,
        chat_id: ChatId,
        service: &ServiceKey,
    ) -> impl std::future::Future<Output = Result<Credential, StorageError>> + Send;

    /// Remove the credential stored for `(chat_id, service)`.
    /// Returns `NotFound` if nothing was there to delete.
    fn delete(
        &self,
        chat_id: ChatId,
        service: &ServiceKey,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Fetch the language code of a user.
    fn get_lang(
        &self,
        chat_id: ChatId,
    ) -> impl std::future::Future<Output = Result<String, StorageError>> + Send;

    /// Insert or overwrite the language code of a user.
    fn set_lang(
        &self,
        chat_id: ChatId,
        lang: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Release prepared statements and connections. Called once at shutdown.
    fn close(&self) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }
}
