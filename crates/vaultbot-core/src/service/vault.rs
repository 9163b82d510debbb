//! Credential vault service.
//!
//! The vault is the only layer that sees plaintext. It hashes service names
//! into storage keys, encrypts login and password before they are handed to
//! storage, and decrypts them on the way back. Persistence is delegated to a
//! `CredentialStorage` (normally the cache in front of a SQL backend).
//!
//! Language preference calls come in two flavours: `get_lang`/`set_lang`
//! never fail outward (errors are logged and swallowed, the contract the chat
//! front end relies on), while `try_get_lang`/`try_set_lang` propagate.

use vaultbot_types::credential::{ChatId, Credential, DEFAULT_LANGUAGE, ServiceKey};
use vaultbot_types::error::{CryptoError, StorageError, VaultError};

use crate::repository::storage::CredentialStorage;
use crate::service::crypto::{SecretCipher, ServiceHasher};

/// Encrypting, hashing front door to credential storage.
///
/// Generic over storage and crypto traits; vaultbot-core never depends on
/// vaultbot-infra.
pub struct Vault<S: CredentialStorage, C: SecretCipher, H: ServiceHasher> {
    storage: S,
    cipher: C,
    hasher: H,
    default_language: String,
}

impl<S: CredentialStorage, C: SecretCipher, H: ServiceHasher> Vault<S, C, H> {
    pub fn new(storage: S, cipher: C, hasher: H) -> Self {
        Self::with_default_language(storage, cipher, hasher, DEFAULT_LANGUAGE)
    }

    pub fn with_default_language(
        storage: S,
        cipher: C,
        hasher: H,
        default_language: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            cipher,
            hasher,
            default_language: default_language.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Storage key for a service name.
    pub fn hash(&self, text: &str) -> ServiceKey {
        self.hasher.hash(text)
    }

    pub fn encrypt(&self, text: &str) -> Result<String, CryptoError> {
        self.cipher.encrypt(text)
    }

    pub fn decrypt(&self, text: &str) -> Result<String, CryptoError> {
        self.cipher.decrypt(text)
    }

    /// Encrypt and store a credential under the hashed service name.
    ///
    /// Both fields are encrypted before anything is written; an encryption
    /// failure leaves storage untouched.
    pub async fn save(
        &self,
        chat_id: ChatId,
        service: &str,
        login: &str,
        password: &str,
    ) -> Result<(), VaultError> {
        let credential = Credential {
            login: self.encrypt(login).map_err(|e| self.fail_encrypt(chat_id, e))?,
            password: self.encrypt(password).map_err(|e| self.fail_encrypt(chat_id, e))?,
        };
        let key = self.hash(service);

        self.storage
            .save(chat_id, &key, &credential)
            .await
            .map_err(|e| self.fail_storage(chat_id, "save", e))
    }

    /// Fetch and decrypt the credential stored for a service.
    ///
    /// A missing record is reported as `VaultError::NotFound`.
    pub async fn get(&self, chat_id: ChatId, service: &str) -> Result<Credential, VaultError> {
        let key = self.hash(service);

        let stored = self
            .storage
            .get(chat_id, &key)
            .await
            .map_err(|e| self.fail_storage(chat_id, "get", e))?;

        Ok(Credential {
            login: self
                .decrypt(&stored.login)
                .map_err(|e| self.fail_decrypt(chat_id, e))?,
            password: self
                .decrypt(&stored.password)
                .map_err(|e| self.fail_decrypt(chat_id, e))?,
        })
    }

    pub async fn delete(&self, chat_id: ChatId, service: &str) -> Result<(), VaultError> {
        let key = self.hash(service);

        self.storage
            .delete(chat_id, &key)
            .await
            .map_err(|e| self.fail_storage(chat_id, "delete", e))
    }

    /// Language of a user, falling back to the default on any failure.
    ///
    /// A user with no stored language gets the default written durably.
    pub async fn get_lang(&self, chat_id: ChatId) -> String {
        match self.storage.get_lang(chat_id).await {
            Ok(lang) => lang,
            Err(StorageError::NotFound) => {
                self.set_lang(chat_id, &self.default_language).await;
                self.default_language.clone()
            }
            Err(err) => {
                tracing::warn!(%chat_id, error = %err, "vault get_lang failed, using default");
                self.default_language.clone()
            }
        }
    }

    /// Best-effort language update: failures are logged, never returned.
    pub async fn set_lang(&self, chat_id: ChatId, lang: &str) {
        if let Err(err) = self.storage.set_lang(chat_id, lang).await {
            tracing::warn!(%chat_id, error = %err, "vault set_lang failed");
        }
    }

    /// Like [`Vault::get_lang`] but surfaces storage failures other than NotFound.
    pub async fn try_get_lang(&self, chat_id: ChatId) -> Result<String, VaultError> {
        match self.storage.get_lang(chat_id).await {
            Ok(lang) => Ok(lang),
            Err(StorageError::NotFound) => {
                self.try_set_lang(chat_id, &self.default_language).await?;
                Ok(self.default_language.clone())
            }
            Err(err) => Err(VaultError::Storage(err)),
        }
    }

    pub async fn try_set_lang(&self, chat_id: ChatId, lang: &str) -> Result<(), VaultError> {
        self.storage
            .set_lang(chat_id, lang)
            .await
            .map_err(VaultError::Storage)
    }

    /// Release storage resources. Call once before shutdown.
    pub async fn close(&self) {
        self.storage.close().await;
    }

    fn fail_encrypt(&self, chat_id: ChatId, err: CryptoError) -> VaultError {
        tracing::warn!(%chat_id, error = %err, "vault encrypt failed");
        VaultError::Encrypt(err)
    }

    fn fail_decrypt(&self, chat_id: ChatId, err: CryptoError) -> VaultError {
        tracing::warn!(%chat_id, error = %err, "vault decrypt failed");
        VaultError::Decrypt(err)
    }

    fn fail_storage(&self, chat_id: ChatId, op: &'static str, err: StorageError) -> VaultError {
        if !err.is_not_found() {
            tracing::warn!(%chat_id, op, error = %err, "vault storage call failed");
        }
        VaultError::from(err)
    }
}
