//! Application state wiring the vault together.
//!
//! The vault is generic over storage, cipher and hasher; AppState pins it to
//! the concrete infra implementations chosen from configuration.

use std::sync::Arc;

use anyhow::Context;

use vaultbot_core::repository::box_storage::BoxCredentialStorage;
use vaultbot_core::service::vault::Vault;
use vaultbot_core::storage::cached::CachedStorage;
use vaultbot_infra::backend::open_backend;
use vaultbot_infra::config::{encryption_key_from_env, load_effective_config, resolve_data_dir};
use vaultbot_infra::crypto::cipher::AesCfbCipher;
use vaultbot_infra::crypto::hash::Sha256ServiceHasher;

/// Vault pinned to the cache over whichever backend the config selected.
pub type ConcreteVault =
    Vault<CachedStorage<BoxCredentialStorage>, AesCfbCipher, Sha256ServiceHasher>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub vault: Arc<ConcreteVault>,
}

impl AppState {
    /// Load configuration, open the backend and wire the vault.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        let config = load_effective_config(&data_dir)
            .await
            .context("failed to load configuration")?;

        let key = encryption_key_from_env()?;
        let cipher =
            AesCfbCipher::from_secret(&key).context("VAULTBOT_ENCRYPTION_KEY is not a valid AES key")?;

        let backend = open_backend(&config.database, &data_dir)
            .await
            .with_context(|| format!("failed to open {} backend", config.database.kind))?;

        let storage = CachedStorage::with_default_language(backend, config.default_language.clone());
        let vault = Vault::with_default_language(
            storage,
            cipher,
            Sha256ServiceHasher::new(),
            config.default_language.clone(),
        );

        tracing::debug!(data_dir = %data_dir.display(), "application state ready");

        Ok(Self {
            vault: Arc::new(vault),
        })
    }

    /// Release prepared statements and pooled connections.
    pub async fn shutdown(&self) {
        self.vault.close().await;
    }
}
