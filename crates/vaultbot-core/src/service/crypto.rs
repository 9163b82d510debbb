//! Cryptographic ports used by the vault.
//!
//! Implementations live in vaultbot-infra (`crypto::cipher`, `crypto::hash`);
//! this crate only depends on the traits.

use vaultbot_types::credential::ServiceKey;
use vaultbot_types::error::CryptoError;

/// Symmetric, randomized transform between plaintext and its at-rest text form.
pub trait SecretCipher: Send + Sync {
    /// Encrypt `plaintext`. Empty input maps to empty output.
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError>;

    /// Reverse of [`SecretCipher::encrypt`].
    fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError>;
}

/// Deterministic one-way transform from a service name to its storage key.
pub trait ServiceHasher: Send + Sync {
    fn hash(&self, service: &str) -> ServiceKey;
}
