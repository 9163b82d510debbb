//! SHA-256 service-name hashing.
//!
//! Implements the `ServiceHasher` trait from `vaultbot-core` using the `sha2`
//! crate. Digests are encoded as standard base64 without padding (43 chars),
//! which is the key format already present in existing databases.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use sha2::{Digest, Sha256};

use vaultbot_core::service::crypto::ServiceHasher;
use vaultbot_types::credential::ServiceKey;

/// SHA-256 implementation of `ServiceHasher`.
pub struct Sha256ServiceHasher;

impl Sha256ServiceHasher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Sha256ServiceHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceHasher for Sha256ServiceHasher {
    fn hash(&self, service: &str) -> ServiceKey {
        let digest = Sha256::digest(service.as_bytes());
        ServiceKey::from_digest(STANDARD_NO_PAD.encode(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        let hasher = Sha256ServiceHasher::new();
        assert_eq!(
            hasher.hash("test").as_str(),
            "n4bQgYhMfWWaL+qgxVrQFaO/TxsrC4Is0V1sFbDwCgg"
        );
        assert_eq!(
            hasher.hash("fnqjlnfjkqndfjkqnfjqndfqjnj").as_str(),
            "iSRSDMOs2PAGQ5hS4CBvaU53UrRpfF8TXSOoONJpv0w"
        );
    }

    #[test]
    fn test_sha256_deterministic() {
        let hasher = Sha256ServiceHasher::new();
        assert_eq!(hasher.hash("github"), hasher.hash("github"));
        assert_eq!(hasher.hash("github"), Sha256ServiceHasher::new().hash("github"));
    }

    #[test]
    fn test_sha256_different_services() {
        let hasher = Sha256ServiceHasher::new();
        assert_ne!(hasher.hash("github"), hasher.hash("gitlab"));
        assert_ne!(hasher.hash("github"), hasher.hash("GitHub"));
    }

    #[test]
    fn test_digest_shape() {
        let key = Sha256ServiceHasher::new().hash("");
        assert_eq!(key.as_str().len(), 43);
        assert!(!key.as_str().contains('='));
    }
}
