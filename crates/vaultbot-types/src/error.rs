use thiserror::Error;

/// Errors from storage backends and the cache in front of them.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No record exists for the requested key.
    #[error("record not found")]
    NotFound,

    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    /// A prepared statement is missing or already released. Indicates a
    /// misconfigured backend, not a data problem.
    #[error("prepared statement unavailable: {0}")]
    Statement(String),

    #[error("migration failed: {0}")]
    Migration(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound)
    }
}

/// Errors from the credential cipher.
///
/// IMPORTANT: variants never carry plaintext, ciphertext or key material so
/// they are safe to log.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    #[error("ciphertext is not valid base64")]
    Encoding,

    #[error("invalid ciphertext: too short")]
    CiphertextTooShort,

    #[error("decrypted data is not valid UTF-8")]
    InvalidUtf8,

    #[error("random source unavailable")]
    RandomSource,
}

/// Errors surfaced by the vault to its callers.
///
/// `NotFound` is kept separate from every other failure so callers can tell
/// "absent" apart from "broken".
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("credential not found")]
    NotFound,

    #[error("encryption failed: {0}")]
    Encrypt(#[source] CryptoError),

    #[error("decryption failed: {0}")]
    Decrypt(#[source] CryptoError),

    #[error("storage failure: {0}")]
    Storage(#[source] StorageError),
}

impl VaultError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::NotFound)
    }
}

impl From<StorageError> for VaultError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => VaultError::NotFound,
            other => VaultError::Storage(other),
        }
    }
}

/// Errors while loading process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("encryption key not set (VAULTBOT_ENCRYPTION_KEY)")]
    MissingEncryptionKey,

    #[error("unknown database type: '{0}'")]
    UnknownDatabase(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_not_found_maps_to_vault_not_found() {
        let err: VaultError = StorageError::NotFound.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_storage_failure_is_wrapped() {
        let err: VaultError = StorageError::Query("syntax error".to_string()).into();
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "storage failure: query error: syntax error");
    }

    #[test]
    fn test_crypto_error_display() {
        let err = CryptoError::InvalidKeyLength(7);
        assert_eq!(
            err.to_string(),
            "invalid key length: 7 bytes (expected 16, 24 or 32)"
        );
    }

    #[test]
    fn test_unknown_database_display() {
        let err = ConfigError::UnknownDatabase("mysql".to_string());
        assert_eq!(err.to_string(), "unknown database type: 'mysql'");
    }
}
