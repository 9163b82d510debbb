//! Cryptographic operations for vaultbot.
//!
//! - `cipher`: AES-CFB encryption of credential fields at rest
//! - `hash`: SHA-256 digests of service names used as storage keys

pub mod cipher;
pub mod hash;
