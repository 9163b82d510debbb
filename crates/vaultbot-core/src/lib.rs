//! Business logic and storage trait definitions for vaultbot.
//!
//! This crate defines the "ports" (storage and crypto traits) that the
//! infrastructure layer implements, the write-through cache that fronts every
//! backend, and the vault service. It depends only on `vaultbot-types` --
//! never on `vaultbot-infra` or any database/crypto crate.

pub mod repository;
pub mod service;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
