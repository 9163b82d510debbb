//! Infrastructure layer for vaultbot.
//!
//! Implementations of the traits defined in `vaultbot-core`: SQLite and
//! PostgreSQL credential storage over prepared statements, AES-CFB
//! encryption, SHA-256 service hashing, plus configuration loading.

pub mod backend;
pub mod config;
pub mod crypto;
pub mod postgres;
pub mod queries;
pub mod sqlite;
