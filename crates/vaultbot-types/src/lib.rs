//! Shared domain types for vaultbot.
//!
//! Chat identifiers, hashed service keys, credentials, configuration and the
//! error enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod credential;
pub mod error;
