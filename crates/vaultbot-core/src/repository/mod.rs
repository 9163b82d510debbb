//! Storage trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (vaultbot-infra) implements. The core crate never depends on any specific
//! storage technology.

pub mod box_storage;
pub mod storage;
