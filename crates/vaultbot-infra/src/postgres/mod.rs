//! PostgreSQL storage layer.

pub mod credential;
