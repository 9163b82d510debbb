//! Storage layers that wrap a backend and are themselves a backend.

pub mod cached;
