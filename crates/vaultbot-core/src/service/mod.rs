//! Business logic services (use cases).
//!
//! Services orchestrate storage calls and cryptography. They depend on traits
//! (ports) -- never on concrete infrastructure implementations.

pub mod crypto;
pub mod vault;
