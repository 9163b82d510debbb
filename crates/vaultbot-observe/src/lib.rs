//! Observability setup for vaultbot: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
