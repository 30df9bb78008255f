//! Observability infrastructure
//!
//! Structured logging setup for binaries and tests.

pub mod logging;

pub use logging::init_tracing;
