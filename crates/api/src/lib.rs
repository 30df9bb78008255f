//! # CalBridge API
//!
//! Command layer consumed by an HTTP or CLI front end.
//!
//! This crate contains:
//! - One async command per external operation (auth, calendar, sync)
//! - Application context (dependency injection)
//! - Error mapping to `{status, code, detail}`
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod error;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
pub use error::CommandError;
