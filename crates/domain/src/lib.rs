//! # CalBridge Domain
//!
//! Business domain types and models for CalBridge.
//!
//! This crate contains:
//! - Credential records and resolved access credentials
//! - Internal calendar events and their remote (Google Calendar) counterparts
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other CalBridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
