//! # CalBridge Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite persistence (connection pool, schema, credential and event
//!   repositories)
//! - Google OAuth2 authorization server client
//! - Google Calendar REST client
//! - HTTP client wrapper, configuration loader and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `calbridge-core`
//! - Contains all "impure" code (database and network I/O)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use http::*;
pub use integrations::*;
