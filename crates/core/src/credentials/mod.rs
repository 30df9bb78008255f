//! Credential lifecycle: store port, authorization-server port, manager and
//! connection status resolution.

pub mod manager;
pub mod ports;
pub mod status;

pub use manager::CredentialManager;
pub use status::resolve_connection_status;
