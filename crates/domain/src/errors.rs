//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for CalBridge
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CalBridgeError {
    /// No credential record exists for the user.
    #[error("Not connected: {0}")]
    NotConnected(String),

    /// The stored credential expired and cannot be renewed.
    #[error("Credential expired and no refresh token is stored: {0}")]
    ExpiredNoRefresh(String),

    /// An explicit refresh was requested but no refresh token is stored.
    #[error("No refresh token: {0}")]
    NoRefreshToken(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The calendar API rejected or failed a call.
    #[error("Remote service error: {0}")]
    RemoteService(String),

    /// The authorization server rejected a code exchange or refresh.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CalBridgeError {
    /// True for the failures that are only recoverable by re-running the
    /// authorization flow.
    pub fn requires_reauthorization(&self) -> bool {
        matches!(self, Self::NotConnected(_) | Self::ExpiredNoRefresh(_) | Self::NoRefreshToken(_))
    }
}

/// Result type alias for CalBridge operations
pub type Result<T> = std::result::Result<T, CalBridgeError>;
