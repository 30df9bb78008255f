//! Command error envelope.

use calbridge_domain::CalBridgeError;
use serde::Serialize;

/// Failure returned by every command.
///
/// `status` follows HTTP semantics so a routing layer can forward it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{code} ({status}): {detail}")]
pub struct CommandError {
    pub status: u16,
    pub code: &'static str,
    pub detail: String,
}

/// Stable machine-readable code for `error`.
pub fn error_code(error: &CalBridgeError) -> &'static str {
    match error {
        CalBridgeError::NotConnected(_) => "not_connected",
        CalBridgeError::ExpiredNoRefresh(_) => "token_expired",
        CalBridgeError::NoRefreshToken(_) => "no_refresh_token",
        CalBridgeError::InvalidInput(_) => "invalid_input",
        CalBridgeError::RemoteService(_) => "remote_service_error",
        CalBridgeError::Auth(_) => "auth_error",
        CalBridgeError::Store(_) => "store_error",
        CalBridgeError::Config(_) => "config_error",
        CalBridgeError::Internal(_) => "internal_error",
    }
}

fn status_for(error: &CalBridgeError) -> u16 {
    match error {
        CalBridgeError::InvalidInput(_) => 400,
        CalBridgeError::NotConnected(_)
        | CalBridgeError::ExpiredNoRefresh(_)
        | CalBridgeError::NoRefreshToken(_) => 404,
        _ => 500,
    }
}

fn detail_of(error: CalBridgeError) -> String {
    match error {
        CalBridgeError::NotConnected(msg)
        | CalBridgeError::ExpiredNoRefresh(msg)
        | CalBridgeError::NoRefreshToken(msg)
        | CalBridgeError::InvalidInput(msg)
        | CalBridgeError::RemoteService(msg)
        | CalBridgeError::Auth(msg)
        | CalBridgeError::Store(msg)
        | CalBridgeError::Config(msg)
        | CalBridgeError::Internal(msg) => msg,
    }
}

impl From<CalBridgeError> for CommandError {
    fn from(error: CalBridgeError) -> Self {
        Self { status: status_for(&error), code: error_code(&error), detail: detail_of(error) }
    }
}
