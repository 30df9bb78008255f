//! Connection status resolution
//!
//! Derives the connected / needs-refresh state from a stored record without
//! contacting the authorization server.

use calbridge_domain::{ConnectionStatus, CredentialRecord};
use chrono::{DateTime, Utc};

/// Compute the status for an optional record at `now`.
///
/// A user counts as connected while recovery is still possible: either the
/// access token is valid or a refresh token can renew it.
pub fn resolve_connection_status(
    record: Option<&CredentialRecord>,
    now: DateTime<Utc>,
) -> ConnectionStatus {
    let Some(record) = record else {
        return ConnectionStatus::disconnected();
    };

    let expired = record.is_expired_at(now);
    let has_refresh = record.has_refresh_token();

    ConnectionStatus {
        connected: !expired || has_refresh,
        last_sync: Some(record.updated_at),
        needs_refresh: expired && has_refresh,
    }
}
