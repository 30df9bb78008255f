//! Delegated-authorization credentials

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted per-user OAuth credential.
///
/// Exactly one record exists per `user_id`. A missing `expiry` means the
/// access token never expires; a missing `refresh_token` means it cannot be
/// renewed once it does.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Expired iff an expiry is present and not strictly after `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now)
    }

    /// True when a non-empty refresh token is stored.
    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// The stored access token as a credential.
    pub fn access_credential(&self) -> AccessCredential {
        AccessCredential { access_token: self.access_token.clone(), expiry: self.expiry }
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("user_id", &self.user_id)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expiry", &self.expiry)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// A usable access token, handed to the remote calendar client per call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCredential {
    pub access_token: String,
    pub expiry: Option<DateTime<Utc>>,
}

impl AccessCredential {
    /// Credential with no known expiry.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), expiry: None }
    }
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("access_token", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Tokens returned by the authorization server for an exchange or refresh.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Best-effort connection probe result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    pub last_sync: Option<DateTime<Utc>>,
    pub needs_refresh: bool,
}

impl ConnectionStatus {
    /// Status for a user with no usable credential.
    pub fn disconnected() -> Self {
        Self { connected: false, last_sync: None, needs_refresh: false }
    }
}
