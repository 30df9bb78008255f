//! Credential manager
//!
//! Resolves a usable access credential for a user, refreshing through the
//! authorization server when the stored one has expired. Nothing is cached
//! between calls: every operation reads the store.
//!
//! Concurrent resolutions for the same expired user are not serialized. Each
//! refreshes independently and the last write wins, which is harmless since
//! both derive from the same refresh token.

use std::sync::Arc;

use calbridge_domain::{
    AccessCredential, CalBridgeError, ConnectionStatus, CredentialRecord, Result,
};
use tracing::{debug, info, instrument, warn};

use super::ports::{AuthUrlRequest, AuthorizationServer, CredentialRepository};
use super::status::resolve_connection_status;
use crate::clock::{Clock, SystemClock};
use crate::validation::require;

/// Credential lifecycle service
pub struct CredentialManager {
    repository: Arc<dyn CredentialRepository>,
    auth_server: Arc<dyn AuthorizationServer>,
    clock: Arc<dyn Clock>,
    scopes: Vec<String>,
}

impl CredentialManager {
    /// Create a manager reading time from the system clock.
    pub fn new(
        repository: Arc<dyn CredentialRepository>,
        auth_server: Arc<dyn AuthorizationServer>,
    ) -> Self {
        Self { repository, auth_server, clock: Arc::new(SystemClock), scopes: Vec::new() }
    }

    /// Replace the time source (tests pin "now" with this).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Scopes requested by [`Self::authorization_url`].
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// The clock used for expiry checks.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Consent URL requesting offline access with a forced consent prompt.
    ///
    /// `state` is echoed back to the callback unchanged.
    pub fn authorization_url(&self, state: Option<&str>) -> Result<String> {
        let request = AuthUrlRequest {
            scopes: self.scopes.clone(),
            offline_access: true,
            force_consent: true,
            state: state.map(str::to_string),
        };
        self.auth_server.authorization_url(&request)
    }

    /// Complete the authorization flow for `user_id`.
    ///
    /// When the exchange omits a refresh token, the one already on file (if
    /// any) is kept.
    #[instrument(skip(self, code))]
    pub async fn connect(&self, user_id: &str, code: &str) -> Result<AccessCredential> {
        let user_id = require("userId", user_id)?;
        let code = require("code", code)?;

        let grant = self.auth_server.exchange_code(code).await?;
        let refresh_token = match grant.refresh_token {
            Some(token) => Some(token),
            None => self.repository.get(user_id).await?.and_then(|existing| existing.refresh_token),
        };

        let record = CredentialRecord {
            user_id: user_id.to_string(),
            access_token: grant.access_token,
            refresh_token,
            expiry: grant.expiry,
            updated_at: self.clock.now(),
        };
        self.repository.upsert(&record).await?;

        info!(
            user_id,
            has_refresh_token = record.has_refresh_token(),
            "Stored credential from authorization callback"
        );
        Ok(record.access_credential())
    }

    /// Return a valid access credential, refreshing it first when expired.
    ///
    /// # Errors
    /// - `NotConnected` when no record exists
    /// - `ExpiredNoRefresh` when the record expired and cannot be renewed; the
    ///   authorization server is not contacted
    /// - `Auth` / `Store` from the refresh and persist steps
    #[instrument(skip(self))]
    pub async fn resolve_credential(&self, user_id: &str) -> Result<AccessCredential> {
        let user_id = require("userId", user_id)?;
        let record = self.load(user_id).await?;

        if !record.is_expired_at(self.clock.now()) {
            return Ok(record.access_credential());
        }

        let Some(refresh_token) = record.refresh_token.clone().filter(|t| !t.is_empty()) else {
            warn!(user_id, "Credential expired with no refresh token");
            return Err(CalBridgeError::ExpiredNoRefresh(format!(
                "credential for user {} expired and cannot be refreshed",
                user_id
            )));
        };

        debug!(user_id, "Credential expired, refreshing");
        self.refresh_with(record, &refresh_token).await
    }

    /// Refresh unconditionally, regardless of the stored expiry.
    ///
    /// # Errors
    /// `NotConnected` without a record, `NoRefreshToken` when the record
    /// holds no refresh token.
    #[instrument(skip(self))]
    pub async fn refresh_credential(&self, user_id: &str) -> Result<AccessCredential> {
        let user_id = require("userId", user_id)?;
        let record = self.load(user_id).await?;

        let Some(refresh_token) = record.refresh_token.clone().filter(|t| !t.is_empty()) else {
            return Err(CalBridgeError::NoRefreshToken(format!(
                "no refresh token stored for user {}",
                user_id
            )));
        };

        self.refresh_with(record, &refresh_token).await
    }

    /// Delete the user's credential. Succeeds whether or not one existed.
    #[instrument(skip(self))]
    pub async fn disconnect(&self, user_id: &str) -> Result<()> {
        let user_id = require("userId", user_id)?;
        self.repository.delete(user_id).await?;
        info!(user_id, "Disconnected calendar account");
        Ok(())
    }

    /// Best-effort status probe. Store failures degrade to disconnected.
    #[instrument(skip(self))]
    pub async fn connection_status(&self, user_id: &str) -> ConnectionStatus {
        match self.repository.get(user_id).await {
            Ok(record) => resolve_connection_status(record.as_ref(), self.clock.now()),
            Err(err) => {
                warn!(user_id, error = %err, "Connection status lookup failed");
                ConnectionStatus::disconnected()
            }
        }
    }

    async fn load(&self, user_id: &str) -> Result<CredentialRecord> {
        self.repository.get(user_id).await?.ok_or_else(|| {
            CalBridgeError::NotConnected(format!("no calendar credential for user {}", user_id))
        })
    }

    /// Swap in a new access token and expiry. The refresh token is never
    /// rotated or cleared here.
    async fn refresh_with(
        &self,
        record: CredentialRecord,
        refresh_token: &str,
    ) -> Result<AccessCredential> {
        let grant = self.auth_server.refresh(refresh_token).await?;

        let refreshed = CredentialRecord {
            access_token: grant.access_token,
            expiry: grant.expiry,
            updated_at: self.clock.now(),
            ..record
        };
        self.repository.upsert(&refreshed).await?;

        info!(user_id = %refreshed.user_id, expiry = ?refreshed.expiry, "Refreshed access credential");
        Ok(refreshed.access_credential())
    }
}
