//! Credential port interfaces

use async_trait::async_trait;
use calbridge_domain::{CredentialRecord, Result, TokenGrant};

/// Persisted per-user credential records.
///
/// Every call is a store round-trip; implementations must not cache.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Fetch the record for `user_id`, `None` when the user never connected.
    async fn get(&self, user_id: &str) -> Result<Option<CredentialRecord>>;

    /// Insert or overwrite the record keyed by `record.user_id`.
    async fn upsert(&self, record: &CredentialRecord) -> Result<()>;

    /// Delete the record for `user_id`. Succeeds when no record exists.
    async fn delete(&self, user_id: &str) -> Result<()>;
}

/// Parameters for building the consent URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUrlRequest {
    pub scopes: Vec<String>,
    /// Ask for a refresh token.
    pub offline_access: bool,
    /// Always show the consent screen so a refresh token is re-issued.
    pub force_consent: bool,
    /// Opaque value echoed back to the callback.
    pub state: Option<String>,
}

/// OAuth2 authorization server.
#[async_trait]
pub trait AuthorizationServer: Send + Sync {
    /// Build the URL the user visits to grant access.
    fn authorization_url(&self, request: &AuthUrlRequest) -> Result<String>;

    /// Exchange an authorization code for tokens.
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant>;

    /// Obtain a new access token from a refresh token.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant>;
}
