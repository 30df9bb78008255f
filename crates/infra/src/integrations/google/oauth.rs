//! Google OAuth2 authorization-code flow.
//!
//! Builds the consent URL and talks to the token endpoint for code exchange
//! and refresh. Tokens are never persisted here; the credential manager owns
//! storage.

use std::sync::Arc;

use async_trait::async_trait;
use calbridge_core::{AuthUrlRequest, AuthorizationServer, Clock, SystemClock};
use calbridge_domain::{CalBridgeError, GoogleConfig, Result, TokenGrant};
use chrono::Duration;
use reqwest::Method;
use tracing::{debug, instrument, warn};
use url::Url;

use super::types::{TokenErrorResponse, TokenResponse};
use super::{decode_json, error_parts};
use crate::http::HttpClient;

/// Google OAuth2 endpoints for consent, code exchange and refresh.
pub struct GoogleAuthorizationServer {
    config: GoogleConfig,
    http: HttpClient,
    clock: Arc<dyn Clock>,
}

impl GoogleAuthorizationServer {
    /// Create a server reading time from the system clock.
    pub fn new(config: GoogleConfig, http: HttpClient) -> Self {
        Self::with_clock(config, http, Arc::new(SystemClock))
    }

    /// Use `clock` to turn `expires_in` into an absolute expiry.
    pub fn with_clock(config: GoogleConfig, http: HttpClient, clock: Arc<dyn Clock>) -> Self {
        Self { config, http, clock }
    }

    async fn request_token(&self, form: &[(&str, &str)], action: &str) -> Result<TokenGrant> {
        let builder =
            self.http.request(Method::POST, self.config.token_endpoint.as_str()).form(form);
        let response = self.http.send(builder).await?;

        if !response.status().is_success() {
            let (status, text) = error_parts(response).await;
            let detail = serde_json::from_str::<TokenErrorResponse>(&text)
                .map(|err| err.describe())
                .unwrap_or(text);
            warn!(%status, action, "token endpoint rejected request");
            return Err(CalBridgeError::Auth(format!("Token {action} failed ({status}): {detail}")));
        }

        let token: TokenResponse = decode_json(response, "token").await?;
        let now = self.clock.now();

        Ok(TokenGrant {
            access_token: token.access_token,
            refresh_token: token.refresh_token.filter(|t| !t.is_empty()),
            expiry: token.expires_in.map(|secs| now + Duration::seconds(secs)),
        })
    }
}

#[async_trait]
impl AuthorizationServer for GoogleAuthorizationServer {
    fn authorization_url(&self, request: &AuthUrlRequest) -> Result<String> {
        let scope = request.scopes.join(" ");
        let mut params: Vec<(&str, &str)> = vec![
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
        ];
        if request.offline_access {
            params.push(("access_type", "offline"));
        }
        if request.force_consent {
            params.push(("prompt", "consent"));
        }
        if let Some(state) = request.state.as_deref() {
            params.push(("state", state));
        }

        let url = Url::parse_with_params(&self.config.authorization_endpoint, &params).map_err(
            |err| CalBridgeError::Config(format!("invalid authorization endpoint: {err}")),
        )?;
        Ok(url.into())
    }

    #[instrument(skip_all)]
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
        debug!("exchanging authorization code");
        self.request_token(
            &[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ],
            "exchange",
        )
        .await
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant> {
        debug!("refreshing access token");
        self.request_token(
            &[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ],
            "refresh",
        )
        .await
    }
}
