//! Configuration structures
//!
//! Populated by the infra config loader from environment variables or a
//! TOML/JSON file. Every section except `database` and `google` has usable
//! defaults.

use std::fmt;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CALENDAR_ID, DEFAULT_DB_POOL_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SYNC_WINDOW_DAYS, GOOGLE_AUTHORIZATION_ENDPOINT, GOOGLE_CALENDAR_API_BASE,
    GOOGLE_CALENDAR_SCOPES, GOOGLE_TOKEN_ENDPOINT, SYNC_PAGE_SIZE,
};
use crate::{CalBridgeError, Result};

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub google: GoogleConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// SQLite location and pool size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// OAuth client registration and Google endpoints.
///
/// Endpoints are configurable so tests can point them at a mock server.
#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_authorization_endpoint")]
    pub authorization_endpoint: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("authorization_endpoint", &self.authorization_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl GoogleConfig {
    /// Registration with Google's production endpoints and default scopes.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: default_scopes(),
            authorization_endpoint: default_authorization_endpoint(),
            token_endpoint: default_token_endpoint(),
            api_base_url: default_api_base_url(),
        }
    }
}

/// Sync and mapping settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CalendarConfig {
    /// IANA zone used for local dates and times (e.g. `America/New_York`).
    pub timezone: String,
    pub default_calendar_id: String,
    pub sync_window_days: i64,
    pub page_size: u32,
    /// Per-request budget for outbound HTTP calls.
    pub request_timeout_secs: u64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            default_calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            sync_window_days: DEFAULT_SYNC_WINDOW_DAYS,
            page_size: SYNC_PAGE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// The process timezone from `TZ`, or `UTC` when it is unset or blank.
pub fn default_timezone() -> String {
    timezone_or_utc(std::env::var("TZ").ok())
}

fn timezone_or_utc(tz: Option<String>) -> String {
    tz.map(|value| value.trim().trim_start_matches(':').to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "UTC".to_string())
}

impl CalendarConfig {
    /// Parse the configured timezone.
    ///
    /// # Errors
    /// Returns `CalBridgeError::Config` for names unknown to the tz database.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| CalBridgeError::Config(format!("Invalid timezone '{}': {}", self.timezone, e)))
    }
}

/// Tracing output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

fn default_pool_size() -> u32 {
    DEFAULT_DB_POOL_SIZE
}

fn default_scopes() -> Vec<String> {
    GOOGLE_CALENDAR_SCOPES.iter().map(|s| (*s).to_string()).collect()
}

fn default_authorization_endpoint() -> String {
    GOOGLE_AUTHORIZATION_ENDPOINT.to_string()
}

fn default_token_endpoint() -> String {
    GOOGLE_TOKEN_ENDPOINT.to_string()
}

fn default_api_base_url() -> String {
    GOOGLE_CALENDAR_API_BASE.to_string()
}
