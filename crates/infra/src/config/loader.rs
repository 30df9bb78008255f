//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment, if one exists
//! 2. Attempts to load from environment variables
//! 3. If incomplete, falls back to loading from file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! Required:
//! - `CALBRIDGE_DB_PATH`: SQLite database file path
//! - `GOOGLE_CALENDAR_CLIENT_ID`, `GOOGLE_CALENDAR_CLIENT_SECRET`: OAuth client
//! - `GOOGLE_CALENDAR_REDIRECT_URI`: OAuth callback URL
//!
//! Optional:
//! - `CALBRIDGE_DB_POOL_SIZE`
//! - `CALBRIDGE_GOOGLE_SCOPES` (comma or whitespace separated)
//! - `CALBRIDGE_GOOGLE_AUTH_ENDPOINT`, `CALBRIDGE_GOOGLE_TOKEN_ENDPOINT`,
//!   `CALBRIDGE_GOOGLE_API_BASE`
//! - `CALBRIDGE_TIMEZONE` (falls back to `TZ`, then `UTC`)
//! - `CALBRIDGE_DEFAULT_CALENDAR_ID`, `CALBRIDGE_SYNC_WINDOW_DAYS`,
//!   `CALBRIDGE_PAGE_SIZE`, `CALBRIDGE_REQUEST_TIMEOUT_SECS`
//! - `CALBRIDGE_LOG_LEVEL`, `CALBRIDGE_LOG_JSON`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` and `./calbridge.{json,toml}`
//! 2. `../config.{json,toml}` and `../../config.{json,toml}`
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use calbridge_domain::constants::{DEFAULT_DB_POOL_SIZE, SYNC_PAGE_SIZE};
use calbridge_domain::{
    CalBridgeError, CalendarConfig, Config, DatabaseConfig, GoogleConfig, LoggingConfig, Result,
};

/// Load configuration with automatic fallback strategy
///
/// Reads `.env`, then tries environment variables. If any required variable
/// is missing, falls back to a config file. The result is validated.
///
/// # Errors
/// Returns `CalBridgeError::Config` if neither source yields a complete,
/// valid configuration.
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `CalBridgeError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let database = DatabaseConfig {
        path: env_var("CALBRIDGE_DB_PATH")?,
        pool_size: env_parse("CALBRIDGE_DB_POOL_SIZE", "pool size")?
            .unwrap_or(DEFAULT_DB_POOL_SIZE),
    };

    let mut google = GoogleConfig::new(
        env_var("GOOGLE_CALENDAR_CLIENT_ID")?,
        env_var("GOOGLE_CALENDAR_CLIENT_SECRET")?,
        env_var("GOOGLE_CALENDAR_REDIRECT_URI")?,
    );
    if let Some(scopes) = env_opt("CALBRIDGE_GOOGLE_SCOPES") {
        google.scopes = split_scopes(&scopes);
    }
    if let Some(endpoint) = env_opt("CALBRIDGE_GOOGLE_AUTH_ENDPOINT") {
        google.authorization_endpoint = endpoint;
    }
    if let Some(endpoint) = env_opt("CALBRIDGE_GOOGLE_TOKEN_ENDPOINT") {
        google.token_endpoint = endpoint;
    }
    if let Some(base) = env_opt("CALBRIDGE_GOOGLE_API_BASE") {
        google.api_base_url = base;
    }

    let defaults = CalendarConfig::default();
    let calendar = CalendarConfig {
        timezone: env_opt("CALBRIDGE_TIMEZONE").unwrap_or(defaults.timezone),
        default_calendar_id: env_opt("CALBRIDGE_DEFAULT_CALENDAR_ID")
            .unwrap_or(defaults.default_calendar_id),
        sync_window_days: env_parse("CALBRIDGE_SYNC_WINDOW_DAYS", "sync window")?
            .unwrap_or(defaults.sync_window_days),
        page_size: env_parse("CALBRIDGE_PAGE_SIZE", "page size")?.unwrap_or(defaults.page_size),
        request_timeout_secs: env_parse("CALBRIDGE_REQUEST_TIMEOUT_SECS", "request timeout")?
            .unwrap_or(defaults.request_timeout_secs),
    };

    let logging = LoggingConfig {
        level: env_opt("CALBRIDGE_LOG_LEVEL").unwrap_or_else(|| LoggingConfig::default().level),
        json: env_bool("CALBRIDGE_LOG_JSON", false),
    };

    Ok(Config { database, google, calendar, logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CalBridgeError::Config` if the file is missing, unreadable,
/// or malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CalBridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CalBridgeError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CalBridgeError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Check cross-field constraints serde cannot express.
///
/// # Errors
/// Returns `CalBridgeError::Config` describing the first invalid value.
pub fn validate(config: &Config) -> Result<()> {
    if config.database.path.trim().is_empty() {
        return Err(CalBridgeError::Config("database.path must not be empty".into()));
    }
    if config.database.pool_size == 0 {
        return Err(CalBridgeError::Config("database.pool_size must be positive".into()));
    }
    if config.google.client_id.trim().is_empty() {
        return Err(CalBridgeError::Config("google.client_id must not be empty".into()));
    }
    if config.google.scopes.is_empty() {
        return Err(CalBridgeError::Config("google.scopes must not be empty".into()));
    }
    config.calendar.tz()?;
    if config.calendar.sync_window_days <= 0 {
        return Err(CalBridgeError::Config("calendar.sync_window_days must be positive".into()));
    }
    if config.calendar.page_size == 0 || config.calendar.page_size > SYNC_PAGE_SIZE {
        return Err(CalBridgeError::Config(format!(
            "calendar.page_size must be between 1 and {SYNC_PAGE_SIZE}"
        )));
    }
    if config.calendar.request_timeout_secs == 0 {
        return Err(CalBridgeError::Config("calendar.request_timeout_secs must be positive".into()));
    }
    Ok(())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CalBridgeError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CalBridgeError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CalBridgeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Returns the first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["config.json", "config.toml", "calbridge.json", "calbridge.toml"];
    let mut candidates = Vec::new();

    let mut push_from = |base: &Path| {
        candidates.extend(NAMES.iter().map(|name| base.join(name)));
        candidates.push(base.join("../config.json"));
        candidates.push(base.join("../config.toml"));
        candidates.push(base.join("../../config.json"));
        candidates.push(base.join("../../config.toml"));
    };

    if let Ok(cwd) = std::env::current_dir() {
        push_from(&cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            push_from(exe_dir);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `CalBridgeError::Config` if the variable is unset or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        CalBridgeError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Optional environment variable; blank values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str, label: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| CalBridgeError::Config(format!("Invalid {}: {}", label, e)))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn split_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
