//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use calbridge_core::{
    CalendarEventRepository, CalendarService, Clock, CredentialManager, CredentialRepository,
    EventMapper, RemoteCalendarService, SyncEngine, SyncSettings, SystemClock,
};
use calbridge_domain::{Config, Result};
use calbridge_infra::config as config_loader;
use calbridge_infra::observability::init_tracing;
use calbridge_infra::{
    DbManager, GoogleAuthorizationServer, GoogleCalendarClient, HttpClient,
    SqliteCalendarEventRepository, SqliteCredentialRepository,
};
use serde::Serialize;
use tracing::{info, warn};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub credentials: Arc<CredentialManager>,
    pub sync_engine: Arc<SyncEngine>,
    pub calendar: Arc<CalendarService>,
}

/// Component health snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub healthy: bool,
    pub database: bool,
    pub message: Option<String>,
}

impl AppContext {
    /// Load configuration from the environment or a config file, install the
    /// tracing subscriber and build the context.
    pub fn new() -> Result<Self> {
        let config = config_loader::load()?;
        init_tracing(&config.logging);
        Self::new_with_config(config)
    }

    /// Create a new application context with custom configuration
    pub fn new_with_config(config: Config) -> Result<Self> {
        Self::new_with_config_and_clock(config, Arc::new(SystemClock))
    }

    /// Create a context whose credential expiry checks use `clock`.
    ///
    /// Tests use this to pin "now".
    pub fn new_with_config_and_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config_loader::validate(&config)?;
        let tz = config.calendar.tz()?;

        let db = Arc::new(DbManager::from_config(&config.database)?);
        db.run_migrations()?;

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.calendar.request_timeout_secs))
            .build()?;

        let credential_store: Arc<dyn CredentialRepository> =
            Arc::new(SqliteCredentialRepository::new(Arc::clone(&db)));
        let event_store: Arc<dyn CalendarEventRepository> =
            Arc::new(SqliteCalendarEventRepository::new(Arc::clone(&db)));
        let auth_server = Arc::new(GoogleAuthorizationServer::with_clock(
            config.google.clone(),
            http.clone(),
            Arc::clone(&clock),
        ));
        let remote: Arc<dyn RemoteCalendarService> =
            Arc::new(GoogleCalendarClient::new(http, config.google.api_base_url.clone()));

        let credentials = Arc::new(
            CredentialManager::new(credential_store, auth_server)
                .with_clock(clock)
                .with_scopes(config.google.scopes.clone()),
        );

        let mapper = EventMapper::new(tz);
        let settings = SyncSettings::from(&config.calendar);

        let sync_engine = Arc::new(
            SyncEngine::new(
                Arc::clone(&credentials),
                Arc::clone(&remote),
                Arc::clone(&event_store),
                mapper,
            )
            .with_settings(settings.clone()),
        );
        let calendar = Arc::new(
            CalendarService::new(Arc::clone(&credentials), remote, event_store, mapper)
                .with_settings(settings),
        );

        info!(
            db_path = %db.path().display(),
            timezone = %tz,
            default_calendar = %config.calendar.default_calendar_id,
            "application context initialised"
        );

        Ok(Self { config, db, credentials, sync_engine, calendar })
    }

    /// Check health of application components.
    pub fn health_check(&self) -> HealthStatus {
        match self.db.health_check() {
            Ok(()) => HealthStatus { healthy: true, database: true, message: None },
            Err(err) => {
                warn!(error = %err, "database health check failed");
                HealthStatus { healthy: false, database: false, message: Some(err.to_string()) }
            }
        }
    }
}
