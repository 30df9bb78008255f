#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use calbridge_api::AppContext;
use calbridge_core::Clock;
use calbridge_domain::{CalendarConfig, Config, DatabaseConfig, GoogleConfig, LoggingConfig};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER: &str = "user-1";

/// Clock pinned to a settable instant.
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock mutex poisoned");
        *guard += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).single().expect("valid timestamp")
}

/// Context wired to a mock Google server and a throwaway database.
pub struct TestApp {
    pub ctx: AppContext,
    pub server: MockServer,
    pub clock: Arc<TestClock>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("calbridge.db");

        let mut google = GoogleConfig::new("client-id", "client-secret", "http://localhost/callback");
        google.token_endpoint = format!("{}/token", server.uri());
        google.api_base_url = server.uri();

        let config = Config {
            database: DatabaseConfig { path: db_path.to_string_lossy().into_owned(), pool_size: 2 },
            google,
            calendar: CalendarConfig {
                timezone: "America/New_York".into(),
                request_timeout_secs: 5,
                ..CalendarConfig::default()
            },
            logging: LoggingConfig::default(),
        };

        let clock = Arc::new(TestClock { now: Mutex::new(start_time()) });
        let ctx = AppContext::new_with_config_and_clock(config, clock.clone())
            .expect("context should initialise");

        Self { ctx, server, clock, _temp_dir: temp_dir }
    }

    /// Mount a code-exchange response.
    pub async fn mock_exchange(&self, refresh_token: Option<&str>, expires_in: i64) {
        let mut body = json!({ "access_token": "access-1", "expires_in": expires_in });
        if let Some(token) = refresh_token {
            body["refresh_token"] = json!(token);
        }

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Connect `USER` with a one-hour credential and a refresh token.
    pub async fn connect(&self) {
        self.mock_exchange(Some("refresh-1"), 3600).await;
        calbridge_api::handle_callback(&self.ctx, "auth-code", USER)
            .await
            .expect("callback should succeed");
    }

    pub fn row_count(&self, table: &str) -> i64 {
        let conn = self.ctx.db.get_connection().expect("connection");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count query")
    }
}
