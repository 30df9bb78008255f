#![allow(dead_code)]

use std::sync::Arc;

use calbridge_domain::{CalendarEvent, EventType};
use calbridge_infra::database::DbManager;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use tempfile::TempDir;
use uuid::Uuid;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("calbridge-test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("schema migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }

    pub fn count(&self, table: &str) -> i64 {
        let conn = self.manager.get_connection().expect("connection");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count query")
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).single().expect("valid timestamp")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

/// Synced event helper.
pub fn make_event(
    user_id: &str,
    title: &str,
    due_date: NaiveDate,
    due_time: Option<NaiveTime>,
) -> CalendarEvent {
    CalendarEvent {
        id: Uuid::now_v7(),
        user_id: user_id.to_string(),
        class_id: None,
        title: title.to_string(),
        description: None,
        event_type: EventType::GoogleCalendar,
        due_date,
        due_time,
        confidence_score: 1.0,
        source_text: format!("Imported from Google Calendar: {title}"),
        created_at: base_time(),
    }
}
