//! SQLite implementation of the `CalendarEventRepository` port.

use std::sync::Arc;

use async_trait::async_trait;
use calbridge_core::CalendarEventRepository;
use calbridge_domain::{CalBridgeError, CalendarEvent, EventType, Result, SyncedEventQuery};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Row};
use tokio::task;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::DbManager;
use crate::errors::{map_join_error, InfraError};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// SQLite-backed event store keyed on (`user_id`, `title`, `due_date`).
pub struct SqliteCalendarEventRepository {
    db: Arc<DbManager>,
}

impl SqliteCalendarEventRepository {
    /// Create a repository over the shared pool.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CalendarEventRepository for SqliteCalendarEventRepository {
    #[instrument(skip(self, events), fields(count = events.len()))]
    async fn upsert_events(&self, events: &[CalendarEvent]) -> Result<usize> {
        let db = Arc::clone(&self.db);
        let events = events.to_vec();

        task::spawn_blocking(move || -> Result<usize> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(InfraError::from)?;
            let now = Utc::now().timestamp_micros();

            {
                let mut stmt = tx
                    .prepare_cached(
                        "INSERT INTO calendar_events (
                            id, user_id, class_id, title, description, event_type,
                            due_date, due_time, confidence_score, source_text,
                            created_at, updated_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                        ON CONFLICT(user_id, title, due_date) DO UPDATE SET
                            class_id = excluded.class_id,
                            description = excluded.description,
                            event_type = excluded.event_type,
                            due_time = excluded.due_time,
                            confidence_score = excluded.confidence_score,
                            source_text = excluded.source_text,
                            updated_at = excluded.updated_at",
                    )
                    .map_err(InfraError::from)?;

                for event in &events {
                    stmt.execute(params![
                        event.id.to_string(),
                        &event.user_id,
                        &event.class_id,
                        &event.title,
                        &event.description,
                        event.event_type.as_str(),
                        event.due_date.format(DATE_FORMAT).to_string(),
                        event.due_time.map(|t| t.format(TIME_FORMAT).to_string()),
                        event.confidence_score,
                        &event.source_text,
                        event.created_at.timestamp_micros(),
                        now,
                    ])
                    .map_err(InfraError::from)?;
                }
            }

            tx.commit().map_err(InfraError::from)?;
            debug!(rows = events.len(), "upserted calendar events");
            Ok(events.len())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, query))]
    async fn list_events(&self, user_id: &str, query: &SyncedEventQuery) -> Result<Vec<CalendarEvent>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let from = query.from.map(|d| d.format(DATE_FORMAT).to_string());
        let to = query.to.map(|d| d.format(DATE_FORMAT).to_string());
        let event_type = query.event_type.map(|t| t.as_str());

        task::spawn_blocking(move || -> Result<Vec<CalendarEvent>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, class_id, title, description, event_type,
                            due_date, due_time, confidence_score, source_text, created_at
                     FROM calendar_events
                     WHERE user_id = ?1
                       AND (?2 IS NULL OR due_date >= ?2)
                       AND (?3 IS NULL OR due_date <= ?3)
                       AND (?4 IS NULL OR event_type = ?4)
                     ORDER BY due_date ASC, due_time ASC",
                )
                .map_err(InfraError::from)?;

            let raw_rows = stmt
                .query_map(params![&user_id, &from, &to, &event_type], RawEvent::from_row)
                .map_err(InfraError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(InfraError::from)?;

            debug!(user_id = %user_id, rows = raw_rows.len(), "listed calendar events");
            raw_rows.into_iter().map(RawEvent::into_event).collect()
        })
        .await
        .map_err(map_join_error)?
    }
}

struct RawEvent {
    id: String,
    user_id: String,
    class_id: Option<String>,
    title: String,
    description: Option<String>,
    event_type: String,
    due_date: String,
    due_time: Option<String>,
    confidence_score: f64,
    source_text: String,
    created_at: i64,
}

impl RawEvent {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            class_id: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            event_type: row.get(5)?,
            due_date: row.get(6)?,
            due_time: row.get(7)?,
            confidence_score: row.get(8)?,
            source_text: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    fn into_event(self) -> Result<CalendarEvent> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| CalBridgeError::Store(format!("invalid event id '{}': {}", self.id, e)))?;
        let event_type = self.event_type.parse::<EventType>().map_err(CalBridgeError::Store)?;
        let due_date = NaiveDate::parse_from_str(&self.due_date, DATE_FORMAT)
            .map_err(|e| CalBridgeError::Store(format!("invalid due_date '{}': {}", self.due_date, e)))?;
        let due_time = self
            .due_time
            .as_deref()
            .map(|raw| {
                NaiveTime::parse_from_str(raw, TIME_FORMAT)
                    .map_err(|e| CalBridgeError::Store(format!("invalid due_time '{}': {}", raw, e)))
            })
            .transpose()?;
        let created_at = DateTime::from_timestamp_micros(self.created_at)
            .ok_or_else(|| CalBridgeError::Store(format!("timestamp out of range: {}", self.created_at)))?;

        Ok(CalendarEvent {
            id,
            user_id: self.user_id,
            class_id: self.class_id,
            title: self.title,
            description: self.description,
            event_type,
            due_date,
            due_time,
            confidence_score: self.confidence_score,
            source_text: self.source_text,
            created_at,
        })
    }
}
