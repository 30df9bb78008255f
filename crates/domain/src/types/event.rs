//! Internal calendar events

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{impl_domain_status_conversions, CalBridgeError, Result};

/// Kind of an internal event. `GoogleCalendar` marks remote-origin rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Assignment,
    Exam,
    Reading,
    Other,
    GoogleCalendar,
}

impl_domain_status_conversions!(EventType {
    Assignment => "assignment",
    Exam => "exam",
    Reading => "reading",
    Other => "other",
    GoogleCalendar => "google_calendar",
});

/// A row of the local `calendar_events` table.
///
/// (`user_id`, `title`, `due_date`) is the deduplication key for
/// remote-origin events. A missing `due_time` marks an all-day event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    pub user_id: String,
    pub class_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub due_date: NaiveDate,
    pub due_time: Option<NaiveTime>,
    /// In `[0, 1]`; only meaningful for extracted events.
    pub confidence_score: f64,
    pub source_text: String,
    pub created_at: DateTime<Utc>,
}

impl CalendarEvent {
    /// All-day events carry no time of day.
    pub fn is_all_day(&self) -> bool {
        self.due_time.is_none()
    }
}

/// Unvalidated event payload as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// `YYYY-MM-DD`
    pub due_date: Option<String>,
    /// `HH:MM` or `HH:MM:SS`
    pub due_time: Option<String>,
    pub attendees: Vec<String>,
}

/// An event draft that passed validation and can be mapped to the remote
/// representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub due_date: NaiveDate,
    pub due_time: Option<NaiveTime>,
    pub attendees: Vec<String>,
}

impl EventDraft {
    /// Require `title` and `due_date`, and parse the date and time fields.
    ///
    /// # Errors
    /// Returns `CalBridgeError::InvalidInput` when a required field is missing
    /// or a date/time does not parse.
    pub fn validate(self) -> Result<NewEvent> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CalBridgeError::InvalidInput("title is required".to_string()))?;

        let raw_date = self
            .due_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| CalBridgeError::InvalidInput("dueDate is required".to_string()))?;
        let due_date = parse_due_date(raw_date)?;

        let due_time = match self.due_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_due_time(raw)?),
        };

        let attendees = self
            .attendees
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        Ok(NewEvent {
            title,
            description: self.description.filter(|d| !d.is_empty()),
            location: self.location.filter(|l| !l.is_empty()),
            due_date,
            due_time,
            attendees,
        })
    }
}

fn parse_due_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| CalBridgeError::InvalidInput(format!("Invalid dueDate '{}': {}", raw, e)))
}

fn parse_due_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|e| CalBridgeError::InvalidInput(format!("Invalid dueTime '{}': {}", raw, e)))
}

/// Filter for reading synced rows back out of the local store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncedEventQuery {
    /// Inclusive lower bound on `due_date`.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `due_date`.
    pub to: Option<NaiveDate>,
    pub event_type: Option<EventType>,
}

impl SyncedEventQuery {
    /// # Errors
    /// Returns `CalBridgeError::InvalidInput` when `from` is after `to`.
    pub fn validate(&self) -> Result<()> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(CalBridgeError::InvalidInput(format!(
                "from ({}) must not be after to ({})",
                from, to
            ))),
            _ => Ok(()),
        }
    }
}
