//! Remote calendar (Google Calendar) representations and sync value objects

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::event::CalendarEvent;
use crate::{impl_domain_status_conversions, CalBridgeError, Result};

/// Start or end of a remote event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventTime {
    /// Timed boundary with the zone the remote service reported, if any.
    DateTime { instant: DateTime<FixedOffset>, time_zone: Option<String> },
    /// All-day boundary.
    Date(NaiveDate),
}

/// Event attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAttendee {
    pub email: String,
    pub display_name: Option<String>,
    pub response_status: Option<String>,
}

/// A remote event as read from the calendar service. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: Option<EventTime>,
    pub status: Option<String>,
    pub html_link: Option<String>,
    pub attendees: Vec<RemoteAttendee>,
    pub organizer: Option<RemoteAttendee>,
}

/// A zone-qualified instant as sent to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDateTime {
    pub date_time: DateTime<FixedOffset>,
    pub time_zone: String,
}

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

impl_domain_status_conversions!(ReminderMethod {
    Email => "email",
    Popup => "popup",
});

/// Reminder fired `minutes` before the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: ReminderMethod,
    pub minutes: u32,
}

/// Event payload for remote insert/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEventDraft {
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: RemoteDateTime,
    pub end: RemoteDateTime,
    pub attendees: Vec<String>,
    pub reminders: Vec<ReminderOverride>,
}

/// Calendar on the user's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCalendar {
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub time_zone: Option<String>,
    pub primary: bool,
    pub access_role: Option<String>,
}

/// Caller payload for creating a secondary calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCalendar {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub time_zone: Option<String>,
}

/// Range of remote events to pull, `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncWindow {
    pub calendar_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SyncWindow {
    /// # Errors
    /// Returns `CalBridgeError::InvalidInput` when `start` is not before `end`.
    pub fn new(calendar_id: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(CalBridgeError::InvalidInput(format!(
                "sync window start ({}) must be before end ({})",
                start, end
            )));
        }
        Ok(Self { calendar_id: calendar_id.into(), start, end })
    }

    /// `[now, now + days)`
    pub fn starting_at(calendar_id: impl Into<String>, now: DateTime<Utc>, days: i64) -> Self {
        Self { calendar_id: calendar_id.into(), start: now, end: now + Duration::days(days) }
    }
}

/// Optional overrides for a pull; unset fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncRequest {
    pub calendar_id: Option<String>,
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
}

impl SyncRequest {
    /// Resolve to a concrete window. A missing start is `now`; a missing end
    /// is `days` after the start.
    ///
    /// # Errors
    /// Returns `CalBridgeError::InvalidInput` for an empty or inverted range.
    pub fn into_window(self, default_calendar_id: &str, now: DateTime<Utc>, days: i64) -> Result<SyncWindow> {
        let calendar_id = self
            .calendar_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| default_calendar_id.to_string());
        let start = self.time_min.unwrap_or(now);
        let end = self.time_max.unwrap_or_else(|| start + Duration::days(days));
        SyncWindow::new(calendar_id, start, end)
    }
}

/// Query for the remote list-events pass-through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListEventsQuery {
    pub calendar_id: Option<String>,
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
    pub max_results: Option<u32>,
}

/// Result of a pull: events seen and the rows mapped from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub synced_count: usize,
    pub events: Vec<CalendarEvent>,
}

/// Identifier and link of an event created remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushedEvent {
    pub remote_id: String,
    pub remote_url: Option<String>,
}
