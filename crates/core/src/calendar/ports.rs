//! Calendar port interfaces

use async_trait::async_trait;
use calbridge_domain::{
    AccessCredential, CalendarEvent, RemoteCalendar, RemoteEvent, RemoteEventDraft, Result,
    SyncedEventQuery,
};
use chrono::{DateTime, Utc};

/// Server-side ordering for event listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrder {
    StartTime,
    Updated,
}

/// Remote event listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEventsRequest {
    pub calendar_id: String,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub max_results: u32,
    /// Expand recurring events into single instances.
    pub single_events: bool,
    pub order_by: Option<EventOrder>,
}

/// Calendar to create remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRemoteCalendar {
    pub summary: String,
    pub description: Option<String>,
    pub time_zone: String,
}

/// Remote calendar service (Google Calendar).
///
/// The access credential is supplied on every call; implementations must not
/// retain it between calls.
#[async_trait]
pub trait RemoteCalendarService: Send + Sync {
    async fn list_calendars(&self, credential: &AccessCredential) -> Result<Vec<RemoteCalendar>>;

    async fn list_events(
        &self,
        credential: &AccessCredential,
        request: &ListEventsRequest,
    ) -> Result<Vec<RemoteEvent>>;

    /// Insert an event. With `notify_attendees`, the service e-mails attendees.
    async fn insert_event(
        &self,
        credential: &AccessCredential,
        calendar_id: &str,
        event: &RemoteEventDraft,
        notify_attendees: bool,
    ) -> Result<RemoteEvent>;

    async fn update_event(
        &self,
        credential: &AccessCredential,
        calendar_id: &str,
        event_id: &str,
        event: &RemoteEventDraft,
    ) -> Result<RemoteEvent>;

    async fn delete_event(
        &self,
        credential: &AccessCredential,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<()>;

    async fn insert_calendar(
        &self,
        credential: &AccessCredential,
        calendar: &NewRemoteCalendar,
    ) -> Result<RemoteCalendar>;

    async fn delete_calendar(&self, credential: &AccessCredential, calendar_id: &str)
        -> Result<()>;
}

/// Local store of internal calendar events.
#[async_trait]
pub trait CalendarEventRepository: Send + Sync {
    /// Upsert a batch keyed on (`user_id`, `title`, `due_date`), atomically.
    ///
    /// Matching rows are overwritten in place; within one batch the later
    /// entry wins. Returns the number of rows written.
    async fn upsert_events(&self, events: &[CalendarEvent]) -> Result<usize>;

    /// Events for `user_id` matching `query`, ordered by due date then time.
    async fn list_events(
        &self,
        user_id: &str,
        query: &SyncedEventQuery,
    ) -> Result<Vec<CalendarEvent>>;
}
