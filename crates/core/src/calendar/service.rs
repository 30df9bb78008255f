//! Calendar pass-through operations
//!
//! Each operation resolves the caller's credential, validates and maps the
//! input, then forwards a single call to the remote service.

use std::sync::Arc;

use calbridge_domain::constants::LIST_EVENTS_DEFAULT_MAX_RESULTS;
use calbridge_domain::{
    CalBridgeError, CalendarEvent, EventDraft, ListEventsQuery, NewCalendar, RemoteCalendar,
    RemoteEvent, Result, SyncWindow, SyncedEventQuery,
};
use chrono::Duration;
use tracing::{info, instrument};

use super::mapper::EventMapper;
use super::ports::{
    CalendarEventRepository, EventOrder, ListEventsRequest, NewRemoteCalendar,
    RemoteCalendarService,
};
use super::sync::SyncSettings;
use crate::credentials::CredentialManager;
use crate::validation::require;

/// Remote calendar operations that need only a resolved credential.
pub struct CalendarService {
    credentials: Arc<CredentialManager>,
    remote: Arc<dyn RemoteCalendarService>,
    events: Arc<dyn CalendarEventRepository>,
    mapper: EventMapper,
    settings: SyncSettings,
}

impl CalendarService {
    /// Create a service with default settings.
    pub fn new(
        credentials: Arc<CredentialManager>,
        remote: Arc<dyn RemoteCalendarService>,
        events: Arc<dyn CalendarEventRepository>,
        mapper: EventMapper,
    ) -> Self {
        Self { credentials, remote, events, mapper, settings: SyncSettings::default() }
    }

    /// Replace the default settings.
    pub fn with_settings(mut self, settings: SyncSettings) -> Self {
        self.settings = settings;
        self
    }

    /// List the user's calendars.
    #[instrument(skip(self))]
    pub async fn list_calendars(&self, user_id: &str) -> Result<Vec<RemoteCalendar>> {
        let credential = self.credentials.resolve_credential(user_id).await?;
        self.remote.list_calendars(&credential).await
    }

    /// List remote events with recurring events expanded, ordered by start.
    ///
    /// The window defaults like a pull; `max_results` defaults to 250 and is
    /// capped at the sync page size.
    #[instrument(skip(self, query))]
    pub async fn list_events(&self, user_id: &str, query: ListEventsQuery) -> Result<Vec<RemoteEvent>> {
        let now = self.credentials.clock().now();
        let calendar_id = self.settings.calendar_or_default(query.calendar_id.as_deref()).to_string();
        let start = query.time_min.unwrap_or(now);
        let end = query.time_max.unwrap_or_else(|| start + Duration::days(self.settings.window_days));
        let window = SyncWindow::new(calendar_id, start, end)?;

        let max_results = query
            .max_results
            .unwrap_or(LIST_EVENTS_DEFAULT_MAX_RESULTS)
            .clamp(1, self.settings.page_size.max(1));

        let credential = self.credentials.resolve_credential(user_id).await?;
        let request = ListEventsRequest {
            calendar_id: window.calendar_id,
            time_min: window.start,
            time_max: window.end,
            max_results,
            single_events: true,
            order_by: Some(EventOrder::StartTime),
        };
        self.remote.list_events(&credential, &request).await
    }

    /// Replace a remote event with the mapped draft.
    #[instrument(skip(self, draft))]
    pub async fn update_event(
        &self,
        user_id: &str,
        calendar_id: Option<&str>,
        event_id: &str,
        draft: EventDraft,
    ) -> Result<RemoteEvent> {
        let event_id = require("eventId", event_id)?;
        let remote_draft = self.mapper.to_remote(&draft.validate()?)?;
        let calendar_id = self.settings.calendar_or_default(calendar_id);

        let credential = self.credentials.resolve_credential(user_id).await?;
        let updated = self.remote.update_event(&credential, calendar_id, event_id, &remote_draft).await?;

        info!(user_id, calendar_id, event_id, "Updated remote event");
        Ok(updated)
    }

    /// Delete one remote event.
    #[instrument(skip(self))]
    pub async fn delete_event(
        &self,
        user_id: &str,
        calendar_id: Option<&str>,
        event_id: &str,
    ) -> Result<()> {
        let event_id = require("eventId", event_id)?;
        let calendar_id = self.settings.calendar_or_default(calendar_id);

        let credential = self.credentials.resolve_credential(user_id).await?;
        self.remote.delete_event(&credential, calendar_id, event_id).await?;

        info!(user_id, calendar_id, event_id, "Deleted remote event");
        Ok(())
    }

    /// Create a secondary calendar. The zone defaults to the local one.
    #[instrument(skip(self, calendar))]
    pub async fn create_calendar(&self, user_id: &str, calendar: NewCalendar) -> Result<RemoteCalendar> {
        let summary = calendar
            .summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CalBridgeError::InvalidInput("summary is required".to_string()))?;

        let new_calendar = NewRemoteCalendar {
            summary,
            description: calendar.description.filter(|d| !d.is_empty()),
            time_zone: calendar
                .time_zone
                .filter(|tz| !tz.trim().is_empty())
                .unwrap_or_else(|| self.mapper.timezone().name().to_string()),
        };

        let credential = self.credentials.resolve_credential(user_id).await?;
        let created = self.remote.insert_calendar(&credential, &new_calendar).await?;

        info!(user_id, calendar_id = %created.id, "Created remote calendar");
        Ok(created)
    }

    /// Delete a remote calendar.
    #[instrument(skip(self))]
    pub async fn delete_calendar(&self, user_id: &str, calendar_id: &str) -> Result<()> {
        let calendar_id = require("calendarId", calendar_id)?;

        let credential = self.credentials.resolve_credential(user_id).await?;
        self.remote.delete_calendar(&credential, calendar_id).await?;

        info!(user_id, calendar_id, "Deleted remote calendar");
        Ok(())
    }

    /// Read previously stored events for `user_id`. Local only.
    #[instrument(skip(self))]
    pub async fn list_synced_events(
        &self,
        user_id: &str,
        query: SyncedEventQuery,
    ) -> Result<Vec<CalendarEvent>> {
        let user_id = require("userId", user_id)?;
        query.validate()?;
        self.events.list_events(user_id, &query).await
    }
}
