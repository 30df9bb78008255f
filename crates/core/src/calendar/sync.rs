//! Sync engine
//!
//! Pulls remote events for a window into the local store and pushes locally
//! authored events to the remote calendar.

use std::sync::Arc;

use calbridge_domain::constants::{DEFAULT_CALENDAR_ID, DEFAULT_SYNC_WINDOW_DAYS, SYNC_PAGE_SIZE};
use calbridge_domain::{
    CalendarConfig, CalendarEvent, EventDraft, PushedEvent, Result, SyncOutcome, SyncRequest,
    SyncWindow,
};
use tracing::{info, instrument};

use super::mapper::EventMapper;
use super::ports::{CalendarEventRepository, EventOrder, ListEventsRequest, RemoteCalendarService};
use crate::credentials::CredentialManager;
use crate::validation::require;

/// Knobs for the sync engine and the pass-through service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub default_calendar_id: String,
    pub window_days: i64,
    /// Upper bound on events pulled in one sync. Events past it are not
    /// fetched.
    pub page_size: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            default_calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            window_days: DEFAULT_SYNC_WINDOW_DAYS,
            page_size: SYNC_PAGE_SIZE,
        }
    }
}

impl SyncSettings {
    /// The trimmed `calendar_id`, or the default calendar when it is blank.
    pub fn calendar_or_default<'a>(&'a self, calendar_id: Option<&'a str>) -> &'a str {
        calendar_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(self.default_calendar_id.as_str())
    }
}

impl From<&CalendarConfig> for SyncSettings {
    fn from(config: &CalendarConfig) -> Self {
        Self {
            default_calendar_id: config.default_calendar_id.clone(),
            window_days: config.sync_window_days,
            page_size: config.page_size,
        }
    }
}

/// Pulls remote events into the local store and pushes new ones out.
pub struct SyncEngine {
    credentials: Arc<CredentialManager>,
    remote: Arc<dyn RemoteCalendarService>,
    events: Arc<dyn CalendarEventRepository>,
    mapper: EventMapper,
    settings: SyncSettings,
}

impl SyncEngine {
    /// Create an engine with default settings.
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

    /// Pull using caller overrides, defaulting to `[now, now + window_days)` on
    /// the default calendar.
    pub async fn sync(&self, user_id: &str, request: SyncRequest) -> Result<SyncOutcome> {
        let now = self.credentials.clock().now();
        let window = request.into_window(&self.settings.default_calendar_id, now, self.settings.window_days)?;
        self.pull_sync(user_id, &window).await
    }

    /// Pull remote events in `window` and upsert them locally.
    ///
    /// Recurring events are expanded and ordered by start time. The mapped
    /// batch is written in one store call; if that fails the whole pull fails.
    /// Repeating a pull against unchanged remote state leaves the row count
    /// unchanged.
    #[instrument(skip(self, window), fields(calendar_id = %window.calendar_id))]
    pub async fn pull_sync(&self, user_id: &str, window: &SyncWindow) -> Result<SyncOutcome> {
        let user_id = require("userId", user_id)?;
        let credential = self.credentials.resolve_credential(user_id).await?;

        let request = ListEventsRequest {
            calendar_id: window.calendar_id.clone(),
            time_min: window.start,
            time_max: window.end,
            max_results: self.settings.page_size,
            single_events: true,
            order_by: Some(EventOrder::StartTime),
        };
        let remote_events = self.remote.list_events(&credential, &request).await?;

        let now = self.credentials.clock().now();
        let events: Vec<CalendarEvent> = remote_events
            .iter()
            .map(|remote| self.mapper.to_internal(remote, user_id, now))
            .collect();

        let written = if events.is_empty() { 0 } else { self.events.upsert_events(&events).await? };

        info!(
            user_id,
            remote_count = remote_events.len(),
            rows_written = written,
            "Pulled remote calendar events"
        );

        Ok(SyncOutcome { synced_count: remote_events.len(), events })
    }

    /// Create `draft` on the remote calendar and notify its attendees.
    ///
    /// Nothing is written locally.
    ///
    /// # Errors
    /// `InvalidInput` when the draft lacks a title or due date; the credential
    /// is not resolved in that case.
    #[instrument(skip(self, draft))]
    pub async fn push_event(
        &self,
        user_id: &str,
        calendar_id: Option<&str>,
        draft: EventDraft,
    ) -> Result<PushedEvent> {
        let user_id = require("userId", user_id)?;
        let event = draft.validate()?;
        let remote_draft = self.mapper.to_remote(&event)?;
        let calendar_id = self.settings.calendar_or_default(calendar_id);

        let credential = self.credentials.resolve_credential(user_id).await?;
        let created = self.remote.insert_event(&credential, calendar_id, &remote_draft, true).await?;

        info!(user_id, calendar_id, remote_id = %created.id, "Pushed event to remote calendar");
        Ok(PushedEvent { remote_id: created.id, remote_url: created.html_link })
    }
}
