//! Event mapper
//!
//! Translates between internal events and the remote representation. Outgoing
//! dates and times are interpreted in the configured timezone. Pulled events
//! keep the date and time of their own offset.

use calbridge_domain::constants::{
    EMAIL_REMINDER_MINUTES, POPUP_REMINDER_MINUTES, REMOTE_EVENT_CONFIDENCE, REMOTE_SOURCE_PREFIX,
    TIMED_EVENT_DURATION_MINUTES, UNTITLED_EVENT_TITLE,
};
use calbridge_domain::{
    CalBridgeError, CalendarEvent, EventTime, EventType, NewEvent, ReminderMethod,
    ReminderOverride, RemoteDateTime, RemoteEvent, RemoteEventDraft, Result,
};
use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

/// Maps events using one configured timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMapper {
    tz: Tz,
}

impl EventMapper {
    /// Create a mapper for `tz`.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The configured timezone.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Build the remote payload for a validated event.
    ///
    /// Timed events last one hour from `due_time`. All-day events run from
    /// local midnight on `due_date` to local midnight the next day. Both
    /// boundaries carry the configured zone name.
    ///
    /// # Errors
    /// `InvalidInput` when a boundary cannot be placed in the local zone.
    pub fn to_remote(&self, event: &NewEvent) -> Result<RemoteEventDraft> {
        let (start, end) = match event.due_time {
            Some(time) => {
                let start = self.localize(event.due_date.and_time(time))?;
                (start, start + Duration::minutes(TIMED_EVENT_DURATION_MINUTES))
            }
            None => {
                let next_day = event.due_date.succ_opt().ok_or_else(|| {
                    CalBridgeError::InvalidInput(format!("dueDate {} is out of range", event.due_date))
                })?;
                (
                    self.localize(event.due_date.and_time(NaiveTime::MIN))?,
                    self.localize(next_day.and_time(NaiveTime::MIN))?,
                )
            }
        };

        Ok(RemoteEventDraft {
            summary: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            location: event.location.clone().unwrap_or_default(),
            start: self.remote_date_time(start),
            end: self.remote_date_time(end),
            attendees: event.attendees.clone(),
            reminders: default_reminders(),
        })
    }

    /// Map a pulled remote event into an internal row for `user_id`.
    ///
    /// Timed starts keep the date and wall-clock time of the remote's own
    /// offset, so an evening event stays on its calendar day.
    pub fn to_internal(&self, remote: &RemoteEvent, user_id: &str, now: DateTime<Utc>) -> CalendarEvent {
        let (due_date, due_time) = match &remote.start {
            EventTime::DateTime { instant, .. } => (instant.date_naive(), Some(instant.time())),
            EventTime::Date(date) => (*date, None),
        };

        let title = remote
            .summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNTITLED_EVENT_TITLE)
            .to_string();

        CalendarEvent {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            class_id: None,
            source_text: format!("{}{}", REMOTE_SOURCE_PREFIX, title),
            title,
            description: remote.description.clone().filter(|d| !d.is_empty()),
            event_type: EventType::GoogleCalendar,
            due_date,
            due_time,
            confidence_score: REMOTE_EVENT_CONFIDENCE,
            created_at: now,
        }
    }

    /// Resolve a wall-clock time. Ambiguous times take the earlier instant;
    /// times skipped by a DST jump move forward past the gap.
    fn localize(&self, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| self.tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
            .ok_or_else(|| {
                CalBridgeError::InvalidInput(format!(
                    "{} does not exist in timezone {}",
                    naive,
                    self.tz.name()
                ))
            })
    }

    fn remote_date_time(&self, instant: DateTime<Tz>) -> RemoteDateTime {
        RemoteDateTime { date_time: instant.fixed_offset(), time_zone: self.tz.name().to_string() }
    }
}

fn default_reminders() -> Vec<ReminderOverride> {
    vec![
        ReminderOverride { method: ReminderMethod::Email, minutes: EMAIL_REMINDER_MINUTES },
        ReminderOverride { method: ReminderMethod::Popup, minutes: POPUP_REMINDER_MINUTES },
    ]
}
