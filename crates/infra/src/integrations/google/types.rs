//! Wire formats for the Google Calendar v3 and OAuth2 token APIs.

use calbridge_domain::{
    EventTime, RemoteAttendee, RemoteCalendar, RemoteDateTime, RemoteEvent, RemoteEventDraft,
};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/* -------------------------------------------------------------------------- */
/* OAuth2 token endpoint */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl TokenErrorResponse {
    /// Human-readable `error: description` pair.
    pub fn describe(&self) -> String {
        match &self.error_description {
            Some(description) => format!("{}: {}", self.error, description),
            None => self.error.clone(),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Events */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleEventsResponse {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<GoogleEventDateTime>,
    pub end: Option<GoogleEventDateTime>,
    pub status: Option<String>,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
    #[serde(default)]
    pub attendees: Vec<GoogleAttendee>,
    pub organizer: Option<GoogleAttendee>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct GoogleEventDateTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleAttendee {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "responseStatus")]
    pub response_status: Option<String>,
}

impl GoogleEventDateTime {
    /// `dateTime` wins over `date`. `None` when neither parses.
    fn parse(self) -> Option<EventTime> {
        if let Some(raw) = self.date_time {
            let instant = DateTime::parse_from_rfc3339(&raw).ok()?;
            return Some(EventTime::DateTime { instant, time_zone: self.time_zone });
        }
        let date = NaiveDate::parse_from_str(self.date.as_deref()?, "%Y-%m-%d").ok()?;
        Some(EventTime::Date(date))
    }
}

impl GoogleAttendee {
    fn into_remote(self) -> Option<RemoteAttendee> {
        let email = self.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty())?;
        Some(RemoteAttendee {
            email,
            display_name: self.display_name,
            response_status: self.response_status,
        })
    }
}

impl GoogleEvent {
    /// Convert to the domain shape. Returns `Err(self.id)` when the start is
    /// missing or unparseable.
    pub fn into_remote(self) -> Result<RemoteEvent, String> {
        let Some(start) = self.start.and_then(GoogleEventDateTime::parse) else {
            return Err(self.id);
        };

        Ok(RemoteEvent {
            id: self.id,
            summary: self.summary,
            description: self.description,
            location: self.location,
            start,
            end: self.end.and_then(GoogleEventDateTime::parse),
            status: self.status,
            html_link: self.html_link,
            attendees: self.attendees.into_iter().filter_map(GoogleAttendee::into_remote).collect(),
            organizer: self.organizer.and_then(GoogleAttendee::into_remote),
        })
    }
}

/// Insert/update request body.
#[derive(Debug, Serialize)]
pub(crate) struct GoogleEventBody {
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: GoogleEventDateTime,
    pub end: GoogleEventDateTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<GoogleAttendeeBody>,
    pub reminders: GoogleReminders,
}

#[derive(Debug, Serialize)]
pub(crate) struct GoogleAttendeeBody {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GoogleReminders {
    #[serde(rename = "useDefault")]
    pub use_default: bool,
    pub overrides: Vec<GoogleReminderOverride>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GoogleReminderOverride {
    pub method: &'static str,
    pub minutes: u32,
}

fn wire_time(value: &RemoteDateTime) -> GoogleEventDateTime {
    GoogleEventDateTime {
        date_time: Some(value.date_time.to_rfc3339()),
        date: None,
        time_zone: Some(value.time_zone.clone()),
    }
}

impl From<&RemoteEventDraft> for GoogleEventBody {
    fn from(draft: &RemoteEventDraft) -> Self {
        Self {
            summary: draft.summary.clone(),
            description: draft.description.clone(),
            location: draft.location.clone(),
            start: wire_time(&draft.start),
            end: wire_time(&draft.end),
            attendees: draft
                .attendees
                .iter()
                .map(|email| GoogleAttendeeBody { email: email.clone() })
                .collect(),
            reminders: GoogleReminders {
                use_default: false,
                overrides: draft
                    .reminders
                    .iter()
                    .map(|r| GoogleReminderOverride { method: r.method.as_str(), minutes: r.minutes })
                    .collect(),
            },
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Calendars */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleCalendarListResponse {
    #[serde(default)]
    pub items: Vec<GoogleCalendarEntry>,
}

/// Shared by calendarList entries and calendar resources.
#[derive(Debug, Deserialize)]
pub(crate) struct GoogleCalendarEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    pub description: Option<String>,
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub primary: bool,
    #[serde(rename = "accessRole")]
    pub access_role: Option<String>,
}

impl From<GoogleCalendarEntry> for RemoteCalendar {
    fn from(entry: GoogleCalendarEntry) -> Self {
        Self {
            id: entry.id,
            summary: entry.summary,
            description: entry.description,
            time_zone: entry.time_zone,
            primary: entry.primary,
            access_role: entry.access_role,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GoogleCalendarBody<'a> {
    pub summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(rename = "timeZone")]
    pub time_zone: &'a str,
}
