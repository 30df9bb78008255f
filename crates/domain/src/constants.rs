//! Application constants
//!
//! Centralized location for domain-level constants shared by the credential
//! manager, the event mapper and the sync engine.

// OAuth
pub const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_CALENDAR_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/calendar.events",
];

// Calendar API
pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Sync window and paging
pub const DEFAULT_SYNC_WINDOW_DAYS: i64 = 365;
/// Hard cap on events pulled per sync; no continuation beyond it.
pub const SYNC_PAGE_SIZE: u32 = 2500;
pub const LIST_EVENTS_DEFAULT_MAX_RESULTS: u32 = 250;

// Event mapping
pub const TIMED_EVENT_DURATION_MINUTES: i64 = 60;
pub const EMAIL_REMINDER_MINUTES: u32 = 1440;
pub const POPUP_REMINDER_MINUTES: u32 = 30;
pub const REMOTE_EVENT_CONFIDENCE: f64 = 1.0;
pub const REMOTE_SOURCE_PREFIX: &str = "Imported from Google Calendar: ";
pub const UNTITLED_EVENT_TITLE: &str = "Untitled Event";

// Database
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
pub const SCHEMA_VERSION: i32 = 1;
