//! Domain types and models

pub mod credential;
pub mod event;
pub mod remote;

pub use credential::{AccessCredential, ConnectionStatus, CredentialRecord, TokenGrant};
pub use event::{CalendarEvent, EventDraft, EventType, NewEvent, SyncedEventQuery};
pub use remote::{
    EventTime, ListEventsQuery, NewCalendar, PushedEvent, ReminderMethod, ReminderOverride,
    RemoteAttendee, RemoteCalendar, RemoteDateTime, RemoteEvent, RemoteEventDraft, SyncOutcome,
    SyncRequest, SyncWindow,
};
