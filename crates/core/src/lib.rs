//! # CalBridge Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the credential store, the authorization
//!   server, the remote calendar service and the local event store
//! - The credential manager and connection status resolver
//! - The event mapper, sync engine and calendar pass-through service
//!
//! ## Architecture Principles
//! - Only depends on `calbridge-domain`
//! - No database or HTTP code
//! - All external dependencies via traits
//! - Credentials are resolved per call and passed to the remote service by
//!   reference; no client instance ever holds a user's token

pub mod calendar;
pub mod clock;
pub mod credentials;
pub mod validation;

pub use calendar::ports::{
    CalendarEventRepository, EventOrder, ListEventsRequest, NewRemoteCalendar,
    RemoteCalendarService,
};
pub use calendar::{CalendarService, EventMapper, SyncEngine, SyncSettings};
pub use clock::{Clock, SystemClock};
pub use credentials::ports::{AuthUrlRequest, AuthorizationServer, CredentialRepository};
pub use credentials::{resolve_connection_status, CredentialManager};
