//! Database implementations

pub mod calendar_event_repository;
pub mod credential_repository;
pub mod manager;

pub use calendar_event_repository::SqliteCalendarEventRepository;
pub use credential_repository::SqliteCredentialRepository;
pub use manager::{DbManager, SqliteConnection, SqlitePool};
