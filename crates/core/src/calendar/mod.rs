//! Calendar integration: remote/local ports, event mapping, sync and the
//! remote pass-through operations.

pub mod mapper;
pub mod ports;
pub mod service;
pub mod sync;

pub use mapper::EventMapper;
pub use service::CalendarService;
pub use sync::{SyncEngine, SyncSettings};
