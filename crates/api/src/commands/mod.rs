//! Commands - one async function per external operation
//!
//! Each command takes the shared [`crate::AppContext`] plus plain arguments,
//! and returns either a serializable response or a [`crate::CommandError`].

mod auth;
mod calendar;
mod health;
mod sync;

pub use auth::*;
pub use calendar::*;
pub use health::*;
pub use sync::*;

use serde::Serialize;

/// Acknowledgement for commands without a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub(crate) fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}
