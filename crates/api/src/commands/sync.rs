//! Sync commands

use calbridge_domain::{CalendarEvent, SyncOutcome, SyncRequest, SyncedEventQuery};

use crate::context::AppContext;
use crate::error::CommandError;
use crate::utils::command_helpers::execute_command;

/// Pull remote events into the local store.
pub async fn sync_events(
    ctx: &AppContext,
    user_id: &str,
    request: SyncRequest,
) -> Result<SyncOutcome, CommandError> {
    execute_command("sync::sync_events", || ctx.sync_engine.sync(user_id, request)).await
}

/// Previously synced rows; no remote call.
pub async fn list_synced_events(
    ctx: &AppContext,
    user_id: &str,
    query: SyncedEventQuery,
) -> Result<Vec<CalendarEvent>, CommandError> {
    execute_command("sync::list_synced_events", || ctx.calendar.list_synced_events(user_id, query))
        .await
}
