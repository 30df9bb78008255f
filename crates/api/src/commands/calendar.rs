//! Remote calendar commands

use calbridge_domain::{
    EventDraft, ListEventsQuery, NewCalendar, PushedEvent, RemoteCalendar, RemoteEvent,
};
use serde::{Deserialize, Serialize};

use super::SuccessResponse;
use crate::context::AppContext;
use crate::error::CommandError;
use crate::utils::command_helpers::execute_command;

/// Body of add/update event requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[serde(default)]
    pub calendar_id: Option<String>,
    #[serde(flatten)]
    pub event: EventDraft,
}

/// Query of delete-event requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarSelector {
    pub calendar_id: Option<String>,
}

/// List the calendars on the user's Google account.
pub async fn list_calendars(
    ctx: &AppContext,
    user_id: &str,
) -> Result<Vec<RemoteCalendar>, CommandError> {
    execute_command("calendar::list_calendars", || ctx.calendar.list_calendars(user_id)).await
}

/// List remote events, expanded and ordered by start time.
pub async fn list_events(
    ctx: &AppContext,
    user_id: &str,
    query: ListEventsQuery,
) -> Result<Vec<RemoteEvent>, CommandError> {
    execute_command("calendar::list_events", || ctx.calendar.list_events(user_id, query)).await
}

/// Create an event on the remote calendar; attendees are notified.
pub async fn add_event(
    ctx: &AppContext,
    user_id: &str,
    request: EventRequest,
) -> Result<PushedEvent, CommandError> {
    execute_command("calendar::add_event", || {
        ctx.sync_engine.push_event(user_id, request.calendar_id.as_deref(), request.event)
    })
    .await
}

/// Replace a remote event with the mapped draft.
pub async fn update_event(
    ctx: &AppContext,
    event_id: &str,
    user_id: &str,
    request: EventRequest,
) -> Result<RemoteEvent, CommandError> {
    execute_command("calendar::update_event", || {
        ctx.calendar.update_event(user_id, request.calendar_id.as_deref(), event_id, request.event)
    })
    .await
}

/// Delete a remote event.
pub async fn delete_event(
    ctx: &AppContext,
    event_id: &str,
    user_id: &str,
    selector: CalendarSelector,
) -> Result<SuccessResponse, CommandError> {
    execute_command("calendar::delete_event", || async {
        ctx.calendar.delete_event(user_id, selector.calendar_id.as_deref(), event_id).await?;
        Ok(SuccessResponse::ok("Event deleted"))
    })
    .await
}

/// Create a secondary calendar.
pub async fn create_calendar(
    ctx: &AppContext,
    user_id: &str,
    calendar: NewCalendar,
) -> Result<RemoteCalendar, CommandError> {
    execute_command("calendar::create_calendar", || ctx.calendar.create_calendar(user_id, calendar))
        .await
}

/// Delete a secondary calendar.
pub async fn delete_calendar(
    ctx: &AppContext,
    calendar_id: &str,
    user_id: &str,
) -> Result<SuccessResponse, CommandError> {
    execute_command("calendar::delete_calendar", || async {
        ctx.calendar.delete_calendar(user_id, calendar_id).await?;
        Ok(SuccessResponse::ok("Calendar deleted"))
    })
    .await
}
