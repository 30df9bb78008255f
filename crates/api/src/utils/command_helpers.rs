//! Command execution helpers
//!
//! Times each command, logs its outcome and converts domain failures into
//! [`CommandError`].

use std::future::Future;
use std::time::Instant;

use calbridge_domain::Result as DomainResult;

use crate::error::CommandError;
use crate::utils::logging::log_command_execution;

/// Run `command_fn` as the command `command_name`.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn my_command(ctx: &AppContext, user_id: &str) -> Result<MyResponse, CommandError> {
///     execute_command("calendar::my_command", || async {
///         ctx.calendar.do_something(user_id).await
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> Result<T, CommandError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await.map_err(CommandError::from);

    let error_code = result.as_ref().err().map(|e| e.code);
    log_command_execution(command_name, start.elapsed(), error_code);

    result
}
