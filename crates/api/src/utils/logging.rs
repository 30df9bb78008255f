use std::time::Duration;

use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// `error_code` is the stable label of the failure, `None` on success.
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error_code: Option<&str>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error_code {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error_code) => {
            warn!(command, duration_ms, error_code, "command_execution_failure");
        }
    }
}
