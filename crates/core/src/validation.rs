//! Input guards shared by the services

use calbridge_domain::{CalBridgeError, Result};

/// Reject a missing or blank identifier, returning it trimmed.
///
/// # Errors
/// Returns `CalBridgeError::InvalidInput` naming `field`.
pub fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CalBridgeError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed)
}
