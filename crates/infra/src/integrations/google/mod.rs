//! Google OAuth2 and Google Calendar v3 adapters.

pub mod calendar;
pub mod oauth;
mod types;

pub use calendar::GoogleCalendarClient;
pub use oauth::GoogleAuthorizationServer;

use calbridge_domain::CalBridgeError;
use reqwest::Response;

/// Drain a non-success response into `(status, body)` for error messages.
pub(crate) async fn error_parts(response: Response) -> (reqwest::StatusCode, String) {
    let status = response.status();
    let text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
    (status, text)
}

/// Decode a JSON body, reporting failures as remote-service errors.
pub(crate) async fn decode_json<T>(response: Response, what: &str) -> Result<T, CalBridgeError>
where
    T: serde::de::DeserializeOwned,
{
    response.json::<T>().await.map_err(|e| {
        CalBridgeError::RemoteService(format!("Failed to parse Google {what} response: {e}"))
    })
}
