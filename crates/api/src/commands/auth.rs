//! Authorization and credential commands

use calbridge_domain::{AccessCredential, ConnectionStatus};
use serde::Serialize;
use tracing::info;

use super::SuccessResponse;
use crate::context::AppContext;
use crate::error::CommandError;
use crate::utils::command_helpers::execute_command;

/// Consent URL for the authorization flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// Build the Google consent URL.
///
/// `user_id`, when given, is carried through the OAuth `state` parameter so
/// the callback can attribute the code.
pub async fn generate_auth_url(
    ctx: &AppContext,
    user_id: Option<&str>,
) -> Result<AuthUrlResponse, CommandError> {
    execute_command("auth::generate_auth_url", || async {
        let auth_url = ctx.credentials.authorization_url(user_id)?;
        Ok(AuthUrlResponse { auth_url })
    })
    .await
}

/// Exchange the authorization `code` and store the credential for `user_id`.
pub async fn handle_callback(
    ctx: &AppContext,
    code: &str,
    user_id: &str,
) -> Result<SuccessResponse, CommandError> {
    execute_command("auth::handle_callback", || async {
        ctx.credentials.connect(user_id, code).await?;
        info!(user_id, "Google Calendar connected");
        Ok(SuccessResponse::ok("Google Calendar connected successfully"))
    })
    .await
}

/// Current access credential, refreshed first if it has expired.
pub async fn get_tokens(ctx: &AppContext, user_id: &str) -> Result<AccessCredential, CommandError> {
    execute_command("auth::get_tokens", || ctx.credentials.resolve_credential(user_id)).await
}

/// Force a refresh regardless of expiry.
pub async fn refresh_tokens(
    ctx: &AppContext,
    user_id: &str,
) -> Result<AccessCredential, CommandError> {
    execute_command("auth::refresh_tokens", || ctx.credentials.refresh_credential(user_id)).await
}

/// Forget the stored credential. Succeeds when none exists.
pub async fn disconnect(ctx: &AppContext, user_id: &str) -> Result<SuccessResponse, CommandError> {
    execute_command("auth::disconnect", || async {
        ctx.credentials.disconnect(user_id).await?;
        Ok(SuccessResponse::ok("Google Calendar disconnected"))
    })
    .await
}

/// Best-effort status probe; store failures read as disconnected.
pub async fn connection_status(
    ctx: &AppContext,
    user_id: &str,
) -> Result<ConnectionStatus, CommandError> {
    execute_command("auth::connection_status", || async {
        Ok(ctx.credentials.connection_status(user_id).await)
    })
    .await
}
