use super::*;

use crate::use_cases::notification::AuthenticateError;

pub(super) async fn handle_authenticate(
    state: &WsState,
    connection_id: ConnectionId,
    token: &str,
) -> Option<ServerMessage> {
    match state
        .app
        .use_cases
        .notification
        .authenticate
        .execute(connection_id, token)
        .await
    {
        Ok(authenticated) => Some(ServerMessage::Authenticated {
            principal_id: authenticated.principal.id,
            role: authenticated.principal.role,
            group: authenticated.group,
        }),
        Err(AuthenticateError::Auth(e)) => Some(ServerMessage::Unauthorized {
            reason: e.client_reason().to_string(),
        }),
        Err(AuthenticateError::AlreadyAuthenticated) => {
            tracing::info!(connection_id = %connection_id, "Repeated authentication rejected");
            Some(ServerMessage::error(
                error_codes::ALREADY_AUTHENTICATED,
                "Connection is already authenticated",
            ))
        }
        Err(AuthenticateError::UnknownConnection) => {
            // Socket closed while the credential was being resolved.
            tracing::debug!(connection_id = %connection_id, "Authentication for closed connection dropped");
            None
        }
    }
}
