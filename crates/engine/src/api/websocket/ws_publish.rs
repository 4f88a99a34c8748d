use super::*;

use serde_json::Value;

/// Publish from a socket. The publisher need not be authenticated.
pub(super) async fn handle_publish(
    state: &WsState,
    connection_id: ConnectionId,
    kind: String,
    payload: Value,
) -> Option<ServerMessage> {
    tracing::debug!(connection_id = %connection_id, kind = %kind, "Publish message received");

    match state
        .app
        .use_cases
        .notification
        .gateway
        .publish_named(&kind, payload)
        .await
    {
        Ok(report) => Some(ServerMessage::PublishAccepted {
            kind: report.kind,
            attempted: report.attempted(),
            succeeded: report.succeeded(),
        }),
        Err(e) => Some(ServerMessage::error(error_codes::INVALID_EVENT, e.to_string())),
    }
}
