//! WebSocket handling for storefront connections.
//!
//! Every socket starts unauthenticated. A client submits its credential with
//! an `Authenticate` message and, once resolved, receives the events routed
//! to its role group. Any socket may publish order events.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

mod ws_auth;
mod ws_publish;

use ordercast_domain::ConnectionId;
use ordercast_protocol::{error_codes, ClientMessage, ServerMessage};

use super::connections::ConnectionRegistry;
use crate::app::App;

/// Default buffer size for the per-connection message channel.
pub const CONNECTION_CHANNEL_BUFFER: usize = 256;

/// How long the writer gets to flush queued replies after the client goes away.
const WRITER_FLUSH_TIMEOUT: Duration = Duration::from_millis(500);

/// Combined state for WebSocket handlers.
pub struct WsState {
    pub app: Arc<App>,
    pub connections: Arc<ConnectionRegistry>,
    /// Outbound buffer per connection; deliveries to a full buffer are dropped.
    pub channel_buffer: usize,
}

impl WsState {
    pub fn new(app: Arc<App>, channel_buffer: usize) -> Self {
        Self {
            connections: app.connections.clone(),
            app,
            channel_buffer,
        }
    }
}

/// WebSocket upgrade handler - entry point for new connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (ws_sender, mut ws_receiver) = socket.split();

    let connection_id = ConnectionId::new();

    // Bounded channel; one writer task drains it in FIFO order.
    let (tx, rx) = mpsc::channel::<ServerMessage>(state.channel_buffer);

    state.connections.register(connection_id, tx.clone()).await;

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    let send_task = spawn_writer(ws_sender, rx);

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(msg) => {
                    if let Some(response) = handle_message(msg, &state, connection_id).await {
                        queue_reply(&tx, connection_id, response);
                    }
                }
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, error = %e, "Failed to parse message");
                    let error = ServerMessage::error(
                        error_codes::PARSE_ERROR,
                        format!("Invalid message format: {}", e),
                    );
                    queue_reply(&tx, connection_id, error);
                }
            },
            Ok(Message::Ping(_)) => {
                queue_reply(&tx, connection_id, ServerMessage::Pong);
            }
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::error!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Clean up
    state.connections.unregister(connection_id).await;
    finish_writer(tx, send_task, connection_id).await;

    tracing::info!(connection_id = %connection_id, "WebSocket connection terminated");
}

/// Drain the outbound channel into the socket until every sender is gone.
fn spawn_writer<S>(mut sink: S, mut rx: mpsc::Receiver<ServerMessage>) -> JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sink.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize server message");
                }
            }
        }
    })
}

/// Drop the handler's sender and give the writer a bounded window to flush
/// replies that are already queued. The registry must have released its
/// sender first.
async fn finish_writer(
    tx: mpsc::Sender<ServerMessage>,
    mut writer: JoinHandle<()>,
    connection_id: ConnectionId,
) {
    drop(tx);
    if tokio::time::timeout(WRITER_FLUSH_TIMEOUT, &mut writer)
        .await
        .is_err()
    {
        tracing::debug!(connection_id = %connection_id, "Writer did not flush in time");
        writer.abort();
    }
}

/// Queue a reply for the writer task without blocking the read loop.
fn queue_reply(tx: &mpsc::Sender<ServerMessage>, connection_id: ConnectionId, msg: ServerMessage) {
    if tx.try_send(msg).is_err() {
        tracing::warn!(
            connection_id = %connection_id,
            "Failed to send response, channel full or closed"
        );
    }
}

/// Dispatch a parsed client message to the appropriate handler.
async fn handle_message(
    msg: ClientMessage,
    state: &WsState,
    connection_id: ConnectionId,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Heartbeat => Some(ServerMessage::Pong),

        ClientMessage::Authenticate { token } => {
            tracing::debug!(connection_id = %connection_id, "Authenticate message received");
            ws_auth::handle_authenticate(state, connection_id, &token).await
        }

        ClientMessage::Publish { kind, payload } => {
            ws_publish::handle_publish(state, connection_id, kind, payload).await
        }
    }
}


#[cfg(test)]
pub(crate) mod test_support;
