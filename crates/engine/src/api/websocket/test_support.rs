use super::*;

use std::{net::SocketAddr, time::Duration};

use axum::routing::get;
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use ordercast_domain::{Principal, PrincipalId, Role};

use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::jwt::{issue_token, JwtTokenVerifier};
use crate::infrastructure::ports::DirectoryRecord;
use crate::infrastructure::user_directory::InMemoryUserDirectory;

pub(crate) const TEST_SECRET: &str = "test-secret";

pub(crate) type TestWs =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Directory seeded with principal 1 (admin) and principals 2 and 3 (users).
pub(crate) fn test_directory() -> InMemoryUserDirectory {
    let record = |id: i64, name: &str, role: &str| DirectoryRecord {
        id: PrincipalId::new(id),
        name: Some(name.to_string()),
        email: None,
        role: role.to_string(),
    };
    InMemoryUserDirectory::from_records([
        record(1, "Store Admin", "admin"),
        record(2, "Ada", "user"),
        record(3, "Grace", "user"),
    ])
}

pub(crate) fn build_test_app() -> Arc<App> {
    Arc::new(App::new(
        Arc::new(JwtTokenVerifier::new(TEST_SECRET)),
        Arc::new(test_directory()),
        Arc::new(SystemClock::new()),
        Duration::from_secs(2),
    ))
}

pub(crate) fn build_ws_state(app: Arc<App>) -> Arc<WsState> {
    Arc::new(WsState::new(app, CONNECTION_CHANNEL_BUFFER))
}

pub(crate) fn token_for(user_id: i64) -> String {
    issue_token(TEST_SECRET, user_id, 3600)
}

/// Register an already-authenticated connection directly in the registry.
pub(crate) async fn connect_subscriber(
    app: &App,
    user_id: i64,
    role: Role,
) -> mpsc::Receiver<ServerMessage> {
    let connection_id = ConnectionId::new();
    let (tx, rx) = mpsc::channel(CONNECTION_CHANNEL_BUFFER);
    app.connections.register(connection_id, tx).await;
    app.connections
        .authenticate(connection_id, Principal::new(PrincipalId::new(user_id), role))
        .await
        .unwrap();
    app.connections.join(connection_id, role.group()).await;
    rx
}

pub(crate) async fn spawn_ws_server(
    state: Arc<WsState>,
) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let router = axum::Router::new().route("/ws", get(ws_handler).with_state(state));

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, handle)
}

pub(crate) async fn ws_connect(addr: SocketAddr) -> TestWs {
    let url = format!("ws://{}/ws", addr);
    let (ws, _resp) = connect_async(url).await.unwrap();
    ws
}

pub(crate) async fn ws_send_client(ws: &mut TestWs, msg: &ClientMessage) {
    let json = serde_json::to_string(msg).unwrap();
    ws.send(WsMessage::Text(json)).await.unwrap();
}

pub(crate) async fn ws_send_raw(ws: &mut TestWs, text: &str) {
    ws.send(WsMessage::Text(text.to_string())).await.unwrap();
}

pub(crate) async fn ws_recv_server(ws: &mut TestWs) -> ServerMessage {
    loop {
        let msg = ws.next().await.unwrap().unwrap();
        match msg {
            WsMessage::Text(text) => {
                return serde_json::from_str::<ServerMessage>(&text).unwrap();
            }
            WsMessage::Binary(bin) => {
                let text = String::from_utf8(bin).unwrap();
                return serde_json::from_str::<ServerMessage>(&text).unwrap();
            }
            _ => {}
        }
    }
}

pub(crate) async fn ws_expect_message<F>(
    ws: &mut TestWs,
    timeout: Duration,
    mut predicate: F,
) -> ServerMessage
where
    F: FnMut(&ServerMessage) -> bool,
{
    tokio::time::timeout(timeout, async {
        loop {
            let msg = ws_recv_server(ws).await;
            if predicate(&msg) {
                return msg;
            }
        }
    })
    .await
    .unwrap()
}

pub(crate) async fn ws_expect_no_message_matching<F>(
    ws: &mut TestWs,
    timeout: Duration,
    mut predicate: F,
) where
    F: FnMut(&ServerMessage) -> bool,
{
    let result = tokio::time::timeout(timeout, async {
        loop {
            let msg = ws_recv_server(ws).await;
            if predicate(&msg) {
                panic!("unexpected message: {:?}", msg);
            }
        }
    })
    .await;

    // We only succeed if we timed out without seeing a matching message.
    assert!(result.is_err());
}

/// Connect and authenticate a socket, waiting for the `Authenticated` reply.
pub(crate) async fn ws_authenticated(addr: SocketAddr, user_id: i64) -> TestWs {
    let mut ws = ws_connect(addr).await;
    ws_send_client(
        &mut ws,
        &ClientMessage::Authenticate {
            token: token_for(user_id),
        },
    )
    .await;
    let _ = ws_expect_message(&mut ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Authenticated { .. })
    })
    .await;
    ws
}
