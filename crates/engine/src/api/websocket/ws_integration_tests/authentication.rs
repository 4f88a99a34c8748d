use super::*;

#[tokio::test]
async fn when_admin_authenticates_then_joins_admin_room() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app.clone())).await;

    let mut ws = ws_connect(addr).await;
    ws_send_client(
        &mut ws,
        &ClientMessage::Authenticate {
            token: token_for(1),
        },
    )
    .await;

    let reply = ws_expect_message(&mut ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Authenticated { .. })
    })
    .await;
    let ServerMessage::Authenticated {
        principal_id,
        role,
        group,
    } = reply
    else {
        panic!("expected Authenticated");
    };
    assert_eq!(principal_id.value(), 1);
    assert_eq!(role, Role::Admin);
    assert_eq!(group, GroupName::admin_room());
    assert_eq!(
        app.connections
            .group_members(&GroupName::admin_room())
            .await
            .len(),
        1
    );

    server.abort();
}

#[tokio::test]
async fn when_credential_is_garbage_then_unauthorized_and_retry_is_allowed() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app.clone())).await;

    let mut ws = ws_connect(addr).await;
    ws_send_client(
        &mut ws,
        &ClientMessage::Authenticate {
            token: "garbage".to_string(),
        },
    )
    .await;

    let reply = ws_expect_message(&mut ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Unauthorized { .. })
    })
    .await;
    assert_eq!(
        reply,
        ServerMessage::Unauthorized {
            reason: "Unauthorized: Invalid token".to_string()
        }
    );
    let stats = app.connections.stats().await;
    assert_eq!(stats.authenticated, 0);
    assert!(stats.groups.is_empty());

    ws_send_client(
        &mut ws,
        &ClientMessage::Authenticate {
            token: token_for(2),
        },
    )
    .await;
    let _ = ws_expect_message(&mut ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Authenticated { role: Role::User, .. })
    })
    .await;

    server.abort();
}

#[tokio::test]
async fn when_principal_is_unknown_then_profile_not_found() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app)).await;

    let mut ws = ws_connect(addr).await;
    ws_send_client(
        &mut ws,
        &ClientMessage::Authenticate {
            token: token_for(99),
        },
    )
    .await;

    let reply = ws_expect_message(&mut ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Unauthorized { .. })
    })
    .await;
    assert_eq!(
        reply,
        ServerMessage::Unauthorized {
            reason: "User profile not found".to_string()
        }
    );

    server.abort();
}

#[tokio::test]
async fn when_credential_is_expired_then_unauthorized() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app)).await;

    let mut ws = ws_connect(addr).await;
    ws_send_client(
        &mut ws,
        &ClientMessage::Authenticate {
            token: crate::infrastructure::jwt::issue_token(TEST_SECRET, 1, -60),
        },
    )
    .await;

    let _ = ws_expect_message(&mut ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Unauthorized { reason } if reason == "Unauthorized: Invalid token")
    })
    .await;

    server.abort();
}

#[tokio::test]
async fn when_authenticating_twice_then_rejected_and_group_unchanged() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app.clone())).await;

    let mut ws = ws_authenticated(addr, 2).await;
    ws_send_client(
        &mut ws,
        &ClientMessage::Authenticate {
            token: token_for(1),
        },
    )
    .await;

    let _ = ws_expect_message(&mut ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Error { code, .. } if code == error_codes::ALREADY_AUTHENTICATED)
    })
    .await;
    assert!(app
        .connections
        .group_members(&GroupName::admin_room())
        .await
        .is_empty());
    assert_eq!(
        app.connections
            .group_members(&GroupName::user_room())
            .await
            .len(),
        1
    );

    server.abort();
}

#[tokio::test]
async fn when_message_is_malformed_then_parse_error() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app)).await;

    let mut ws = ws_connect(addr).await;
    ws_send_raw(&mut ws, r#"{"type":"Subscribe","room":"adminRoom"}"#).await;

    let _ = ws_expect_message(&mut ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Error { code, .. } if code == error_codes::PARSE_ERROR)
    })
    .await;

    server.abort();
}

#[tokio::test]
async fn when_heartbeat_then_pong() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app)).await;

    let mut ws = ws_connect(addr).await;
    ws_send_client(&mut ws, &ClientMessage::Heartbeat).await;

    let _ = ws_expect_message(&mut ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Pong)
    })
    .await;

    server.abort();
}

#[tokio::test]
async fn when_socket_closes_then_connection_leaves_every_group() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app.clone())).await;

    let mut ws = ws_authenticated(addr, 1).await;
    assert_eq!(app.connections.stats().await.total, 1);

    ws.close(None).await.unwrap();
    drop(ws);

    tokio::time::timeout(Duration::from_secs(2), async {
        while app.connections.stats().await.total > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert!(app.connections.stats().await.groups.is_empty());

    server.abort();
}
