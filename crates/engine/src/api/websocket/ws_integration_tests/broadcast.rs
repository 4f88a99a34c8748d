use super::*;

#[tokio::test]
async fn when_order_placed_then_admins_receive_exact_payload_and_users_do_not() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app)).await;

    let mut admin_ws = ws_authenticated(addr, 1).await;
    let mut user_ws = ws_authenticated(addr, 2).await;
    let mut checkout_ws = ws_connect(addr).await;

    let payload = json!({
        "productId": 7,
        "userId": 3,
        "productDetails": {"name": "Desk Lamp", "price": 39.5, "image": "lamp.png"}
    });

    // The checkout screen publishes without authenticating.
    ws_send_client(
        &mut checkout_ws,
        &ClientMessage::Publish {
            kind: EventKind::OrderPlaced.to_string(),
            payload: payload.clone(),
        },
    )
    .await;

    let ack = ws_expect_message(&mut checkout_ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::PublishAccepted { .. })
    })
    .await;
    assert_eq!(
        ack,
        ServerMessage::PublishAccepted {
            kind: EventKind::OrderPlaced,
            attempted: 1,
            succeeded: 1,
        }
    );

    let event = ws_expect_message(&mut admin_ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Event { .. })
    })
    .await;
    assert_eq!(
        event,
        ServerMessage::Event {
            kind: EventKind::OrderPlaced,
            payload,
        }
    );

    ws_expect_no_message_matching(&mut user_ws, Duration::from_millis(200), |m| {
        matches!(m, ServerMessage::Event { .. })
    })
    .await;

    server.abort();
}

#[tokio::test]
async fn when_status_changes_then_users_receive_and_admins_do_not() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app)).await;

    let mut admin_ws = ws_authenticated(addr, 1).await;
    let mut user_a = ws_authenticated(addr, 2).await;
    let mut user_b = ws_authenticated(addr, 3).await;

    ws_send_client(
        &mut admin_ws,
        &ClientMessage::Publish {
            kind: EventKind::OrderStatusChanged.to_string(),
            payload: json!({"productId": "7", "status": "processing"}),
        },
    )
    .await;

    let ack = ws_expect_message(&mut admin_ws, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::PublishAccepted { .. })
    })
    .await;
    assert!(matches!(
        ack,
        ServerMessage::PublishAccepted {
            attempted: 2,
            succeeded: 2,
            ..
        }
    ));

    for ws in [&mut user_a, &mut user_b] {
        let _ = ws_expect_message(ws, Duration::from_secs(2), |m| {
            matches!(m, ServerMessage::Event { kind: EventKind::OrderStatusChanged, payload }
                if payload["status"] == "processing")
        })
        .await;
    }

    ws_expect_no_message_matching(&mut admin_ws, Duration::from_millis(200), |m| {
        matches!(m, ServerMessage::Event { .. })
    })
    .await;

    server.abort();
}

#[tokio::test]
async fn when_unauthenticated_then_no_events_are_received() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app.clone())).await;

    let mut anonymous = ws_connect(addr).await;
    // Wait for the registration to land before publishing.
    ws_send_client(&mut anonymous, &ClientMessage::Heartbeat).await;
    let _ = ws_expect_message(&mut anonymous, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Pong)
    })
    .await;

    for kind in EventKind::ALL {
        let payload = match kind {
            EventKind::OrderPlaced => json!({"productId": 1, "userId": 2}),
            EventKind::OrderStatusChanged => json!({"productId": 1, "status": "checkout"}),
        };
        app.use_cases
            .notification
            .gateway
            .publish(kind, payload)
            .await
            .unwrap();
    }

    ws_expect_no_message_matching(&mut anonymous, Duration::from_millis(200), |m| {
        matches!(m, ServerMessage::Event { .. })
    })
    .await;

    server.abort();
}

#[tokio::test]
async fn when_events_are_published_in_order_then_members_receive_them_in_order() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app.clone())).await;

    let mut user_ws = ws_authenticated(addr, 2).await;

    let statuses = ["checkout", "processing", "shipped", "delivered"];
    for status in statuses {
        app.use_cases
            .notification
            .gateway
            .publish(
                EventKind::OrderStatusChanged,
                json!({"productId": 7, "status": status}),
            )
            .await
            .unwrap();
    }

    let mut received = Vec::new();
    while received.len() < statuses.len() {
        let msg = ws_expect_message(&mut user_ws, Duration::from_secs(2), |m| {
            matches!(m, ServerMessage::Event { .. })
        })
        .await;
        if let ServerMessage::Event { payload, .. } = msg {
            received.push(payload["status"].as_str().unwrap_or_default().to_string());
        }
    }
    assert_eq!(received, statuses);

    server.abort();
}

#[tokio::test]
async fn when_payload_is_invalid_then_invalid_event_error() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app)).await;

    let mut admin_ws = ws_authenticated(addr, 1).await;
    let mut publisher = ws_connect(addr).await;

    ws_send_client(
        &mut publisher,
        &ClientMessage::Publish {
            kind: EventKind::OrderPlaced.to_string(),
            payload: json!({"productId": 7}),
        },
    )
    .await;

    let _ = ws_expect_message(&mut publisher, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Error { code, .. } if code == error_codes::INVALID_EVENT)
    })
    .await;
    ws_expect_no_message_matching(&mut admin_ws, Duration::from_millis(200), |m| {
        matches!(m, ServerMessage::Event { .. })
    })
    .await;

    server.abort();
}

#[tokio::test]
async fn when_kind_is_unknown_then_invalid_event_error() {
    let app = build_test_app();
    let (addr, server) = spawn_ws_server(build_ws_state(app)).await;

    let mut admin_ws = ws_authenticated(addr, 1).await;
    let mut publisher = ws_connect(addr).await;

    ws_send_client(
        &mut publisher,
        &ClientMessage::Publish {
            kind: "orderShipped".to_string(),
            payload: json!({"productId": 7, "userId": 3}),
        },
    )
    .await;

    let reply = ws_expect_message(&mut publisher, Duration::from_secs(2), |m| {
        matches!(m, ServerMessage::Error { .. })
    })
    .await;
    assert!(matches!(
        reply,
        ServerMessage::Error { code, .. } if code == error_codes::INVALID_EVENT
    ));
    ws_expect_no_message_matching(&mut admin_ws, Duration::from_millis(200), |m| {
        matches!(m, ServerMessage::Event { .. })
    })
    .await;

    server.abort();
}
