//! Gateway Session Integration Tests
//!
//! Runs the session against a scripted gateway over a real WebSocket on localhost. No
//! external services are needed.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use chord_core::{Intents, Snowflake};
use chord_gateway::{
    CloseCode, GatewayError, GatewayEvent, GatewayMessage, GatewaySession, HandshakeError, OpCode,
    SessionOptions, SessionState,
};
use integration_tests::{fixtures::*, MockGateway};

fn options(gateway: &MockGateway) -> SessionOptions {
    SessionOptions::new("integration-token", Intents::MUSIC_BOT).with_gateway_url(gateway.url())
}

// ============================================================================
// Handshake Tests
// ============================================================================

#[tokio::test]
async fn test_connect_reports_ready_identity() {
    let gateway = MockGateway::start(41_250).await.unwrap();

    let mut session = GatewaySession::connect_with(&options(&gateway)).await.unwrap();

    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.self_user().id, Snowflake::new(BOT_ID));
    assert_eq!(session.self_user().username, BOT_USERNAME);
    assert_eq!(session.self_user().display_name(), BOT_DISPLAY_NAME);
    assert_eq!(session.heartbeat_interval(), Duration::from_millis(41_250));
    assert_eq!(session.session_id(), Some("mock-session"));

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_identify_sent_after_hello() {
    let gateway = MockGateway::start(41_250).await.unwrap();

    let mut session = GatewaySession::connect_with(&options(&gateway)).await.unwrap();
    session.shutdown().await.unwrap();
    gateway.wait_for(OpCode::Close, 1).await.unwrap();

    let frames = gateway.frames();
    assert_eq!(frames[0].op, OpCode::Identify);

    let identify = frames[0].as_identify().unwrap();
    assert_eq!(identify.token, "integration-token");
    assert_eq!(identify.intents, Intents::MUSIC_BOT);
    assert_eq!(identify.properties.os, std::env::consts::OS);
}

#[tokio::test]
async fn test_first_frame_not_hello_fails() {
    let gateway = MockGateway::start_with(
        vec![GatewayMessage::dispatch("READY", 1, ready_payload())],
        vec![],
    )
    .await
    .unwrap();

    let err = GatewaySession::connect_with(&options(&gateway))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GatewayError::Handshake(HandshakeError::UnexpectedOpcode {
            expected: OpCode::Hello,
            actual: OpCode::Dispatch,
        })
    ));

    // Nothing was sent: no Identify, no heartbeat
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(gateway.frames().is_empty());
}

#[tokio::test]
async fn test_rejected_token_surfaces_close_code() {
    let gateway = MockGateway::start_with(vec![GatewayMessage::hello(41_250)], vec![])
        .await
        .unwrap();

    let connecting = tokio::spawn({
        let options = options(&gateway);
        async move { GatewaySession::connect_with(&options).await }
    });

    gateway.wait_for(OpCode::Identify, 1).await.unwrap();
    gateway.close_with(4004, "Authentication failed");

    let err = connecting.await.unwrap().unwrap_err();
    assert_eq!(err.close_code(), Some(CloseCode::AuthenticationFailed));
    assert!(!err.is_reconnectable());
}

#[tokio::test]
async fn test_unreachable_gateway() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let options = SessionOptions::new("token", Intents::GUILDS)
        .with_gateway_url(format!("ws://{addr}/?v=10&encoding=json"));

    let err = GatewaySession::connect_with(&options).await.unwrap_err();
    assert!(matches!(err, GatewayError::Connection(_)));
}

// ============================================================================
// Steady-State Tests
// ============================================================================

#[tokio::test]
async fn test_receive_dispatch_and_decode() {
    let gateway = MockGateway::start(41_250).await.unwrap();
    let mut session = GatewaySession::connect_with(&options(&gateway)).await.unwrap();

    gateway.send(GatewayMessage::heartbeat_ack());
    gateway.send(message_create(2, 42, 3000, "hello there"));

    let message = session.receive_next().await.unwrap();
    assert_eq!(message.event_type(), Some("MESSAGE_CREATE"));
    assert_eq!(message.s, Some(2));
    assert_eq!(session.last_sequence(), Some(2));
    assert_eq!(session.heartbeat_stats().acks_received(), 1);

    let GatewayEvent::MessageCreate(created) = GatewayEvent::from_message(&message).unwrap() else {
        panic!("expected MESSAGE_CREATE");
    };
    assert_eq!(created.author.id, Snowflake::new(42));
    assert_eq!(created.channel_id, Snowflake::new(3000));
    assert_eq!(created.content, "hello there");

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_event_passes_through() {
    let gateway = MockGateway::start(41_250).await.unwrap();
    let mut session = GatewaySession::connect_with(&options(&gateway)).await.unwrap();

    gateway.send(GatewayMessage::dispatch(
        "AUTO_MODERATION_ACTION_EXECUTION",
        2,
        serde_json::json!({"guild_id": "2000"}),
    ));

    let message = session.receive_next().await.unwrap();
    let event = GatewayEvent::from_message(&message).unwrap();
    assert!(matches!(event, GatewayEvent::Unrecognized { .. }));
    assert_eq!(event.event_type(), "AUTO_MODERATION_ACTION_EXECUTION");

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_server_close_is_read_error() {
    let gateway = MockGateway::start(41_250).await.unwrap();
    let mut session = GatewaySession::connect_with(&options(&gateway)).await.unwrap();

    gateway.close_with(4000, "Unknown error");

    let err = session.receive_next().await.unwrap_err();
    assert!(matches!(err, GatewayError::SessionRead(_)));
    assert_eq!(err.close_code(), Some(CloseCode::UnknownError));
    assert!(err.is_reconnectable());
}

// ============================================================================
// Heartbeat Tests
// ============================================================================

#[tokio::test]
async fn test_heartbeat_rate() {
    let gateway = MockGateway::start(50).await.unwrap();
    let mut session = GatewaySession::connect_with(&options(&gateway)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(275)).await;
    let beats = gateway.count(OpCode::Heartbeat);
    assert!((4..=6).contains(&beats), "expected about 5 beats, got {beats}");

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_heartbeat_stops_after_connection_lost() {
    let gateway = MockGateway::start(50).await.unwrap();
    let mut session = GatewaySession::connect_with(&options(&gateway)).await.unwrap();

    gateway.close_with(4000, "Unknown error");
    assert!(session.receive_next().await.is_err());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!session.is_heartbeat_running());
}

// ============================================================================
// Shutdown Tests
// ============================================================================

#[tokio::test]
async fn test_shutdown_sends_one_close_frame() {
    let gateway = MockGateway::start(41_250).await.unwrap();
    let mut session = GatewaySession::connect_with(&options(&gateway)).await.unwrap();

    session.shutdown().await.unwrap();
    session.shutdown().await.unwrap();
    assert_eq!(session.state(), SessionState::Closed);

    gateway.wait_for(OpCode::Close, 1).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(gateway.count(OpCode::Close), 1);

    assert!(matches!(
        session.receive_next().await,
        Err(GatewayError::AlreadyClosed)
    ));
}
