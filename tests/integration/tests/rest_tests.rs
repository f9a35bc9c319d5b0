//! REST and Bot Integration Tests
//!
//! Exercises the REST client against a mock API, and the ping bot end to end with a mock
//! gateway feeding it messages.
//!
//! Run with: cargo test -p integration-tests --test rest_tests

use axum::http::StatusCode;
use chord_core::{Intents, Snowflake};
use chord_gateway::bot::{run_event_loop, LoopExit, PingBot};
use chord_gateway::{GatewayMessage, GatewaySession, RestClient, RestError, SessionOptions};
use integration_tests::{fixtures::*, MockGateway, MockRestServer};

// ============================================================================
// REST Client Tests
// ============================================================================

#[tokio::test]
async fn test_send_message() {
    let api = MockRestServer::start().await.unwrap();
    let client = RestClient::with_api_base("rest-token", api.api_base());

    client
        .send_message(Snowflake::new(3000), "Pong!")
        .await
        .unwrap();

    let posted = api.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].channel_id, "3000");
    assert_eq!(posted[0].content, "Pong!");
    assert_eq!(posted[0].authorization.as_deref(), Some("Bot rest-token"));
}

#[tokio::test]
async fn test_send_message_rejected() {
    let api = MockRestServer::start_with_status(StatusCode::FORBIDDEN)
        .await
        .unwrap();
    let client = RestClient::with_api_base("rest-token", api.api_base());

    let err = client
        .send_message(Snowflake::new(3000), "Pong!")
        .await
        .unwrap_err();

    match &err {
        RestError::Status { status, body } => {
            assert_eq!(*status, 403);
            assert!(body.contains("Missing Permissions"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_send_message_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RestClient::with_api_base("rest-token", format!("http://{addr}/api/v10"));
    let err = client
        .send_message(Snowflake::new(1), "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, RestError::Http(_)));
    assert_eq!(err.status(), None);
}

// ============================================================================
// Ping Bot Tests
// ============================================================================

#[tokio::test]
async fn test_ping_bot_end_to_end() {
    let gateway = MockGateway::start(41_250).await.unwrap();
    let api = MockRestServer::start().await.unwrap();

    let options =
        SessionOptions::new("bot-token", Intents::MUSIC_BOT).with_gateway_url(gateway.url());
    let rest = RestClient::with_api_base("bot-token", api.api_base());

    let mut session = GatewaySession::connect_with(&options).await.unwrap();
    let bot = PingBot::new("-", session.self_user().id);

    let channel = unique_id();
    gateway.send(message_create(2, 42, channel, "just chatting"));
    gateway.send(message_create(3, BOT_ID, channel, "-ping"));
    gateway.send(message_create(4, 42, channel, "-ping"));
    gateway.send(GatewayMessage::reconnect());

    let exit = run_event_loop(&mut session, &bot, &rest).await.unwrap();
    assert_eq!(exit, LoopExit::ReconnectRequested);
    session.shutdown().await.unwrap();

    // Only the ping from another user is answered
    let posted = api.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].channel_id, channel.to_string());
    assert_eq!(posted[0].content, "Pong!");
    assert_eq!(posted[0].authorization.as_deref(), Some("Bot bot-token"));
}

#[tokio::test]
async fn test_failed_reply_does_not_stop_bot() {
    let gateway = MockGateway::start(41_250).await.unwrap();
    let api = MockRestServer::start_with_status(StatusCode::FORBIDDEN)
        .await
        .unwrap();

    let options =
        SessionOptions::new("bot-token", Intents::MUSIC_BOT).with_gateway_url(gateway.url());
    let rest = RestClient::with_api_base("bot-token", api.api_base());

    let mut session = GatewaySession::connect_with(&options).await.unwrap();
    let bot = PingBot::new("-", session.self_user().id);

    gateway.send(message_create(2, 42, 3000, "-ping"));
    gateway.send(message_create(3, 43, 3000, "-ping"));
    gateway.send(GatewayMessage::invalid_session(false));

    let exit = run_event_loop(&mut session, &bot, &rest).await.unwrap();
    assert_eq!(exit, LoopExit::SessionInvalidated { resumable: false });
    assert_eq!(api.posted().len(), 2);

    session.shutdown().await.unwrap();
}
