//! Test fixtures and data generators
//!
//! Gateway frames shaped like the ones the real gateway sends.

use chord_gateway::GatewayMessage;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// User ID the mock gateway assigns to the bot
pub const BOT_ID: u64 = 1_000;

/// Username the mock gateway assigns to the bot
pub const BOT_USERNAME: &str = "chord";

/// Display name the mock gateway assigns to the bot
pub const BOT_DISPLAY_NAME: &str = "Chord Bot";

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique ID for test data
pub fn unique_id() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst) + 500_000
}

/// READY payload for the bot user
pub fn ready_payload() -> Value {
    json!({
        "v": 10,
        "user": {
            "id": BOT_ID.to_string(),
            "username": BOT_USERNAME,
            "global_name": BOT_DISPLAY_NAME,
            "discriminator": "0",
            "avatar": null,
            "bot": true
        },
        "guilds": [{"id": "2000", "unavailable": true}],
        "session_id": "mock-session",
        "resume_gateway_url": "wss://resume.mock.invalid",
        "application": {"id": BOT_ID.to_string(), "flags": 0}
    })
}

/// READY dispatch with the given sequence number
pub fn ready_frame(sequence: u64) -> GatewayMessage {
    GatewayMessage::dispatch("READY", sequence, ready_payload())
}

/// MESSAGE_CREATE dispatch
pub fn message_create(
    sequence: u64,
    author_id: u64,
    channel_id: u64,
    content: &str,
) -> GatewayMessage {
    GatewayMessage::dispatch(
        "MESSAGE_CREATE",
        sequence,
        json!({
            "id": unique_id().to_string(),
            "channel_id": channel_id.to_string(),
            "guild_id": "2000",
            "author": {
                "id": author_id.to_string(),
                "username": format!("user{author_id}"),
                "bot": author_id == BOT_ID
            },
            "content": content,
            "timestamp": "2024-01-01T00:00:00.000000+00:00",
            "tts": false,
            "mentions": [],
            "attachments": []
        }),
    )
}
