//! Ping command

use crate::events::{GatewayEvent, MessageCreateEvent};
use chord_core::Snowflake;

/// A message the bot wants to post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub channel_id: Snowflake,
    pub content: String,
}

/// Decides replies to incoming messages
#[derive(Debug, Clone)]
pub struct PingBot {
    prefix: String,
    self_id: Snowflake,
}

impl PingBot {
    /// Text sent back for the ping command
    pub const PONG: &'static str = "Pong!";

    /// `self_id` is the bot's own user ID; its messages are never answered
    #[must_use]
    pub fn new(prefix: impl Into<String>, self_id: Snowflake) -> Self {
        Self {
            prefix: prefix.into(),
            self_id,
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Reply for a decoded event, if any
    #[must_use]
    pub fn handle(&self, event: &GatewayEvent) -> Option<Reply> {
        match event {
            GatewayEvent::MessageCreate(message) => self.reply_to(message),
            _ => None,
        }
    }

    /// Reply for a newly created message, if any
    #[must_use]
    pub fn reply_to(&self, message: &MessageCreateEvent) -> Option<Reply> {
        if message.author.id == self.self_id {
            return None;
        }

        let command = message.content.trim().strip_prefix(self.prefix.as_str())?;
        if command != "ping" {
            return None;
        }

        Some(Reply {
            channel_id: message.channel_id,
            content: Self::PONG.to_string(),
        })
    }
}
