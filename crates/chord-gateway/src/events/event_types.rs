//! Dispatch event names with a typed decoding

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dispatch event names the client decodes
///
/// Sent in the `t` field of op 0. Names not listed here are still delivered, as
/// [`GatewayEvent::Unrecognized`](super::GatewayEvent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEventType {
    /// Identify accepted, session is live
    Ready,
    Resumed,
    GuildCreate,
    GuildDelete,
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    TypingStart,
    VoiceStateUpdate,
}

impl GatewayEventType {
    /// Every decoded event paired with its wire name
    pub const ALL: [(Self, &'static str); 9] = [
        (Self::Ready, "READY"),
        (Self::Resumed, "RESUMED"),
        (Self::GuildCreate, "GUILD_CREATE"),
        (Self::GuildDelete, "GUILD_DELETE"),
        (Self::MessageCreate, "MESSAGE_CREATE"),
        (Self::MessageUpdate, "MESSAGE_UPDATE"),
        (Self::MessageDelete, "MESSAGE_DELETE"),
        (Self::TypingStart, "TYPING_START"),
        (Self::VoiceStateUpdate, "VOICE_STATE_UPDATE"),
    ];

    /// Wire name, as found in the `t` field
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        Self::ALL[self as usize].1
    }

    /// Look up a wire name (case-sensitive)
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(_, wire)| *wire == name)
            .map(|(event, _)| *event)
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
