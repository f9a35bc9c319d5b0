//! Gateway intents bitflags
//!
//! Intents select which event categories the gateway delivers to a session. They are combined
//! with bitwise OR before Identify and stay fixed for the lifetime of the session.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Discord gateway intent flags
    ///
    /// Sent as a plain integer in the Identify payload.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u64 {
        const GUILDS                        = 1 << 0;
        /// Privileged
        const GUILD_MEMBERS                 = 1 << 1;
        const GUILD_MODERATION              = 1 << 2;
        const GUILD_EXPRESSIONS             = 1 << 3;
        const GUILD_INTEGRATIONS            = 1 << 4;
        const GUILD_WEBHOOKS                = 1 << 5;
        const GUILD_INVITES                 = 1 << 6;
        const GUILD_VOICE_STATES            = 1 << 7;
        /// Privileged
        const GUILD_PRESENCES               = 1 << 8;
        const GUILD_MESSAGES                = 1 << 9;
        const GUILD_MESSAGE_REACTIONS       = 1 << 10;
        const GUILD_MESSAGE_TYPING          = 1 << 11;
        const DIRECT_MESSAGES               = 1 << 12;
        const DIRECT_MESSAGE_REACTIONS      = 1 << 13;
        const DIRECT_MESSAGE_TYPING         = 1 << 14;
        /// Privileged
        const MESSAGE_CONTENT               = 1 << 15;
        const GUILD_SCHEDULED_EVENTS        = 1 << 16;
        const AUTO_MODERATION_CONFIGURATION = 1 << 20;
        const AUTO_MODERATION_EXECUTION     = 1 << 21;
        const GUILD_MESSAGE_POLLS           = 1 << 24;
        const DIRECT_MESSAGE_POLLS          = 1 << 25;

        /// What a text-command music bot needs: guild and DM messages with content, plus voice states
        const MUSIC_BOT = Self::GUILDS.bits()
            | Self::GUILD_VOICE_STATES.bits()
            | Self::GUILD_MESSAGES.bits()
            | Self::DIRECT_MESSAGES.bits()
            | Self::MESSAGE_CONTENT.bits();

        /// Intents that must be enabled in the developer portal before Identify accepts them
        const PRIVILEGED = Self::GUILD_MEMBERS.bits()
            | Self::GUILD_PRESENCES.bits()
            | Self::MESSAGE_CONTENT.bits();
    }
}

impl Intents {
    /// Combine intents from several sources
    pub fn combine<I>(sets: I) -> Self
    where
        I: IntoIterator<Item = Intents>,
    {
        sets.into_iter().fold(Intents::empty(), |acc, i| acc | i)
    }

    /// Privileged intents contained in this set
    #[inline]
    pub fn privileged(self) -> Self {
        self & Self::PRIVILEGED
    }

    /// Check if any privileged intent is requested
    #[inline]
    pub fn requires_privileged(self) -> bool {
        self.intersects(Self::PRIVILEGED)
    }

    /// Parse from configuration text
    ///
    /// Accepts a decimal bitmask (`"37505"`) or flag names joined by `|` or `,`
    /// (`"GUILDS | GUILD_MESSAGES"`). Names are case-insensitive.
    /// A bitmask is kept as given, including bits without a name here.
    pub fn parse(s: &str) -> Result<Self, IntentsParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IntentsParseError::Empty);
        }

        if let Ok(bits) = trimmed.parse::<u64>() {
            return Ok(Intents::from_bits_retain(bits));
        }

        trimmed
            .split(['|', ','])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .try_fold(Intents::empty(), |acc, name| {
                Intents::from_name(&name.to_ascii_uppercase())
                    .map(|flag| acc | flag)
                    .ok_or_else(|| IntentsParseError::UnknownName(name.to_string()))
            })
    }

    /// Names of every single-bit intent that is set
    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names()
            .filter(|(_, flag)| flag.bits().is_power_of_two())
            .map(|(name, _)| name)
            .collect()
    }
}

/// Error when parsing intents from configuration text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentsParseError {
    #[error("intent list is empty")]
    Empty,

    #[error("unknown intent name: {0}")]
    UnknownName(String),
}

impl Default for Intents {
    fn default() -> Self {
        Intents::empty()
    }
}

impl fmt::Display for Intents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Intents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u64::deserialize(deserializer)?;
        Ok(Intents::from_bits_retain(bits))
    }
}

impl From<u64> for Intents {
    fn from(bits: u64) -> Self {
        Intents::from_bits_retain(bits)
    }
}

impl From<Intents> for u64 {
    fn from(intents: Intents) -> Self {
        intents.bits()
    }
}
