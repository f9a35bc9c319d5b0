//! Handshake and command payload definitions
//!
//! Payloads carried in the `d` field of non-dispatch frames.

use chord_core::Intents;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    ///
    /// Any positive JSON number is accepted and rounded to whole milliseconds.
    #[serde(deserialize_with = "deserialize_interval")]
    pub heartbeat_interval: u64,
}

fn deserialize_interval<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = f64::deserialize(deserializer)?.round();
    if !millis.is_finite() || millis < 1.0 {
        return Err(D::Error::custom(format!(
            "heartbeat_interval must be a positive number of milliseconds, got {millis}"
        )));
    }
    Ok(millis as u64)
}

/// Payload for op 2 (Identify)
///
/// Sent by the client once, right after Hello.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Bot token
    pub token: String,

    /// Event categories the session subscribes to
    pub intents: Intents,

    /// Client connection properties
    pub properties: IdentifyProperties,
}

impl IdentifyPayload {
    #[must_use]
    pub fn new(token: impl Into<String>, intents: Intents, properties: IdentifyProperties) -> Self {
        Self {
            token: token.into(),
            intents,
            properties,
        }
    }
}

/// Client connection properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    /// Operating system
    pub os: String,

    /// Client library name
    pub browser: String,

    /// Device name
    pub device: String,
}

impl IdentifyProperties {
    /// Client name reported in `browser` and `device` by default
    pub const CLIENT_NAME: &'static str = "chord";

    /// Properties describing this process
    #[must_use]
    pub fn new() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: Self::CLIENT_NAME.to_string(),
            device: Self::CLIENT_NAME.to_string(),
        }
    }

    /// Set operating system
    #[must_use]
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    /// Set browser
    #[must_use]
    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = browser.into();
        self
    }

    /// Set device type
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self::new()
    }
}

/// Presence status values accepted by op 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Dnd,
    Idle,
    Invisible,
    Offline,
}

impl PresenceStatus {
    /// Parse a status string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "online" => Some(Self::Online),
            "dnd" => Some(Self::Dnd),
            "idle" => Some(Self::Idle),
            "invisible" => Some(Self::Invisible),
            "offline" => Some(Self::Offline),
            _ => None,
        }
    }
}

/// An activity shown alongside the presence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,

    /// 0 = Playing, 1 = Streaming, 2 = Listening, 3 = Watching, 5 = Competing
    #[serde(rename = "type")]
    pub kind: u8,
}

impl Activity {
    /// "Listening to ..."
    #[must_use]
    pub fn listening(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: 2,
        }
    }

}

/// Payload for op 3 (Presence Update)
///
/// Sent by the client to update its online status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceUpdatePayload {
    /// Unix time (ms) the client went idle, or null
    pub since: Option<u64>,

    pub activities: Vec<Activity>,

    pub status: PresenceStatus,

    pub afk: bool,
}

impl PresenceUpdatePayload {
    #[must_use]
    pub fn new(status: PresenceStatus) -> Self {
        Self {
            since: None,
            activities: Vec::new(),
            status,
            afk: false,
        }
    }

    #[must_use]
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }
}
