//! Gateway message format
//!
//! Defines the envelope every frame on the connection is wrapped in.

use super::{HelloPayload, IdentifyPayload, OpCode, PresenceUpdatePayload};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway message format
///
/// Serialized as a flat JSON object: `op` and `d` are always present (`d` may be `null`),
/// `s` and `t` are omitted unless set. `d` is opaque until `op`/`t` have been checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event data payload
    #[serde(default)]
    pub d: Option<Value>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event type (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayMessage {
    fn bare(op: OpCode) -> Self {
        Self {
            op,
            d: None,
            s: None,
            t: None,
        }
    }

    fn with_data(op: OpCode, data: impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            d: Some(serde_json::to_value(data)?),
            ..Self::bare(op)
        })
    }

    // === Client Messages ===

    /// Create a Heartbeat message (op=1) with an empty payload
    #[must_use]
    pub fn heartbeat() -> Self {
        Self::bare(OpCode::Heartbeat)
    }

    /// Create an Identify message (op=2)
    pub fn identify(payload: &IdentifyPayload) -> Result<Self, serde_json::Error> {
        Self::with_data(OpCode::Identify, payload)
    }

    /// Create a Presence Update message (op=3)
    pub fn presence_update(payload: &PresenceUpdatePayload) -> Result<Self, serde_json::Error> {
        Self::with_data(OpCode::PresenceUpdate, payload)
    }

    /// Create the close-intent message (op=1000) sent before the socket is released
    #[must_use]
    pub fn close() -> Self {
        Self::bare(OpCode::Close)
    }

    // === Server Messages ===

    /// Create a Dispatch message (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            d: Some(data),
            s: Some(sequence),
            t: Some(event_type.into()),
        }
    }

    /// Create a Hello message (op=10)
    #[must_use]
    pub fn hello(heartbeat_interval_ms: u64) -> Self {
        Self {
            d: Some(serde_json::json!({ "heartbeat_interval": heartbeat_interval_ms })),
            ..Self::bare(OpCode::Hello)
        }
    }

    /// Create a Heartbeat ACK message (op=11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::bare(OpCode::HeartbeatAck)
    }

    /// Create a Reconnect message (op=7)
    #[must_use]
    pub fn reconnect() -> Self {
        Self::bare(OpCode::Reconnect)
    }

    /// Create an Invalid Session message (op=9)
    ///
    /// `resumable` indicates if the session can be resumed.
    #[must_use]
    pub fn invalid_session(resumable: bool) -> Self {
        Self {
            d: Some(Value::Bool(resumable)),
            ..Self::bare(OpCode::InvalidSession)
        }
    }

    // === Parsing ===

    /// Check if this is a dispatched event
    #[must_use]
    pub fn is_dispatch(&self) -> bool {
        self.op == OpCode::Dispatch
    }

    /// Event type name, only for dispatches
    #[must_use]
    pub fn event_type(&self) -> Option<&str> {
        if self.is_dispatch() {
            self.t.as_deref()
        } else {
            None
        }
    }

    /// Try to parse as a Hello payload (op=10)
    pub fn as_hello(&self) -> Option<HelloPayload> {
        if self.op != OpCode::Hello {
            return None;
        }
        self.decode_data().ok()
    }

    /// Try to parse as an Identify payload (op=2)
    pub fn as_identify(&self) -> Option<IdentifyPayload> {
        if self.op != OpCode::Identify {
            return None;
        }
        self.decode_data().ok()
    }

    /// Resumable flag of an Invalid Session message (op=9)
    pub fn as_invalid_session(&self) -> Option<bool> {
        if self.op != OpCode::InvalidSession {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_bool).unwrap_or(false))
    }

    /// Decode `d` into a concrete type
    ///
    /// A missing `d` is decoded as `null`. The caller is responsible for having checked
    /// `op`/`t` first.
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.d {
            Some(data) => T::deserialize(data),
            None => T::deserialize(&Value::Null),
        }
    }

    // === Utilities ===

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
