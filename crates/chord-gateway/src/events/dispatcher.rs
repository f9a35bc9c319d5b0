//! Event dispatcher
//!
//! Maps a dispatch envelope to a typed event according to its `t` field.

use super::{
    GatewayEventType, GuildCreateEvent, GuildDeleteEvent, MessageCreateEvent, MessageDeleteEvent,
    MessageUpdateEvent, ReadyEvent, TypingStartEvent, VoiceStateEvent,
};
use crate::protocol::{GatewayMessage, OpCode};
use serde_json::Value;
use thiserror::Error;

/// Event decoding errors
#[derive(Debug, Error)]
pub enum EventDecodeError {
    #[error("Not a dispatch message: op {0}")]
    NotDispatch(OpCode),

    #[error("Dispatch message without an event type")]
    MissingEventType,

    #[error("Invalid {event_type} payload: {source}")]
    InvalidPayload {
        event_type: GatewayEventType,
        #[source]
        source: serde_json::Error,
    },
}

/// A decoded dispatch event
///
/// Event names this client does not model are kept as [`GatewayEvent::Unrecognized`] with the
/// raw payload, so new server events never fail decoding.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    Ready(Box<ReadyEvent>),
    Resumed,
    MessageCreate(Box<MessageCreateEvent>),
    MessageUpdate(MessageUpdateEvent),
    MessageDelete(MessageDeleteEvent),
    GuildCreate(Box<GuildCreateEvent>),
    GuildDelete(GuildDeleteEvent),
    TypingStart(TypingStartEvent),
    VoiceStateUpdate(VoiceStateEvent),
    Unrecognized { event_type: String, data: Value },
}

impl GatewayEvent {
    /// Decode a dispatch envelope
    pub fn from_message(message: &GatewayMessage) -> Result<Self, EventDecodeError> {
        if !message.is_dispatch() {
            return Err(EventDecodeError::NotDispatch(message.op));
        }

        let name = message
            .event_type()
            .ok_or(EventDecodeError::MissingEventType)?;

        let Some(event_type) = GatewayEventType::parse(name) else {
            return Ok(Self::Unrecognized {
                event_type: name.to_string(),
                data: message.d.clone().unwrap_or(Value::Null),
            });
        };

        let invalid = |source: serde_json::Error| EventDecodeError::InvalidPayload {
            event_type,
            source,
        };

        let event = match event_type {
            GatewayEventType::Ready => Self::Ready(message.decode_data().map_err(invalid)?),
            GatewayEventType::Resumed => Self::Resumed,
            GatewayEventType::MessageCreate => {
                Self::MessageCreate(message.decode_data().map_err(invalid)?)
            }
            GatewayEventType::MessageUpdate => {
                Self::MessageUpdate(message.decode_data().map_err(invalid)?)
            }
            GatewayEventType::MessageDelete => {
                Self::MessageDelete(message.decode_data().map_err(invalid)?)
            }
            GatewayEventType::GuildCreate => {
                Self::GuildCreate(message.decode_data().map_err(invalid)?)
            }
            GatewayEventType::GuildDelete => {
                Self::GuildDelete(message.decode_data().map_err(invalid)?)
            }
            GatewayEventType::TypingStart => {
                Self::TypingStart(message.decode_data().map_err(invalid)?)
            }
            GatewayEventType::VoiceStateUpdate => {
                Self::VoiceStateUpdate(message.decode_data().map_err(invalid)?)
            }
        };

        Ok(event)
    }

    /// Wire name of the event
    #[must_use]
    pub fn event_type(&self) -> &str {
        match self {
            Self::Ready(_) => GatewayEventType::Ready.as_str(),
            Self::Resumed => GatewayEventType::Resumed.as_str(),
            Self::MessageCreate(_) => GatewayEventType::MessageCreate.as_str(),
            Self::MessageUpdate(_) => GatewayEventType::MessageUpdate.as_str(),
            Self::MessageDelete(_) => GatewayEventType::MessageDelete.as_str(),
            Self::GuildCreate(_) => GatewayEventType::GuildCreate.as_str(),
            Self::GuildDelete(_) => GatewayEventType::GuildDelete.as_str(),
            Self::TypingStart(_) => GatewayEventType::TypingStart.as_str(),
            Self::VoiceStateUpdate(_) => GatewayEventType::VoiceStateUpdate.as_str(),
            Self::Unrecognized { event_type, .. } => event_type,
        }
    }
}

impl TryFrom<&GatewayMessage> for GatewayEvent {
    type Error = EventDecodeError;

    fn try_from(message: &GatewayMessage) -> Result<Self, Self::Error> {
        Self::from_message(message)
    }
}
