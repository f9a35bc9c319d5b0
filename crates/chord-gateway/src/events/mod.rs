//! Gateway events
//!
//! Typed views over dispatch (op 0) envelopes, keyed by the `t` field.

mod dispatcher;
mod event_types;
mod payloads;

pub use dispatcher::{EventDecodeError, GatewayEvent};
pub use event_types::GatewayEventType;
pub use payloads::{
    AttachmentPayload, ChannelPayload, GuildCreateEvent, GuildDeleteEvent, MessageCreateEvent,
    MessageDeleteEvent, MessageReferencePayload, MessageUpdateEvent, ReadyEvent, TypingStartEvent,
    UnavailableGuild, UserPayload, VoiceStateEvent,
};
