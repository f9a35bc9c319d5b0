//! # chord-gateway
//!
//! Client for the Discord-style gateway: a persistent WebSocket session that performs the
//! Hello → Identify → Ready handshake, keeps itself alive with periodic heartbeats, and hands
//! typed events to the caller.

pub mod bot;
pub mod events;
pub mod heartbeat;
pub mod protocol;
pub mod rest;
pub mod session;
pub mod transport;

pub use events::{EventDecodeError, GatewayEvent, GatewayEventType};
pub use heartbeat::HeartbeatStats;
pub use protocol::{CloseCode, GatewayMessage, OpCode};
pub use rest::{RestClient, RestError};
pub use session::{GatewayError, GatewaySession, HandshakeError, SessionOptions, SessionState};
pub use transport::{FrameWriter, Transport, TransportError, WsStream};
