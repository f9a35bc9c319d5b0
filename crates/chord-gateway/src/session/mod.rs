//! Gateway session
//!
//! Connects, runs the Hello / Identify / Ready handshake, keeps the connection alive and hands
//! every inbound envelope to the caller.

mod error;
mod gateway;
mod options;
mod state;

pub use error::{GatewayError, HandshakeError};
pub use gateway::GatewaySession;
pub use options::SessionOptions;
pub use state::SessionState;
