//! WebSocket transport
//!
//! Owns the raw full-duplex stream. The read half stays with the session; the write half sits
//! behind [`FrameWriter`] so the heartbeat driver and the caller share one serialized send path.

mod error;
mod socket;
mod writer;

pub use error::TransportError;
pub use socket::{Transport, WsStream};
pub use writer::{FrameWriter, CLOSE_TIMEOUT};

#[cfg(test)]
pub(crate) use socket::test_support;
