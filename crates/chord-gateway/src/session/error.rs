//! Session errors

use crate::protocol::{CloseCode, OpCode};
use crate::transport::TransportError;
use thiserror::Error;

/// Failures while establishing a session
///
/// Fatal: no session is returned and the connection has already been closed.
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("Expected {expected} during handshake, received {actual}")]
    UnexpectedOpcode { expected: OpCode, actual: OpCode },

    #[error("Invalid handshake payload: {0}")]
    InvalidPayload(String),

    #[error("Connection failed during handshake: {0}")]
    Transport(#[from] TransportError),
}

/// Gateway session errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The WebSocket could not be opened
    #[error("Failed to connect to gateway: {0}")]
    Connection(#[source] TransportError),

    #[error("Handshake failed: {0}")]
    Handshake(#[from] HandshakeError),

    /// Read failure or malformed frame once ready
    #[error("Failed to read from gateway: {0}")]
    SessionRead(#[source] TransportError),

    #[error("Failed to write to gateway: {0}")]
    Write(#[source] TransportError),

    #[error("Session is already closed")]
    AlreadyClosed,

    #[error("{0} cannot be sent by a client")]
    InvalidCommand(OpCode),
}

impl GatewayError {
    fn transport(&self) -> Option<&TransportError> {
        match self {
            Self::Connection(e)
            | Self::SessionRead(e)
            | Self::Write(e)
            | Self::Handshake(HandshakeError::Transport(e)) => Some(e),
            _ => None,
        }
    }

    /// Gateway close code, if the server closed the connection with one
    #[must_use]
    pub fn close_code(&self) -> Option<CloseCode> {
        self.transport().and_then(TransportError::close_code)
    }

    /// Whether a fresh session with the same settings is worth attempting
    ///
    /// Protocol violations and close codes that reject the credential or intents are final.
    #[must_use]
    pub fn is_reconnectable(&self) -> bool {
        if let Some(code) = self.close_code() {
            return code.should_reconnect();
        }
        match self {
            Self::Connection(_) | Self::SessionRead(_) | Self::Write(_) => true,
            Self::Handshake(HandshakeError::Transport(e)) => e.is_disconnect(),
            _ => false,
        }
    }
}
