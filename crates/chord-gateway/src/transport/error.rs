//! Transport error types

use crate::protocol::CloseCode;
use std::time::Duration;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors raised by the WebSocket transport
///
/// The transport never retries; every error is surfaced to the session.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The WebSocket connection could not be established
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    /// Socket-level read or write failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// A text frame did not contain a valid envelope
    #[error("Invalid frame payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// An outbound envelope could not be serialized
    #[error("Failed to encode frame: {0}")]
    Encode(#[source] serde_json::Error),

    /// The gateway speaks JSON text frames only
    #[error("Unexpected binary frame ({0} bytes)")]
    UnexpectedBinary(usize),

    /// The peer sent a close frame or the stream ended
    #[error("Connection closed by peer{}", describe_close(.code, .reason))]
    Closed { code: Option<u16>, reason: String },

    /// The local write half has been closed
    #[error("Connection writer is closed")]
    WriterClosed,

    /// A write did not complete in time, usually because the peer stopped reading
    #[error("Timed out after {}ms writing a frame", .0.as_millis())]
    WriteTimeout(Duration),
}

impl TransportError {
    /// Gateway close code carried by a peer close, if it is a known one
    #[must_use]
    pub fn close_code(&self) -> Option<CloseCode> {
        match self {
            Self::Closed { code: Some(code), .. } => CloseCode::from_u16(*code),
            _ => None,
        }
    }

    /// Whether the connection is gone (as opposed to a single bad frame)
    #[must_use]
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            Self::Closed { .. }
                | Self::WriterClosed
                | Self::WriteTimeout(_)
                | Self::WebSocket(_)
                | Self::Connect { .. }
        )
    }
}

fn describe_close(code: &Option<u16>, reason: &str) -> String {
    let known = code.and_then(CloseCode::from_u16);
    match (code, known) {
        (_, Some(known)) => format!(": {known}"),
        (Some(code), None) if reason.is_empty() => format!(": code {code}"),
        (Some(code), None) => format!(": {reason} ({code})"),
        (None, _) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_display() {
        let err = TransportError::Closed {
            code: Some(4004),
            reason: "Authentication failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Connection closed by peer: Authentication failed (4004)"
        );
        assert_eq!(err.close_code(), Some(CloseCode::AuthenticationFailed));

        let err = TransportError::Closed {
            code: Some(1000),
            reason: String::new(),
        };
        assert_eq!(err.to_string(), "Connection closed by peer: code 1000");
        assert_eq!(err.close_code(), None);

        let err = TransportError::Closed {
            code: None,
            reason: String::new(),
        };
        assert_eq!(err.to_string(), "Connection closed by peer");
    }

    #[test]
    fn test_write_timeout_display() {
        let err = TransportError::WriteTimeout(Duration::from_secs(2));
        assert_eq!(err.to_string(), "Timed out after 2000ms writing a frame");
    }

    #[test]
    fn test_is_disconnect() {
        assert!(TransportError::WriterClosed.is_disconnect());
        assert!(TransportError::WriteTimeout(Duration::from_secs(2)).is_disconnect());
        assert!(!TransportError::UnexpectedBinary(3).is_disconnect());

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!TransportError::Decode(decode).is_disconnect());
    }
}
