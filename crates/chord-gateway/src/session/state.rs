//! Session lifecycle states

use std::fmt;

/// Session lifecycle
///
/// `Connecting → AwaitingHello → Identifying → AwaitingReady → Ready → Closing → Closed`.
/// A caller only ever observes `Ready`, `Closing` and `Closed`; the earlier states exist while
/// the handshake runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Opening the WebSocket
    Connecting,
    /// Waiting for Hello (op 10)
    AwaitingHello,
    /// Sending Identify (op 2)
    Identifying,
    /// Waiting for the READY dispatch
    AwaitingReady,
    /// Operating state
    Ready,
    /// Shutdown in progress
    Closing,
    /// Terminal
    Closed,
}

impl SessionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::AwaitingHello => "awaiting_hello",
            Self::Identifying => "identifying",
            Self::AwaitingReady => "awaiting_ready",
            Self::Ready => "ready",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }

    /// Whether the session can no longer read or send
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closing | Self::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
