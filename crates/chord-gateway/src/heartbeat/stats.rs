//! Heartbeat counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between the heartbeat driver and the session
///
/// Observability only: nothing in the session acts on a missing ACK.
#[derive(Debug, Default)]
pub struct HeartbeatStats {
    beats_sent: AtomicU64,
    acks_received: AtomicU64,
    /// Beats sent since the last ACK
    outstanding: AtomicU64,
}

impl HeartbeatStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a heartbeat written to the connection
    pub fn record_beat(&self) {
        self.beats_sent.fetch_add(1, Ordering::SeqCst);
        self.outstanding.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a Heartbeat ACK (op 11)
    pub fn record_ack(&self) {
        self.acks_received.fetch_add(1, Ordering::SeqCst);
        self.outstanding.store(0, Ordering::SeqCst);
    }

    /// Total heartbeats sent
    pub fn beats_sent(&self) -> u64 {
        self.beats_sent.load(Ordering::SeqCst)
    }

    /// Total ACKs received
    pub fn acks_received(&self) -> u64 {
        self.acks_received.load(Ordering::SeqCst)
    }

    /// Heartbeats not yet acknowledged
    pub fn outstanding(&self) -> u64 {
        self.outstanding.load(Ordering::SeqCst)
    }
}
