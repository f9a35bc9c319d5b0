//! Periodic heartbeat task

use super::HeartbeatStats;
use crate::protocol::GatewayMessage;
use crate::transport::{FrameWriter, TransportError};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Heartbeat driver errors
#[derive(Debug, thiserror::Error)]
pub enum HeartbeatError {
    #[error("Heartbeat interval must be positive")]
    ZeroInterval,
}

/// Background task writing a heartbeat every interval
///
/// The first beat goes out one full interval after start. The task ends on its own at the
/// first failed write; it is aborted when the driver is dropped.
#[derive(Debug)]
pub struct HeartbeatDriver {
    interval: Duration,
    handle: JoinHandle<()>,
}

impl HeartbeatDriver {
    /// Spawn the heartbeat task
    pub fn start<S>(
        writer: FrameWriter<S>,
        interval: Duration,
        stats: Arc<HeartbeatStats>,
    ) -> Result<Self, HeartbeatError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        if interval.is_zero() {
            return Err(HeartbeatError::ZeroInterval);
        }

        let handle = tokio::spawn(run(writer, interval, stats));
        tracing::debug!(interval_ms = interval.as_millis() as u64, "Heartbeat started");

        Ok(Self { interval, handle })
    }

    /// Interval between beats
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the task is still beating
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the task without waiting for it
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for HeartbeatDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run<S>(writer: FrameWriter<S>, period: Duration, stats: Arc<HeartbeatStats>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let outstanding = stats.outstanding();
        if outstanding > 0 {
            tracing::debug!(outstanding, "Previous heartbeat not acknowledged");
        }

        match writer.send(&GatewayMessage::heartbeat()).await {
            Ok(()) => {
                stats.record_beat();
                tracing::trace!(beats_sent = stats.beats_sent(), "Heartbeat sent");
            }
            Err(TransportError::WriterClosed) => {
                tracing::debug!("Connection closed, heartbeat stopped");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to send heartbeat, heartbeat stopped");
                return;
            }
        }
    }
}
