//! Serialized write half of the connection

use super::TransportError;
use crate::protocol::GatewayMessage;
use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

/// Upper bound on how long closing the connection may block the caller
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

struct WriterState<S> {
    sink: SplitSink<WebSocketStream<S>, Message>,
    closed: bool,
}

/// Cloneable handle to the write half
///
/// Every clone writes through the same lock, so a heartbeat and a caller command can never
/// interleave on the wire. Once closed (explicitly or after a failed write) every later send
/// fails with [`TransportError::WriterClosed`].
pub struct FrameWriter<S = MaybeTlsStream<TcpStream>> {
    inner: Arc<Mutex<WriterState<S>>>,
}

impl<S> Clone for FrameWriter<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> FrameWriter<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(sink: SplitSink<WebSocketStream<S>, Message>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(WriterState {
                sink,
                closed: false,
            })),
        }
    }

    /// Serialize and send one envelope as a text frame
    pub async fn send(&self, message: &GatewayMessage) -> Result<(), TransportError> {
        let json = message.to_json().map_err(TransportError::Encode)?;

        let mut state = self.inner.lock().await;
        if state.closed {
            return Err(TransportError::WriterClosed);
        }

        if let Err(e) = state.sink.send(Message::Text(json.into())).await {
            state.closed = true;
            return Err(e.into());
        }

        trace!(op = %message.op, "Frame sent");
        Ok(())
    }

    /// Like [`send`](Self::send), but gives up after `limit`
    ///
    /// A peer that stops reading fills the socket buffer and stalls every write; this bounds the
    /// wait. After a timeout the frame may be half-written, so the writer should be closed.
    pub async fn send_within(
        &self,
        message: &GatewayMessage,
        limit: Duration,
    ) -> Result<(), TransportError> {
        tokio::time::timeout(limit, self.send(message))
            .await
            .map_err(|_| TransportError::WriteTimeout(limit))?
    }

    /// Send a WebSocket close frame and release the write half
    ///
    /// Idempotent. Failures are logged, never returned: the connection is unusable afterwards
    /// either way.
    pub async fn close(&self) {
        let result = tokio::time::timeout(CLOSE_TIMEOUT, async {
            let mut state = self.inner.lock().await;
            if state.closed {
                return;
            }
            state.closed = true;

            if let Err(e) = state.sink.close().await {
                debug!(error = %e, "WebSocket close handshake failed");
            }
        })
        .await;

        if result.is_err() {
            warn!(timeout_ms = CLOSE_TIMEOUT.as_millis() as u64, "Timed out closing WebSocket");
        }
    }

    /// Whether the write half has been closed
    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.closed
    }
}

impl<S> std::fmt::Debug for FrameWriter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWriter").finish_non_exhaustive()
    }
}
