//! WebSocket connection

use super::{FrameWriter, TransportError};
use crate::protocol::GatewayMessage;
use futures_util::stream::SplitStream;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

/// Stream type of a connection opened with [`Transport::connect`]
pub type WsStream = MaybeTlsStream<TcpStream>;

/// Full-duplex text-frame connection to the gateway
///
/// Reading requires `&mut self` and therefore a single reader. Writing goes through the
/// [`FrameWriter`], which may be cloned freely.
pub struct Transport<S = WsStream> {
    reader: SplitStream<WebSocketStream<S>>,
    writer: FrameWriter<S>,
}

impl Transport<WsStream> {
    /// Open a TLS WebSocket connection
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (stream, response) =
            connect_async(url)
                .await
                .map_err(|source| TransportError::Connect {
                    url: url.to_string(),
                    source,
                })?;

        debug!(url = %url, status = %response.status(), "WebSocket connected");
        Ok(Self::from_stream(stream))
    }
}

impl<S> Transport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already-upgraded WebSocket stream
    pub fn from_stream(stream: WebSocketStream<S>) -> Self {
        let (sink, reader) = stream.split();
        Self {
            reader,
            writer: FrameWriter::new(sink),
        }
    }

    /// Another handle to the shared write half
    #[must_use]
    pub fn writer(&self) -> FrameWriter<S> {
        self.writer.clone()
    }

    /// Send one envelope
    pub async fn send_frame(&self, message: &GatewayMessage) -> Result<(), TransportError> {
        self.writer.send(message).await
    }

    /// Send one envelope, giving up after `limit`
    pub async fn send_frame_within(
        &self,
        message: &GatewayMessage,
        limit: Duration,
    ) -> Result<(), TransportError> {
        self.writer.send_within(message, limit).await
    }

    /// Wait for the next envelope
    ///
    /// Control frames are skipped. A close frame or the end of the stream is reported as
    /// [`TransportError::Closed`].
    pub async fn receive_frame(&mut self) -> Result<GatewayMessage, TransportError> {
        loop {
            let Some(frame) = self.reader.next().await else {
                return Err(TransportError::Closed {
                    code: None,
                    reason: String::new(),
                });
            };

            match frame? {
                Message::Text(text) => {
                    let message = GatewayMessage::from_json(&text).map_err(TransportError::Decode)?;
                    trace!(op = %message.op, seq = ?message.s, "Frame received");
                    return Ok(message);
                }
                Message::Binary(data) => return Err(TransportError::UnexpectedBinary(data.len())),
                Message::Close(frame) => {
                    let (code, reason) = frame
                        .map(|f| (Some(u16::from(f.code)), f.reason.to_string()))
                        .unwrap_or_default();
                    debug!(code = ?code, reason = %reason, "Peer closed the connection");
                    return Err(TransportError::Closed { code, reason });
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    /// Close the connection
    pub async fn close(&self) {
        self.writer.close().await;
    }
}

impl<S> std::fmt::Debug for Transport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport").finish_non_exhaustive()
    }
}
