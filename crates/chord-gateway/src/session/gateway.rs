//! Gateway session state machine

use super::{GatewayError, HandshakeError, SessionOptions, SessionState};
use crate::events::{GatewayEventType, ReadyEvent, UserPayload};
use crate::heartbeat::{HeartbeatDriver, HeartbeatStats};
use crate::protocol::{GatewayMessage, HelloPayload, OpCode, PresenceUpdatePayload};
use crate::transport::{Transport, TransportError, WsStream, CLOSE_TIMEOUT};
use chord_core::Intents;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};

/// What the handshake learned before the session goes live
struct Handshake {
    heartbeat_interval: Duration,
    ready: ReadyEvent,
    last_sequence: Option<u64>,
}

/// A live, identified gateway session
///
/// Owns the connection and the heartbeat task. Only the owner reads; sends from the owner and
/// from the heartbeat task are serialized by the shared writer.
pub struct GatewaySession<S = WsStream> {
    transport: Transport<S>,
    state: SessionState,
    self_user: UserPayload,
    session_id: Option<String>,
    resume_gateway_url: Option<String>,
    heartbeat_interval: Duration,
    heartbeat: HeartbeatDriver,
    stats: Arc<HeartbeatStats>,
    last_sequence: Option<u64>,
}

impl GatewaySession<WsStream> {
    /// Connect to the default gateway endpoint and identify
    pub async fn connect(token: &str, intents: Intents) -> Result<Self, GatewayError> {
        Self::connect_with(&SessionOptions::new(token, intents)).await
    }

    /// Connect and identify with explicit options
    ///
    /// Returns once READY has been received and the heartbeat is running.
    pub async fn connect_with(options: &SessionOptions) -> Result<Self, GatewayError> {
        tracing::debug!(
            state = %SessionState::Connecting,
            url = %options.gateway_url,
            "Connecting to gateway"
        );

        let transport = Transport::connect(&options.gateway_url)
            .await
            .map_err(GatewayError::Connection)?;

        Self::handshake(transport, options)
            .await
            .map_err(GatewayError::from)
    }
}

impl<S> GatewaySession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Run Hello / Identify / Ready over an open transport
    ///
    /// On failure the transport is closed before the error is returned, and no heartbeat was
    /// ever started.
    pub async fn handshake(
        mut transport: Transport<S>,
        options: &SessionOptions,
    ) -> Result<Self, HandshakeError> {
        let stats = Arc::new(HeartbeatStats::new());
        let outcome = match run_handshake(&mut transport, options).await {
            Ok(handshake) => HeartbeatDriver::start(
                transport.writer(),
                handshake.heartbeat_interval,
                Arc::clone(&stats),
            )
            .map(|heartbeat| (handshake, heartbeat))
            .map_err(|e| HandshakeError::InvalidPayload(format!("Hello: {e}"))),
            Err(e) => Err(e),
        };

        match outcome {
            Ok((handshake, heartbeat)) => Ok(Self::start(transport, handshake, heartbeat, stats)),
            Err(e) => {
                tracing::warn!(error = %e, "Gateway handshake failed");
                transport.close().await;
                Err(e)
            }
        }
    }

    fn start(
        transport: Transport<S>,
        handshake: Handshake,
        heartbeat: HeartbeatDriver,
        stats: Arc<HeartbeatStats>,
    ) -> Self {
        let Handshake {
            heartbeat_interval,
            ready,
            last_sequence,
        } = handshake;

        tracing::info!(
            user_id = %ready.user.id,
            username = %ready.user.username,
            session_id = ?ready.session_id,
            guilds = ready.guilds.len(),
            "Gateway session ready"
        );

        Self {
            transport,
            state: SessionState::Ready,
            self_user: ready.user,
            session_id: ready.session_id,
            resume_gateway_url: ready.resume_gateway_url,
            heartbeat_interval,
            heartbeat,
            stats,
            last_sequence,
        }
    }

    /// Wait for the next envelope from the gateway
    ///
    /// Heartbeat ACKs are consumed here. Everything else, dispatches included, is returned
    /// unmodified. Reconnect and Invalid Session requests are logged and returned: acting on
    /// them is up to the caller.
    pub async fn receive_next(&mut self) -> Result<GatewayMessage, GatewayError> {
        self.ensure_open()?;

        loop {
            let message = self
                .transport
                .receive_frame()
                .await
                .map_err(GatewayError::SessionRead)?;

            if message.s.is_some() {
                self.last_sequence = message.s;
            }

            match message.op {
                OpCode::HeartbeatAck => {
                    self.stats.record_ack();
                    tracing::trace!(acks = self.stats.acks_received(), "Heartbeat acknowledged");
                    continue;
                }
                OpCode::Reconnect => {
                    tracing::warn!("Gateway requested a reconnect");
                }
                OpCode::InvalidSession => {
                    tracing::warn!(
                        resumable = message.as_invalid_session().unwrap_or(false),
                        "Gateway invalidated the session"
                    );
                }
                op if !op.is_server_op() => {
                    tracing::debug!(op = %op, "Unexpected op from gateway");
                }
                _ => {}
            }

            return Ok(message);
        }
    }

    /// Send a command through the shared writer
    ///
    /// Only client ops are accepted. The close op is reserved for [`shutdown`](Self::shutdown).
    pub async fn send(&self, message: &GatewayMessage) -> Result<(), GatewayError> {
        self.ensure_open()?;

        if !message.op.is_client_op() || message.op == OpCode::Close {
            return Err(GatewayError::InvalidCommand(message.op));
        }

        self.transport
            .send_frame(message)
            .await
            .map_err(GatewayError::Write)
    }

    /// Update the bot's presence (op 3)
    pub async fn update_presence(
        &self,
        presence: &PresenceUpdatePayload,
    ) -> Result<(), GatewayError> {
        let message = GatewayMessage::presence_update(presence)
            .map_err(|e| GatewayError::Write(TransportError::Encode(e)))?;
        self.send(&message).await
    }

    /// Close the session
    ///
    /// Attempts the close-intent frame, then releases the connection whether or not the frame
    /// went out. Both steps are bounded by [`CLOSE_TIMEOUT`], so a peer that stopped reading
    /// cannot hold the session in `Closing`. A second call returns `Ok(())` without touching the
    /// connection.
    pub async fn shutdown(&mut self) -> Result<(), GatewayError> {
        if self.state == SessionState::Closed {
            tracing::debug!("Gateway session already closed");
            return Ok(());
        }

        self.state = SessionState::Closing;
        self.heartbeat.stop();
        let sent = self
            .transport
            .send_frame_within(&GatewayMessage::close(), CLOSE_TIMEOUT)
            .await;
        self.transport.close().await;
        self.state = SessionState::Closed;

        match sent {
            Ok(()) => {
                tracing::info!(
                    beats_sent = self.stats.beats_sent(),
                    last_sequence = ?self.last_sequence,
                    "Gateway session closed"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Close frame not delivered");
                Err(GatewayError::Write(e))
            }
        }
    }

    fn ensure_open(&self) -> Result<(), GatewayError> {
        if self.state.is_closed() {
            Err(GatewayError::AlreadyClosed)
        } else {
            Ok(())
        }
    }
}

impl<S> GatewaySession<S> {
    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The bot's own user, from READY
    #[must_use]
    pub fn self_user(&self) -> &UserPayload {
        &self.self_user
    }

    /// Interval announced by Hello
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        self.heartbeat_interval
    }

    /// Heartbeat counters
    #[must_use]
    pub fn heartbeat_stats(&self) -> &HeartbeatStats {
        &self.stats
    }

    /// Whether the heartbeat task is still beating
    #[must_use]
    pub fn is_heartbeat_running(&self) -> bool {
        self.heartbeat.is_running()
    }

    /// Sequence number of the last dispatch seen
    #[must_use]
    pub fn last_sequence(&self) -> Option<u64> {
        self.last_sequence
    }

    /// Session ID from READY
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Resume endpoint from READY
    #[must_use]
    pub fn resume_gateway_url(&self) -> Option<&str> {
        self.resume_gateway_url.as_deref()
    }
}

impl<S> std::fmt::Debug for GatewaySession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySession")
            .field("state", &self.state)
            .field("self_user", &self.self_user.id)
            .field("session_id", &self.session_id)
            .field("heartbeat_interval", &self.heartbeat_interval)
            .field("last_sequence", &self.last_sequence)
            .finish_non_exhaustive()
    }
}

async fn run_handshake<S>(
    transport: &mut Transport<S>,
    options: &SessionOptions,
) -> Result<Handshake, HandshakeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // AwaitingHello: the first frame must be op 10
    tracing::debug!(state = %SessionState::AwaitingHello, "Waiting for Hello");
    let hello = transport.receive_frame().await?;
    if hello.op != OpCode::Hello {
        return Err(HandshakeError::UnexpectedOpcode {
            expected: OpCode::Hello,
            actual: hello.op,
        });
    }

    let HelloPayload { heartbeat_interval } = hello
        .decode_data()
        .map_err(|e| HandshakeError::InvalidPayload(format!("Hello: {e}")))?;

    // Identifying
    tracing::debug!(
        state = %SessionState::Identifying,
        interval_ms = heartbeat_interval,
        "Hello received"
    );
    let identify =
        GatewayMessage::identify(&options.identify_payload()).map_err(TransportError::Encode)?;
    transport.send_frame(&identify).await?;

    // AwaitingReady: everything before READY is dropped
    tracing::debug!(
        state = %SessionState::AwaitingReady,
        intents = options.intents.bits(),
        "Identify sent"
    );

    let mut last_sequence = None;
    loop {
        let frame = transport.receive_frame().await?;
        if frame.s.is_some() {
            last_sequence = frame.s;
        }

        if frame.event_type() == Some(GatewayEventType::Ready.as_str()) {
            let ready: ReadyEvent = frame
                .decode_data()
                .map_err(|e| HandshakeError::InvalidPayload(format!("READY: {e}")))?;

            return Ok(Handshake {
                heartbeat_interval: Duration::from_millis(heartbeat_interval),
                ready,
                last_sequence,
            });
        }

        tracing::trace!(op = %frame.op, event_type = ?frame.t, "Discarding frame before READY");
    }
}
