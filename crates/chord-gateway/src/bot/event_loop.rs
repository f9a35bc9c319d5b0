//! Session receive loop

use super::PingBot;
use crate::events::GatewayEvent;
use crate::protocol::{GatewayMessage, OpCode};
use crate::rest::RestClient;
use crate::session::{GatewayError, GatewaySession};
use tokio::io::{AsyncRead, AsyncWrite};

/// Why the loop returned without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The gateway sent op 7
    ReconnectRequested,
    /// The gateway sent op 9
    SessionInvalidated { resumable: bool },
}

/// Read events until the gateway asks for a new session or the connection fails
///
/// Dispatches are decoded and handed to the bot; replies go out over REST. A payload that
/// fails to decode or a failed reply is logged and skipped.
pub async fn run_event_loop<S>(
    session: &mut GatewaySession<S>,
    bot: &PingBot,
    rest: &RestClient,
) -> Result<LoopExit, GatewayError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    loop {
        let message = session.receive_next().await?;

        match message.op {
            OpCode::Dispatch => {}
            OpCode::Heartbeat => {
                // The gateway wants a beat right now
                session.send(&GatewayMessage::heartbeat()).await?;
                continue;
            }
            OpCode::Reconnect => return Ok(LoopExit::ReconnectRequested),
            OpCode::InvalidSession => {
                return Ok(LoopExit::SessionInvalidated {
                    resumable: message.as_invalid_session().unwrap_or(false),
                });
            }
            _ => continue,
        }

        let event = match GatewayEvent::from_message(&message) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, sequence = ?message.s, "Skipping undecodable event");
                continue;
            }
        };

        if let GatewayEvent::MessageCreate(created) = &event {
            tracing::info!(
                author = %created.author.username,
                channel_id = %created.channel_id,
                content = %created.content,
                "Message received"
            );
        } else {
            tracing::trace!(event_type = event.event_type(), "Event received");
        }

        let Some(reply) = bot.handle(&event) else {
            continue;
        };

        if let Err(e) = rest.send_message(reply.channel_id, &reply.content).await {
            tracing::warn!(
                channel_id = %reply.channel_id,
                error = %e,
                "Failed to send reply"
            );
        }
    }
}
