//! Test helpers for integration tests
//!
//! `MockGateway` plays the server side of the gateway handshake over a real WebSocket and
//! records every frame the client sends. `MockRestServer` stands in for the REST API and
//! records every posted message.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chord_gateway::{GatewayMessage, OpCode};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

use crate::fixtures::ready_frame;

/// Default wait used by the `wait_for_*` helpers
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

enum GatewayCommand {
    Send(GatewayMessage),
    Close(u16, String),
}

/// Scripted single-connection gateway server
pub struct MockGateway {
    addr: SocketAddr,
    frames: Arc<Mutex<Vec<GatewayMessage>>>,
    commands: mpsc::UnboundedSender<GatewayCommand>,
    _handle: JoinHandle<()>,
}

impl MockGateway {
    /// Gateway that sends Hello, waits for Identify and answers with READY
    pub async fn start(heartbeat_interval_ms: u64) -> Result<Self> {
        Self::start_with(
            vec![GatewayMessage::hello(heartbeat_interval_ms)],
            vec![ready_frame(1)],
        )
        .await
    }

    /// Gateway that sends `opening` on connect and `after_identify` once Identify arrives
    pub async fn start_with(
        opening: Vec<GatewayMessage>,
        after_identify: Vec<GatewayMessage>,
    ) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let frames = Arc::new(Mutex::new(Vec::new()));
        let (commands, command_rx) = mpsc::unbounded_channel();

        let recorded = Arc::clone(&frames);
        let handle = tokio::spawn(async move {
            if let Err(e) = serve(listener, opening, after_identify, recorded, command_rx).await {
                eprintln!("mock gateway stopped: {e}");
            }
        });

        Ok(Self {
            addr,
            frames,
            commands,
            _handle: handle,
        })
    }

    /// WebSocket URL to connect to
    pub fn url(&self) -> String {
        format!("ws://{}/?v=10&encoding=json", self.addr)
    }

    /// Push a frame to the connected client
    pub fn send(&self, message: GatewayMessage) {
        let _ = self.commands.send(GatewayCommand::Send(message));
    }

    /// Close the connection with a gateway close code
    pub fn close_with(&self, code: u16, reason: &str) {
        let _ = self.commands.send(GatewayCommand::Close(code, reason.to_string()));
    }

    /// Every frame received from the client so far
    pub fn frames(&self) -> Vec<GatewayMessage> {
        self.frames.lock().unwrap().clone()
    }

    /// Number of received frames with the given op
    pub fn count(&self, op: OpCode) -> usize {
        self.frames.lock().unwrap().iter().filter(|f| f.op == op).count()
    }

    /// Wait until at least `n` frames with `op` arrived
    pub async fn wait_for(&self, op: OpCode, n: usize) -> Result<()> {
        let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
        while self.count(op) < n {
            if tokio::time::Instant::now() > deadline {
                anyhow::bail!("Expected {} {} frames, got {}", n, op, self.count(op));
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        Ok(())
    }
}

async fn send_frame<S>(ws: &mut WebSocketStream<S>, message: &GatewayMessage) -> Result<()>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    ws.send(Message::Text(message.to_json()?.into())).await?;
    Ok(())
}

async fn serve(
    listener: TcpListener,
    opening: Vec<GatewayMessage>,
    mut after_identify: Vec<GatewayMessage>,
    frames: Arc<Mutex<Vec<GatewayMessage>>>,
    mut commands: mpsc::UnboundedReceiver<GatewayCommand>,
) -> Result<()> {
    let (stream, _) = listener.accept().await?;
    let mut ws = accept_async(stream).await?;

    for message in &opening {
        send_frame(&mut ws, message).await?;
    }

    loop {
        tokio::select! {
            incoming = ws.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let message = GatewayMessage::from_json(&text)?;
                    let identified = message.op == OpCode::Identify;
                    frames.lock().unwrap().push(message);

                    if identified {
                        for reply in after_identify.drain(..) {
                            send_frame(&mut ws, &reply).await?;
                        }
                    }
                }
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            command = commands.recv() => match command {
                Some(GatewayCommand::Send(message)) => send_frame(&mut ws, &message).await?,
                Some(GatewayCommand::Close(code, reason)) => {
                    ws.close(Some(CloseFrame {
                        code: CloseCode::from(code),
                        reason: reason.into(),
                    }))
                    .await?;
                }
                None => break,
            },
        }
    }

    Ok(())
}

/// A message posted to the mock REST API
#[derive(Debug, Clone)]
pub struct PostedMessage {
    pub channel_id: String,
    pub authorization: Option<String>,
    pub content: String,
}

#[derive(Clone)]
struct RestState {
    posted: Arc<Mutex<Vec<PostedMessage>>>,
    status: StatusCode,
}

/// Mock of `POST /channels/{id}/messages`
pub struct MockRestServer {
    addr: SocketAddr,
    posted: Arc<Mutex<Vec<PostedMessage>>>,
    _handle: JoinHandle<()>,
}

impl MockRestServer {
    /// Server accepting every message
    pub async fn start() -> Result<Self> {
        Self::start_with_status(StatusCode::OK).await
    }

    /// Server answering every post with `status`
    pub async fn start_with_status(status: StatusCode) -> Result<Self> {
        let posted = Arc::new(Mutex::new(Vec::new()));
        let state = RestState {
            posted: Arc::clone(&posted),
            status,
        };

        let app = Router::new()
            .route("/api/v10/channels/:channel_id/messages", post(create_message))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            posted,
            _handle: handle,
        })
    }

    /// Base URL to configure the client with
    pub fn api_base(&self) -> String {
        format!("http://{}/api/v10", self.addr)
    }

    /// Every message posted so far
    pub fn posted(&self) -> Vec<PostedMessage> {
        self.posted.lock().unwrap().clone()
    }
}

async fn create_message(
    State(state): State<RestState>,
    Path(channel_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let content = body["content"].as_str().unwrap_or_default().to_string();
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.posted.lock().unwrap().push(PostedMessage {
        channel_id: channel_id.clone(),
        authorization,
        content: content.clone(),
    });

    if state.status.is_success() {
        (
            state.status,
            Json(json!({"id": "999", "channel_id": channel_id, "content": content})),
        )
    } else {
        (
            state.status,
            Json(json!({"message": "Missing Permissions", "code": 50013})),
        )
    }
}
