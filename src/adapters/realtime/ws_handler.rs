//! WebSocket upgrade handler for display and dashboard connections.
//!
//! Handles the HTTP → WebSocket upgrade and runs the connection:
//! 1. Upgrade to WebSocket
//! 2. Open a [`ClientSession`] (greets the client with `connected`)
//! 3. Forward queued frames to the socket, feed socket frames to the session
//! 4. Leave every topic on disconnect

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::realtime::WireFrame;

use super::rooms::RoomManager;
use super::session::ClientSession;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct RealtimeState {
    pub rooms: Arc<RoomManager>,
    /// Outbound frames queued per client before broadcasts start dropping.
    pub client_buffer: usize,
}

impl RealtimeState {
    pub fn new(rooms: Arc<RoomManager>, client_buffer: usize) -> Self {
        Self {
            rooms,
            client_buffer,
        }
    }
}

/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<RealtimeState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: RealtimeState) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound, mut queue) = mpsc::channel::<WireFrame>(state.client_buffer.max(1));

    let session = ClientSession::open(state.rooms.clone(), outbound).await;
    let client_id = session.id();

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = queue.recv().await {
            let text = match frame.to_json() {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(client_id = %client_id, error = %e, "Unserializable frame");
                    continue;
                }
            };
            if let Err(e) = sender.send(Message::Text(text)).await {
                tracing::debug!(client_id = %client_id, "Send error, closing connection: {}", e);
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => match WireFrame::from_json(&text) {
                    Ok(frame) => session.handle(frame).await,
                    Err(e) => {
                        tracing::warn!(client_id = %client_id, error = %e, "Malformed frame");
                    }
                },
                Ok(Message::Binary(_)) => {
                    tracing::warn!(client_id = %client_id, "Received unsupported binary message");
                }
                // Protocol-level ping/pong is answered by axum.
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::debug!(client_id = %client_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(client_id = %client_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.rooms.leave_all(&client_id).await;
    tracing::info!(client_id = %client_id, "Client disconnected");
}

/// Create axum router for the realtime endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(realtime_router(RealtimeState::new(rooms, 256)))
///     .merge(api_router(api_state));
/// ```
pub fn realtime_router(state: RealtimeState) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(state)
}
