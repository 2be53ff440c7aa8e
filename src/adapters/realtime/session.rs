//! Server side of one client connection, independent of the transport.
//!
//! A transport (websocket, in-process channel) owns the I/O loop and feeds
//! every inbound frame to [`ClientSession::handle`]. Outbound frames,
//! including room broadcasts, go through the session's queue.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::{mpsc, watch};

use crate::domain::foundation::{AirportCode, Timestamp};
use crate::domain::realtime::{control, Topic, WireFrame};

use super::rooms::{ClientId, RoomManager};

/// A control message understood by the hub.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlRequest {
    Join(Topic),
    Leave(Topic),
    Ping(Value),
}

impl ControlRequest {
    /// Interpret an inbound frame.
    ///
    /// `Ok(None)` means the frame is not a control message.
    pub fn parse(frame: &WireFrame) -> Result<Option<Self>, String> {
        let request = match frame.event.as_str() {
            control::JOIN_AIRPORT => ControlRequest::Join(airport_topic(&frame.data)?),
            control::LEAVE_AIRPORT => ControlRequest::Leave(airport_topic(&frame.data)?),
            control::JOIN_GLOBAL => ControlRequest::Join(Topic::Global),
            control::LEAVE_GLOBAL => ControlRequest::Leave(Topic::Global),
            control::PING => ControlRequest::Ping(frame.data.clone()),
            _ => return Ok(None),
        };
        Ok(Some(request))
    }
}

fn airport_topic(data: &Value) -> Result<Topic, String> {
    let raw = match data {
        Value::String(code) => code.as_str(),
        Value::Object(map) => map
            .get("airport")
            .or_else(|| map.get("code"))
            .and_then(Value::as_str)
            .ok_or_else(|| "missing airport code".to_string())?,
        _ => return Err("missing airport code".to_string()),
    };
    AirportCode::new(raw)
        .map(Topic::airport)
        .map_err(|e| e.to_string())
}

/// Hub-side state of one connected client.
pub struct ClientSession {
    id: ClientId,
    rooms: Arc<RoomManager>,
    outbound: mpsc::Sender<WireFrame>,
}

impl ClientSession {
    /// Register a new client and greet it with its session id.
    pub async fn open(rooms: Arc<RoomManager>, outbound: mpsc::Sender<WireFrame>) -> Self {
        let session = Self {
            id: ClientId::new(),
            rooms,
            outbound,
        };
        session
            .reply(WireFrame::new(
                control::CONNECTED,
                json!({
                    "sessionId": session.id.to_string(),
                    "timestamp": Timestamp::now().to_rfc3339(),
                }),
            ))
            .await;
        tracing::info!(client_id = %session.id, "Client connected");
        session
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Act on one inbound frame.
    pub async fn handle(&self, frame: WireFrame) {
        match ControlRequest::parse(&frame) {
            Ok(Some(ControlRequest::Join(topic))) => {
                let added = self
                    .rooms
                    .join(&topic, self.id, self.outbound.clone())
                    .await;
                tracing::debug!(client_id = %self.id, topic = %topic, added, "Join");
                self.reply(topic.joined_frame()).await;
            }
            Ok(Some(ControlRequest::Leave(topic))) => {
                let removed = self.rooms.leave(&topic, &self.id).await;
                tracing::debug!(client_id = %self.id, topic = %topic, removed, "Leave");
            }
            Ok(Some(ControlRequest::Ping(data))) => {
                self.reply(WireFrame::new(control::PONG, data)).await;
            }
            Ok(None) => {
                tracing::debug!(
                    client_id = %self.id,
                    event = %frame.event,
                    "Ignoring client event"
                );
            }
            Err(reason) => {
                tracing::warn!(
                    client_id = %self.id,
                    event = %frame.event,
                    reason = %reason,
                    "Rejected control message"
                );
                self.reply(WireFrame::new(
                    control::ERROR,
                    json!({ "event": frame.event, "message": reason }),
                ))
                .await;
            }
        }
    }

    /// Drop every membership; the client receives nothing more.
    pub async fn close(self) {
        let topics = self.rooms.leave_all(&self.id).await;
        tracing::info!(client_id = %self.id, topics = topics.len(), "Client disconnected");
    }

    async fn reply(&self, frame: WireFrame) {
        if self.outbound.send(frame).await.is_err() {
            tracing::debug!(client_id = %self.id, "Outbound queue closed");
        }
    }
}

/// Serve a session over a pair of frame channels until the client hangs up
/// or `shutdown` flips to `true`.
pub async fn serve_channel(
    rooms: Arc<RoomManager>,
    mut inbound: mpsc::Receiver<WireFrame>,
    outbound: mpsc::Sender<WireFrame>,
    mut shutdown: watch::Receiver<bool>,
) {
    let session = ClientSession::open(rooms, outbound).await;
    loop {
        tokio::select! {
            frame = inbound.recv() => match frame {
                Some(frame) => session.handle(frame).await,
                None => break,
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    session.close().await;
}
