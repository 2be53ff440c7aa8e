//! Topic membership for connected clients.
//!
//! # Architecture
//!
//! ```text
//! Topic: airport:CDG   Topic: airport:ORY   Topic: global
//! ├── client-a         ├── client-c         ├── client-a
//! └── client-b         └── client-d         ├── client-c
//!                                           └── client-e
//! ```
//!
//! Each member is stored with the sender half of its outbound queue. A
//! broadcast pushes into every queue with `try_send` and never waits, so a
//! slow client cannot hold up the emitter; it only loses frames.

use std::collections::{HashMap, HashSet};

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::domain::realtime::{Topic, WireFrame};

/// Unique identifier for a connected client session.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Create a new random client ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default)]
struct Registry {
    /// topic → members and their outbound queues.
    rooms: HashMap<Topic, HashMap<ClientId, mpsc::Sender<WireFrame>>>,
    /// client → joined topics, for O(1) cleanup on disconnect.
    memberships: HashMap<ClientId, HashSet<Topic>>,
}

impl Registry {
    fn remove(&mut self, topic: &Topic, client_id: &ClientId) -> bool {
        let removed = match self.rooms.get_mut(topic) {
            Some(members) => members.remove(client_id).is_some(),
            None => false,
        };
        if self.rooms.get(topic).map_or(false, HashMap::is_empty) {
            self.rooms.remove(topic);
        }
        if let Some(topics) = self.memberships.get_mut(client_id) {
            topics.remove(topic);
            if topics.is_empty() {
                self.memberships.remove(client_id);
            }
        }
        removed
    }
}

/// Manages topic rooms.
///
/// Provides:
/// - Idempotent join/leave per (topic, client)
/// - Fire-and-forget broadcast to a topic
/// - Automatic cleanup of empty rooms
pub struct RoomManager {
    registry: RwLock<Registry>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
        }
    }

    /// Add a client to a topic.
    ///
    /// Returns `false` if the client was already a member.
    pub async fn join(
        &self,
        topic: &Topic,
        client_id: ClientId,
        sender: mpsc::Sender<WireFrame>,
    ) -> bool {
        let mut registry = self.registry.write().await;
        let members = registry.rooms.entry(topic.clone()).or_default();
        if members.contains_key(&client_id) {
            return false;
        }
        members.insert(client_id, sender);
        registry
            .memberships
            .entry(client_id)
            .or_default()
            .insert(topic.clone());
        true
    }

    /// Remove a client from a topic.
    ///
    /// Returns `false` if the client was not a member.
    pub async fn leave(&self, topic: &Topic, client_id: &ClientId) -> bool {
        self.registry.write().await.remove(topic, client_id)
    }

    /// Remove a client from every topic it joined.
    pub async fn leave_all(&self, client_id: &ClientId) -> Vec<Topic> {
        let mut registry = self.registry.write().await;
        let topics: Vec<Topic> = registry
            .memberships
            .get(client_id)
            .map(|t| t.iter().cloned().collect())
            .unwrap_or_default();
        for topic in &topics {
            registry.remove(topic, client_id);
        }
        topics
    }

    /// Push a frame to every member of a topic without waiting.
    ///
    /// Members whose queue is full miss the frame. Members whose queue is
    /// closed are dropped from the room. Returns the number of queues that
    /// accepted the frame.
    pub async fn broadcast(&self, topic: &Topic, frame: &WireFrame) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();
        {
            let registry = self.registry.read().await;
            let Some(members) = registry.rooms.get(topic) else {
                return 0;
            };
            for (client_id, sender) in members {
                match sender.try_send(frame.clone()) {
                    Ok(()) => delivered += 1,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::warn!(
                            client_id = %client_id,
                            topic = %topic,
                            event = %frame.event,
                            "Client queue full, dropping frame"
                        );
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => closed.push(*client_id),
                }
            }
        }

        if !closed.is_empty() {
            let mut registry = self.registry.write().await;
            for client_id in closed {
                registry.remove(topic, &client_id);
            }
        }
        delivered
    }

    /// Number of clients currently joined to a topic.
    pub async fn subscriber_count(&self, topic: &Topic) -> usize {
        self.registry
            .read()
            .await
            .rooms
            .get(topic)
            .map_or(0, HashMap::len)
    }

    /// Whether a client is joined to a topic.
    pub async fn is_member(&self, topic: &Topic, client_id: &ClientId) -> bool {
        self.registry
            .read()
            .await
            .rooms
            .get(topic)
            .map_or(false, |members| members.contains_key(client_id))
    }

    /// Topics with at least one member.
    pub async fn active_topics(&self) -> Vec<Topic> {
        self.registry.read().await.rooms.keys().cloned().collect()
    }

    /// Number of clients joined to at least one topic.
    pub async fn total_client_count(&self) -> usize {
        self.registry.read().await.memberships.len()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::AirportCode;
    use serde_json::json;

    fn cdg() -> Topic {
        Topic::airport(AirportCode::new("CDG").unwrap())
    }

    fn frame() -> WireFrame {
        WireFrame::new("flight:created", json!({"flightNumber": "AF1"}))
    }

    #[tokio::test]
    async fn join_is_idempotent() {
        let rooms = RoomManager::new();
        let (tx, _rx) = mpsc::channel(8);
        let client = ClientId::new();

        assert!(rooms.join(&cdg(), client, tx.clone()).await);
        assert!(!rooms.join(&cdg(), client, tx).await);
        assert_eq!(rooms.subscriber_count(&cdg()).await, 1);
    }

    #[tokio::test]
    async fn join_then_leave_restores_subscriber_set() {
        let rooms = RoomManager::new();
        let (tx_a, _rx_a) = mpsc::channel(8);
        let (tx_b, _rx_b) = mpsc::channel(8);
        let a = ClientId::new();
        let b = ClientId::new();
        rooms.join(&cdg(), a, tx_a).await;
        let before = rooms.subscriber_count(&cdg()).await;

        rooms.join(&cdg(), b, tx_b).await;
        rooms.leave(&cdg(), &b).await;

        assert_eq!(rooms.subscriber_count(&cdg()).await, before);
        assert!(rooms.is_member(&cdg(), &a).await);
        assert!(!rooms.is_member(&cdg(), &b).await);
    }

    #[tokio::test]
    async fn leaving_unjoined_topic_is_a_no_op() {
        let rooms = RoomManager::new();
        assert!(!rooms.leave(&Topic::Global, &ClientId::new()).await);
        assert!(rooms.active_topics().await.is_empty());
    }

    #[tokio::test]
    async fn empty_rooms_are_cleaned_up() {
        let rooms = RoomManager::new();
        let (tx, _rx) = mpsc::channel(8);
        let client = ClientId::new();
        rooms.join(&cdg(), client, tx.clone()).await;
        rooms.join(&Topic::Global, client, tx).await;

        let left = rooms.leave_all(&client).await;

        assert_eq!(left.len(), 2);
        assert!(rooms.active_topics().await.is_empty());
        assert_eq!(rooms.total_client_count().await, 0);
    }

    #[tokio::test]
    async fn broadcast_reaches_only_topic_members() {
        let rooms = RoomManager::new();
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        rooms.join(&cdg(), ClientId::new(), tx_a).await;
        rooms.join(&Topic::Global, ClientId::new(), tx_b).await;

        assert_eq!(rooms.broadcast(&cdg(), &frame()).await, 1);
        assert_eq!(rx_a.try_recv().unwrap().event, "flight:created");
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_queue_drops_frame_without_blocking() {
        let rooms = RoomManager::new();
        let (tx, mut rx) = mpsc::channel(1);
        rooms.join(&cdg(), ClientId::new(), tx).await;

        assert_eq!(rooms.broadcast(&cdg(), &frame()).await, 1);
        assert_eq!(rooms.broadcast(&cdg(), &frame()).await, 0);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_queues_are_pruned() {
        let rooms = RoomManager::new();
        let (tx, rx) = mpsc::channel(8);
        rooms.join(&cdg(), ClientId::new(), tx).await;
        drop(rx);

        assert_eq!(rooms.broadcast(&cdg(), &frame()).await, 0);
        assert_eq!(rooms.subscriber_count(&cdg()).await, 0);
    }
}
