//! Event distribution hub: domain events in, topic frames out.
//!
//! # Event Flow
//!
//! ```text
//! EventPublisher::publish(envelope)
//!          │
//!          ▼
//! ┌────────────────────┐
//! │ RealtimeHub        │  EventHandler for every EventKind
//! └────────────────────┘
//!          │ route(): one (topic, frame) per destination
//!          ▼
//! ┌────────────────────┐
//! │ RoomManager        │  try_send to each member, never waits
//! └────────────────────┘
//! ```
//!
//! Routing rules:
//!
//! | Family        | Airport topics                 | Global topic            |
//! |---------------|--------------------------------|-------------------------|
//! | flight        | origin and destination         | yes, `:global` name     |
//! | airport       | the airport itself             | yes, same name          |
//! | airline       | none                           | yes                     |
//! | advertisement | each scoped airport            | if unscoped, or was     |

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::domain::realtime::{EventFamily, EventKind, Topic, WireFrame};
use crate::ports::{EventHandler, EventSubscriber};

use super::rooms::RoomManager;

/// Fans domain events out to topic rooms.
pub struct RealtimeHub {
    rooms: Arc<RoomManager>,
}

impl RealtimeHub {
    pub fn new(rooms: Arc<RoomManager>) -> Self {
        Self { rooms }
    }

    /// Create as an Arc (for sharing with the event subscriber).
    pub fn new_shared(rooms: Arc<RoomManager>) -> Arc<Self> {
        Arc::new(Self::new(rooms))
    }

    /// Subscribe to every realtime event type.
    ///
    /// ```ignore
    /// let hub = RealtimeHub::new_shared(rooms);
    /// hub.register(event_bus.as_ref());
    /// ```
    pub fn register(self: &Arc<Self>, subscriber: &dyn EventSubscriber) {
        subscriber.subscribe_all(&EventKind::all_event_types(), self.clone());
    }

    pub fn rooms(&self) -> &Arc<RoomManager> {
        &self.rooms
    }

    /// Compute destinations for an event, in emission order.
    ///
    /// Returns an empty list for event types the hub doesn't relay.
    pub fn route(event: &EventEnvelope) -> Vec<(Topic, WireFrame)> {
        let Ok(kind) = EventKind::from_str(&event.event_type) else {
            return Vec::new();
        };

        let scoped = || WireFrame::new(kind.channel_name(), event.payload.clone());
        let airport_frames = event
            .airports
            .iter()
            .map(|code| (Topic::airport(code.clone()), scoped()));

        let mut destinations: Vec<(Topic, WireFrame)> = Vec::new();
        match kind.family() {
            EventFamily::Flight | EventFamily::Airport => {
                destinations.extend(airport_frames);
                destinations.push((
                    Topic::Global,
                    WireFrame::new(kind.global_channel_name(), event.payload.clone()),
                ));
            }
            EventFamily::Airline => destinations.push((Topic::Global, scoped())),
            EventFamily::Advertisement => {
                destinations.extend(airport_frames);
                if event.airports.is_empty() || was_shown_everywhere(event) {
                    destinations.push((Topic::Global, scoped()));
                }
            }
        }
        dedup_topics(destinations)
    }

    /// Route and broadcast one event. Returns the number of frames queued.
    pub async fn fan_out(&self, event: &EventEnvelope) -> usize {
        let destinations = Self::route(event);
        if destinations.is_empty() {
            tracing::debug!(event_type = %event.event_type, "No realtime route for event");
            return 0;
        }

        let mut delivered = 0;
        for (topic, frame) in &destinations {
            let count = self.rooms.broadcast(topic, frame).await;
            tracing::debug!(
                topic = %topic,
                event = %frame.event,
                delivered = count,
                "Fanned out event"
            );
            delivered += count;
        }
        delivered
    }
}

/// An update narrowing an ad that every airport was playing.
fn was_shown_everywhere(event: &EventEnvelope) -> bool {
    event
        .payload
        .get("previousShowOnAllAirports")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

fn dedup_topics(destinations: Vec<(Topic, WireFrame)>) -> Vec<(Topic, WireFrame)> {
    let mut seen = Vec::with_capacity(destinations.len());
    destinations
        .into_iter()
        .filter(|(topic, _)| {
            if seen.contains(topic) {
                false
            } else {
                seen.push(topic.clone());
                true
            }
        })
        .collect()
}

#[async_trait]
impl EventHandler for RealtimeHub {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.fan_out(&event).await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RealtimeHub"
    }
}
