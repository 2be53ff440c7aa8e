//! In-process event bus.
//!
//! Delivers each published envelope to every handler subscribed to its type,
//! in subscription order, before `publish` returns. One hub process needs
//! nothing more: there is no cross-process fanout and no replay.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

/// In-process event bus.
///
/// Optionally records every published envelope, which tests use for
/// assertions.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::recording());
/// handler.handle(cmd).await?;
/// assert!(bus.has_event("flight.status_changed"));
/// ```
pub struct InMemoryEventBus {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    published: Option<RwLock<Vec<EventEnvelope>>>,
}

impl InMemoryEventBus {
    /// Creates a bus that keeps no history.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            published: None,
        }
    }

    /// Creates a bus that records every published envelope.
    pub fn recording() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            published: Some(RwLock::new(Vec::new())),
        }
    }

    // === Inspection ===

    /// Returns all recorded events; empty unless built with `recording()`.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        match &self.published {
            Some(log) => read(log).clone(),
            None => Vec::new(),
        }
    }

    /// Returns recorded events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Returns recorded events for a specific aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .collect()
    }

    /// Returns count of recorded events.
    pub fn event_count(&self) -> usize {
        self.published.as_ref().map_or(0, |log| read(log).len())
    }

    /// Checks if a specific event type was recorded.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published
            .as_ref()
            .map_or(false, |log| read(log).iter().any(|e| e.event_type == event_type))
    }

    /// Number of handlers subscribed to an event type.
    pub fn handler_count(&self, event_type: &str) -> usize {
        read(&self.handlers).get(event_type).map_or(0, Vec::len)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

// A handler that panicked mid-publish must not wedge the bus.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if let Some(log) = &self.published {
            write(log).push(event.clone());
        }

        // Clone handlers to release lock before await points
        let type_handlers: Vec<Arc<dyn EventHandler>> = read(&self.handlers)
            .get(&event.event_type)
            .cloned()
            .unwrap_or_default();

        tracing::debug!(
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            handlers = type_handlers.len(),
            "Publishing event"
        );

        let mut errors = Vec::new();
        for handler in type_handlers {
            if let Err(e) = handler.handle(event.clone()).await {
                tracing::warn!(handler = handler.name(), error = %e, "Event handler failed");
                errors.push(format!("{}: {}", handler.name(), e));
            }
        }

        if !errors.is_empty() {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Handler errors: {}", errors.join(", ")),
            ));
        }

        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        write(&self.handlers)
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }

    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>) {
        let mut handlers = write(&self.handlers);
        for event_type in event_types {
            handlers
                .entry(event_type.to_string())
                .or_default()
                .push(Arc::clone(&handler));
        }
    }
}
