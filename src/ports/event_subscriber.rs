//! EventSubscriber port - how the realtime hub registers for domain events.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Implementations should be:
/// - **Quick** - the publisher awaits every handler in turn
/// - **Isolated** - a failing handler does not stop the others
///
/// # Example
///
/// ```ignore
/// #[async_trait]
/// impl EventHandler for RealtimeHub {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         self.fan_out(&event).await
///     }
///
///     fn name(&self) -> &'static str {
///         "RealtimeHub"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events by type.
///
/// # Example
///
/// ```ignore
/// subscriber.subscribe_all(&EventKind::all_event_types(), hub);
/// ```
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event type.
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe handler to several event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

/// Combined trait for event bus implementations.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}
