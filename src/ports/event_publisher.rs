//! EventPublisher port - how command handlers announce domain mutations.
//!
//! Handlers publish envelopes without knowing who fans them out to
//! connected displays.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - Events published in one `publish_all` call reach each handler in order
/// - Delivery is at-least-once; there is no replay for late subscribers
///
/// # Example
///
/// ```ignore
/// let envelope = status_changed.to_envelope()?;
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish several events, in order.
    ///
    /// Used when one request mutates a linked flight pair.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_publisher_is_object_safe() {
        fn _accepts_dyn(_publisher: &dyn EventPublisher) {}
    }
}
