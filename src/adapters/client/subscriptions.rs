//! Per-consumer subscription handle.
//!
//! Each consumer (display screen, dashboard panel) owns one
//! [`Subscriptions`]. Disposing it removes exactly the listeners that
//! consumer registered and nothing else.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::domain::foundation::AirportCode;
use crate::domain::realtime::Topic;

use super::connection::{ConnectionManager, Listener, ListenerId};

/// Owned set of (event, listener) registrations on a shared connection.
pub struct Subscriptions {
    connection: Arc<ConnectionManager>,
    registered: Mutex<Vec<(String, ListenerId)>>,
}

impl Subscriptions {
    pub fn new(connection: Arc<ConnectionManager>) -> Self {
        Self {
            connection,
            registered: Mutex::new(Vec::new()),
        }
    }

    pub fn connection(&self) -> &Arc<ConnectionManager> {
        &self.connection
    }

    /// Register a listener owned by this consumer.
    pub fn on<F>(&self, event: &str, handler: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(handler);
        let id = self.connection.on(event, listener);
        self.registrations().push((event.to_string(), id));
        id
    }

    /// Remove this consumer's listeners for one event.
    pub fn off(&self, event: &str) -> usize {
        let mut registered = self.registrations();
        let mut removed = 0;
        registered.retain(|(name, id)| {
            if name == event {
                removed += self.connection.off(name, Some(*id));
                false
            } else {
                true
            }
        });
        removed
    }

    /// Number of live registrations held by this consumer.
    pub fn len(&self) -> usize {
        self.registrations().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move from one airport topic to another: leave first, then join.
    pub async fn switch_airport(&self, from: Option<&AirportCode>, to: &AirportCode) {
        if from == Some(to) {
            return;
        }
        if let Some(previous) = from {
            self.connection
                .leave(&Topic::airport(previous.clone()))
                .await;
        }
        self.connection.join(&Topic::airport(to.clone())).await;
    }

    /// Remove every registration this consumer made.
    pub fn dispose(&self) -> usize {
        let drained: Vec<_> = self.registrations().drain(..).collect();
        let removed = drained
            .iter()
            .map(|(event, id)| self.connection.off(event, Some(*id)))
            .sum();
        if removed > 0 {
            tracing::debug!(removed, "Disposed subscriptions");
        }
        removed
    }

    fn registrations(&self) -> MutexGuard<'_, Vec<(String, ListenerId)>> {
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::client::connection::ConnectionSettings;
    use crate::ports::{ChannelConnector, ChannelLink, TransportError};
    use async_trait::async_trait;

    struct NoHub;

    #[async_trait]
    impl ChannelConnector for NoHub {
        async fn open(&self) -> Result<ChannelLink, TransportError> {
            Err(TransportError::Refused("offline".to_string()))
        }
    }

    fn manager() -> Arc<ConnectionManager> {
        ConnectionManager::new(Arc::new(NoHub), ConnectionSettings::default())
    }

    #[test]
    fn dispose_removes_only_own_listeners() {
        let connection = manager();
        let screen = Subscriptions::new(connection.clone());
        let dashboard = Subscriptions::new(connection.clone());

        screen.on("flight:created", |_| {});
        screen.on("flight:deleted", |_| {});
        dashboard.on("flight:created", |_| {});

        assert_eq!(screen.dispose(), 2);
        assert_eq!(connection.listener_count("flight:created"), 1);
        assert_eq!(connection.listener_count("flight:deleted"), 0);
        assert!(screen.is_empty());
        assert_eq!(dashboard.len(), 1);
    }

    #[test]
    fn drop_disposes() {
        let connection = manager();
        {
            let screen = Subscriptions::new(connection.clone());
            screen.on("advertisement:updated", |_| {});
            assert_eq!(connection.listener_count("advertisement:updated"), 1);
        }
        assert_eq!(connection.listener_count("advertisement:updated"), 0);
    }

    #[test]
    fn off_targets_one_event() {
        let connection = manager();
        let screen = Subscriptions::new(connection.clone());
        screen.on("flight:created", |_| {});
        screen.on("flight:created", |_| {});
        screen.on("flight:updated", |_| {});

        assert_eq!(screen.off("flight:created"), 2);
        assert_eq!(screen.len(), 1);
        assert_eq!(connection.listener_count("flight:updated"), 1);
    }

    #[test]
    fn second_dispose_is_a_no_op() {
        let screen = Subscriptions::new(manager());
        screen.on("connect", |_| {});
        assert_eq!(screen.dispose(), 1);
        assert_eq!(screen.dispose(), 0);
    }
}
