//! Client-side connection manager.
//!
//! One manager per process owns the only link to the hub. It is built once
//! at the composition root and shared by `Arc` with every consumer.
//!
//! # Lifecycle
//!
//! ```text
//!  connect() ──► driver task ──► open link ──► `connected` frame ──► Connected
//!                    ▲                                                   │
//!                    │ fixed delay                               link closed
//!                    └──────────── retry (bounded) ◄─────────────────────┘
//! ```
//!
//! Topic membership does not survive a lost link: after every `connect`
//! event, consumers join their topics again.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::domain::realtime::{control, Topic, WireFrame};
use crate::ports::{ChannelConnector, ChannelLink};

/// Callback invoked with an event's payload.
///
/// Runs on the connection's driver task; long work should be spawned.
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Opaque handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Connection failures reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("Not connected to the realtime hub")]
    NotConnected,

    #[error("No pong within {0:?}")]
    PingTimeout(Duration),

    #[error("Connection closed while waiting")]
    Closed,
}

/// Reconnection and liveness tuning.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Pause between two connection attempts.
    pub reconnect_delay: Duration,
    /// Consecutive failed attempts tolerated after the first one.
    pub max_reconnect_attempts: u32,
    /// How long `ping` waits for the matching `pong`.
    pub ping_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_millis(2000),
            max_reconnect_attempts: 5,
            ping_timeout: Duration::from_millis(5000),
        }
    }
}

/// Point-in-time view of the connection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionState {
    pub connected: bool,
    pub session_id: Option<String>,
    pub joined: HashSet<Topic>,
}

#[derive(Default)]
struct LinkState {
    connected: bool,
    session_id: Option<String>,
    joined: HashSet<Topic>,
    outgoing: Option<mpsc::Sender<WireFrame>>,
}

/// Shared, reconnecting link to the realtime hub.
pub struct ConnectionManager {
    connector: Arc<dyn ChannelConnector>,
    settings: ConnectionSettings,
    state: Mutex<LinkState>,
    listeners: RwLock<HashMap<String, Vec<(ListenerId, Listener)>>>,
    pending_pings: Mutex<HashMap<u64, oneshot::Sender<()>>>,
    next_listener: AtomicU64,
    next_ping: AtomicU64,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn ChannelConnector>, settings: ConnectionSettings) -> Arc<Self> {
        Arc::new(Self {
            connector,
            settings,
            state: Mutex::new(LinkState::default()),
            listeners: RwLock::new(HashMap::new()),
            pending_pings: Mutex::new(HashMap::new()),
            next_listener: AtomicU64::new(1),
            next_ping: AtomicU64::new(1),
            driver: Mutex::new(None),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Start the connection driver unless it is already running.
    ///
    /// Returns the shared handle. After the driver gave up, calling this
    /// again starts a fresh round of attempts.
    pub fn connect(self: &Arc<Self>) -> Arc<Self> {
        self.start_driver();
        Arc::clone(self)
    }

    /// Start a fresh round of attempts if the link is down and the driver
    /// has given up. Returns `true` when a new round was started.
    pub fn ensure_connected(self: &Arc<Self>) -> bool {
        if self.is_connected() {
            return false;
        }
        self.start_driver()
    }

    fn start_driver(self: &Arc<Self>) -> bool {
        let mut driver = lock(&self.driver);
        let running = driver.as_ref().map_or(false, |handle| !handle.is_finished());
        if !running {
            tracing::info!("Starting realtime connection");
            *driver = Some(tokio::spawn(Arc::clone(self).drive()));
        }
        !running
    }

    /// Tear the link down and stop reconnecting.
    pub fn disconnect(&self) {
        if let Some(handle) = lock(&self.driver).take() {
            handle.abort();
        }
        self.link_closed();
    }

    async fn drive(self: Arc<Self>) {
        let mut failures: u32 = 0;
        loop {
            match self.connector.open().await {
                Ok(link) => {
                    failures = 0;
                    self.run_link(link).await;
                    tracing::warn!("Realtime link lost, reconnecting");
                }
                Err(e) => {
                    failures += 1;
                    if failures > self.settings.max_reconnect_attempts {
                        tracing::error!(
                            attempts = failures,
                            error = %e,
                            "Giving up on realtime connection"
                        );
                        return;
                    }
                    tracing::warn!(attempt = failures, error = %e, "Connection attempt failed");
                }
            }
            tokio::time::sleep(self.settings.reconnect_delay).await;
        }
    }

    async fn run_link(&self, link: ChannelLink) {
        let ChannelLink {
            outgoing,
            mut incoming,
        } = link;
        lock(&self.state).outgoing = Some(outgoing);

        while let Some(frame) = incoming.recv().await {
            self.on_frame(frame);
        }
        self.link_closed();
    }

    fn on_frame(&self, frame: WireFrame) {
        match frame.event.as_str() {
            control::CONNECTED => {
                let session_id = frame
                    .data
                    .get("sessionId")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                {
                    let mut state = lock(&self.state);
                    state.connected = true;
                    state.session_id = session_id.clone();
                }
                tracing::info!(session_id = ?session_id, "Connected to realtime hub");
                self.dispatch(control::CONNECT, &frame.data);
            }
            control::PONG => {
                if let Some(id) = frame.data.get("id").and_then(Value::as_u64) {
                    if let Some(waiter) = lock(&self.pending_pings).remove(&id) {
                        let _ = waiter.send(());
                    }
                }
                self.dispatch(control::PONG, &frame.data);
            }
            _ => self.dispatch(&frame.event, &frame.data),
        }
    }

    fn link_closed(&self) {
        let was_connected = {
            let mut state = lock(&self.state);
            let was = state.connected;
            *state = LinkState::default();
            was
        };
        // Dropping the senders wakes pending pings with `Closed`.
        lock(&self.pending_pings).clear();

        if was_connected {
            tracing::info!("Disconnected from realtime hub");
            self.dispatch(control::DISCONNECT, &Value::Null);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_connected(&self) -> bool {
        lock(&self.state).connected
    }

    pub fn session_id(&self) -> Option<String> {
        lock(&self.state).session_id.clone()
    }

    pub fn joined_topics(&self) -> HashSet<Topic> {
        lock(&self.state).joined.clone()
    }

    pub fn state(&self) -> ConnectionState {
        let state = lock(&self.state);
        ConnectionState {
            connected: state.connected,
            session_id: state.session_id.clone(),
            joined: state.joined.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Membership and emission
    // ─────────────────────────────────────────────────────────────────────────

    /// Join a topic. A no-op when already joined or not connected.
    ///
    /// Returns `true` if a join request was sent.
    pub async fn join(&self, topic: &Topic) -> bool {
        let outgoing = {
            let mut state = lock(&self.state);
            if !state.connected {
                tracing::debug!(topic = %topic, "Not connected, join skipped");
                return false;
            }
            if !state.joined.insert(topic.clone()) {
                return false;
            }
            state.outgoing.clone()
        };
        tracing::debug!(topic = %topic, "Joining topic");
        send(outgoing, topic.join_frame()).await
    }

    /// Leave a topic. A no-op when not joined or not connected.
    pub async fn leave(&self, topic: &Topic) -> bool {
        let outgoing = {
            let mut state = lock(&self.state);
            if !state.connected || !state.joined.remove(topic) {
                return false;
            }
            state.outgoing.clone()
        };
        tracing::debug!(topic = %topic, "Leaving topic");
        send(outgoing, topic.leave_frame()).await
    }

    /// Send an event to the hub. Refused with a warning when disconnected.
    pub async fn emit(&self, event: &str, data: Value) -> bool {
        let outgoing = {
            let state = lock(&self.state);
            if !state.connected {
                tracing::warn!(event = %event, "Not connected, refusing to emit");
                return false;
            }
            state.outgoing.clone()
        };
        send(outgoing, WireFrame::new(event, data)).await
    }

    /// Round-trip liveness check.
    pub async fn ping(&self) -> Result<Duration, ConnectionError> {
        if !self.is_connected() {
            return Err(ConnectionError::NotConnected);
        }
        let id = self.next_ping.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        lock(&self.pending_pings).insert(id, tx);

        let started = Instant::now();
        if !self.emit(control::PING, json!({ "id": id })).await {
            lock(&self.pending_pings).remove(&id);
            return Err(ConnectionError::NotConnected);
        }

        match tokio::time::timeout(self.settings.ping_timeout, rx).await {
            Ok(Ok(())) => Ok(started.elapsed()),
            Ok(Err(_)) => Err(ConnectionError::Closed),
            Err(_) => {
                lock(&self.pending_pings).remove(&id);
                Err(ConnectionError::PingTimeout(self.settings.ping_timeout))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listeners
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a listener for an event name (`flight:created`, `connect`, ...).
    pub fn on(&self, event: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        write(&self.listeners)
            .entry(event.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    /// Remove one listener, or every listener of `event` when `id` is `None`.
    ///
    /// Returns the number of listeners removed.
    pub fn off(&self, event: &str, id: Option<ListenerId>) -> usize {
        let mut listeners = write(&self.listeners);
        let removed = match (listeners.get_mut(event), id) {
            (None, _) => 0,
            (Some(registered), None) => {
                let count = registered.len();
                registered.clear();
                count
            }
            (Some(registered), Some(id)) => {
                let before = registered.len();
                registered.retain(|(lid, _)| *lid != id);
                before - registered.len()
            }
        };
        if listeners.get(event).map_or(false, Vec::is_empty) {
            listeners.remove(event);
        }
        removed
    }

    /// Number of listeners registered for an event.
    pub fn listener_count(&self, event: &str) -> usize {
        read(&self.listeners).get(event).map_or(0, Vec::len)
    }

    fn dispatch(&self, event: &str, data: &Value) {
        // Clone out so listeners may register or remove listeners.
        let targets: Vec<Listener> = read(&self.listeners)
            .get(event)
            .map(|registered| registered.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();
        for listener in targets {
            listener(data);
        }
    }
}

async fn send(outgoing: Option<mpsc::Sender<WireFrame>>, frame: WireFrame) -> bool {
    match outgoing {
        Some(tx) => tx.send(frame).await.is_ok(),
        None => false,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TransportError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Connector whose hub side is driven by the test.
    struct ScriptedConnector {
        links: tokio::sync::Mutex<Vec<ChannelLink>>,
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl ChannelConnector for ScriptedConnector {
        async fn open(&self) -> Result<ChannelLink, TransportError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            self.links
                .lock()
                .await
                .pop()
                .ok_or_else(|| TransportError::Refused("no link".to_string()))
        }
    }

    struct HubEnd {
        to_client: mpsc::Sender<WireFrame>,
        from_client: mpsc::Receiver<WireFrame>,
    }

    fn scripted(count: usize) -> (Arc<ScriptedConnector>, Vec<HubEnd>) {
        let mut links = Vec::new();
        let mut hubs = Vec::new();
        for _ in 0..count {
            let (client_tx, hub_rx) = mpsc::channel(16);
            let (hub_tx, client_rx) = mpsc::channel(16);
            links.push(ChannelLink {
                outgoing: client_tx,
                incoming: client_rx,
            });
            hubs.push(HubEnd {
                to_client: hub_tx,
                from_client: hub_rx,
            });
        }
        // `open` pops from the back.
        links.reverse();
        let connector = Arc::new(ScriptedConnector {
            links: tokio::sync::Mutex::new(links),
            attempts: AtomicUsize::new(0),
        });
        (connector, hubs)
    }

    fn settings() -> ConnectionSettings {
        ConnectionSettings {
            reconnect_delay: Duration::from_millis(100),
            max_reconnect_attempts: 2,
            ping_timeout: Duration::from_millis(500),
        }
    }

    fn cdg() -> Topic {
        Topic::airport(crate::domain::foundation::AirportCode::new("CDG").unwrap())
    }

    async fn greet(hub: &HubEnd) {
        hub.to_client
            .send(WireFrame::new(control::CONNECTED, json!({"sessionId": "s-1"})))
            .await
            .unwrap();
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn emits_are_refused_while_disconnected() {
        let (connector, _hubs) = scripted(0);
        let manager = ConnectionManager::new(connector, settings());

        assert!(!manager.emit("display:hello", Value::Null).await);
        assert!(!manager.join(&cdg()).await);
        assert_eq!(manager.ping().await, Err(ConnectionError::NotConnected));
    }

    #[tokio::test]
    async fn connected_frame_sets_state_and_fires_connect() {
        let (connector, hubs) = scripted(1);
        let manager = ConnectionManager::new(connector, settings());
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        manager.on(
            control::CONNECT,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        manager.connect();
        greet(&hubs[0]).await;
        settle().await;

        assert!(manager.is_connected());
        assert_eq!(manager.session_id().as_deref(), Some("s-1"));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        manager.disconnect();
    }

    #[tokio::test]
    async fn connect_is_idempotent() {
        let (connector, hubs) = scripted(1);
        let manager = ConnectionManager::new(connector.clone(), settings());

        let first = manager.connect();
        let second = manager.connect();
        greet(&hubs[0]).await;
        settle().await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
        manager.disconnect();
    }

    #[tokio::test]
    async fn join_and_leave_are_idempotent() {
        let (connector, mut hubs) = scripted(1);
        let manager = ConnectionManager::new(connector, settings());
        manager.connect();
        greet(&hubs[0]).await;
        settle().await;

        assert!(manager.join(&cdg()).await);
        assert!(!manager.join(&cdg()).await);
        assert!(manager.leave(&cdg()).await);
        assert!(!manager.leave(&cdg()).await);

        let hub = &mut hubs[0];
        assert_eq!(hub.from_client.recv().await.unwrap().event, control::JOIN_AIRPORT);
        assert_eq!(hub.from_client.recv().await.unwrap().event, control::LEAVE_AIRPORT);
        assert!(hub.from_client.try_recv().is_err());
        manager.disconnect();
    }

    #[tokio::test]
    async fn off_without_id_removes_all_listeners_for_event() {
        let (connector, _hubs) = scripted(0);
        let manager = ConnectionManager::new(connector, settings());
        let a = manager.on("flight:created", Arc::new(|_| {}));
        manager.on("flight:created", Arc::new(|_| {}));
        manager.on("flight:deleted", Arc::new(|_| {}));

        assert_eq!(manager.off("flight:created", Some(a)), 1);
        assert_eq!(manager.listener_count("flight:created"), 1);
        assert_eq!(manager.off("flight:created", None), 1);
        assert_eq!(manager.listener_count("flight:created"), 0);
        assert_eq!(manager.listener_count("flight:deleted"), 1);
    }

    #[tokio::test]
    async fn events_reach_listeners() {
        let (connector, hubs) = scripted(1);
        let manager = ConnectionManager::new(connector, settings());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        manager.on(
            "flight:statusChanged",
            Arc::new(move |data| sink.lock().unwrap().push(data.clone())),
        );

        manager.connect();
        greet(&hubs[0]).await;
        hubs[0]
            .to_client
            .send(WireFrame::new("flight:statusChanged", json!({"newStatus": "boarding"})))
            .await
            .unwrap();
        settle().await;

        assert_eq!(seen.lock().unwrap()[0]["newStatus"], "boarding");
        manager.disconnect();
    }

    #[tokio::test]
    async fn ping_resolves_on_matching_pong() {
        let (connector, mut hubs) = scripted(1);
        let manager = ConnectionManager::new(connector, settings());
        manager.connect();
        greet(&hubs[0]).await;
        settle().await;

        let mut hub = hubs.remove(0);
        let echo = tokio::spawn(async move {
            let ping = hub.from_client.recv().await.unwrap();
            assert_eq!(ping.event, control::PING);
            hub.to_client
                .send(WireFrame::new(control::PONG, ping.data))
                .await
                .unwrap();
            hub
        });

        assert!(manager.ping().await.is_ok());
        let _hub = echo.await.unwrap();
        manager.disconnect();
    }

    #[tokio::test(start_paused = true)]
    async fn ping_times_out_without_pong() {
        let (connector, hubs) = scripted(1);
        let manager = ConnectionManager::new(connector, settings());
        manager.connect();
        greet(&hubs[0]).await;
        settle().await;

        assert_eq!(
            manager.ping().await,
            Err(ConnectionError::PingTimeout(Duration::from_millis(500)))
        );
        drop(hubs);
        manager.disconnect();
    }

    #[tokio::test(start_paused = true)]
    async fn lost_link_clears_membership_and_fires_disconnect() {
        let (connector, mut hubs) = scripted(2);
        let manager = ConnectionManager::new(connector, settings());
        let disconnects = Arc::new(AtomicUsize::new(0));
        let counter = disconnects.clone();
        manager.on(
            control::DISCONNECT,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        manager.connect();
        greet(&hubs[0]).await;
        settle().await;
        manager.join(&cdg()).await;

        // Hub drops the first link.
        let first = hubs.remove(0);
        drop(first);
        settle().await;

        assert!(!manager.is_connected());
        assert!(manager.joined_topics().is_empty());
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(150)).await;
        greet(&hubs[0]).await;
        settle().await;
        assert!(manager.is_connected());
        assert!(manager.joined_topics().is_empty());
        manager.disconnect();
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_bounded_attempts_until_next_connect() {
        let (connector, _hubs) = scripted(0);
        let manager = ConnectionManager::new(connector.clone(), settings());

        manager.connect();
        tokio::time::sleep(Duration::from_secs(5)).await;
        // One initial attempt plus two retries.
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 3);

        manager.connect();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn ensure_connected_rearms_only_after_giving_up() {
        let (connector, _hubs) = scripted(0);
        let manager = ConnectionManager::new(connector.clone(), settings());

        manager.connect();
        // Still retrying: nothing to re-arm.
        assert!(!manager.ensure_connected());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 3);

        assert!(manager.ensure_connected());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn ensure_connected_leaves_a_live_link_alone() {
        let (connector, hubs) = scripted(1);
        let manager = ConnectionManager::new(connector.clone(), settings());
        manager.connect();
        greet(&hubs[0]).await;
        settle().await;

        assert!(!manager.ensure_connected());
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
        manager.disconnect();
    }

    #[tokio::test]
    async fn explicit_disconnect_fires_disconnect_once() {
        let (connector, hubs) = scripted(1);
        let manager = ConnectionManager::new(connector, settings());
        let disconnects = Arc::new(AtomicUsize::new(0));
        let counter = disconnects.clone();
        manager.on(
            control::DISCONNECT,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        manager.connect();
        greet(&hubs[0]).await;
        settle().await;
        manager.disconnect();
        manager.disconnect();

        assert!(!manager.is_connected());
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }
}
