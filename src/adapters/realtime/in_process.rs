//! In-process transport: links a client straight into a hub's rooms.
//!
//! Used to run a display and the hub in one process, and by integration
//! tests to exercise the real connection manager without a socket.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch, Mutex};

use crate::ports::{ChannelConnector, ChannelLink, TransportError};

use super::rooms::RoomManager;
use super::session::serve_channel;

/// [`ChannelConnector`] that serves each link on a local task.
pub struct InProcessConnector {
    rooms: Arc<RoomManager>,
    buffer: usize,
    available: AtomicBool,
    opened: AtomicUsize,
    shutdown: Mutex<watch::Sender<bool>>,
}

impl InProcessConnector {
    pub fn new(rooms: Arc<RoomManager>, buffer: usize) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            rooms,
            buffer: buffer.max(1),
            available: AtomicBool::new(true),
            opened: AtomicUsize::new(0),
            shutdown: Mutex::new(shutdown),
        }
    }

    /// Refuse (or accept again) new links, as an unreachable hub would.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of `open` calls so far, refused ones included.
    pub fn open_attempts(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Drop every live link from the hub side, like a network failure.
    ///
    /// Links opened afterwards are unaffected.
    pub async fn sever_all(&self) {
        let mut shutdown = self.shutdown.lock().await;
        let _ = shutdown.send(true);
        let (fresh, _) = watch::channel(false);
        *shutdown = fresh;
    }
}

#[async_trait]
impl ChannelConnector for InProcessConnector {
    async fn open(&self) -> Result<ChannelLink, TransportError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if !self.available.load(Ordering::SeqCst) {
            return Err(TransportError::Refused("hub unavailable".to_string()));
        }

        let (client_tx, hub_rx) = mpsc::channel(self.buffer);
        let (hub_tx, client_rx) = mpsc::channel(self.buffer);
        let stop = self.shutdown.lock().await.subscribe();

        tokio::spawn(serve_channel(self.rooms.clone(), hub_rx, hub_tx, stop));

        Ok(ChannelLink {
            outgoing: client_tx,
            incoming: client_rx,
        })
    }
}
