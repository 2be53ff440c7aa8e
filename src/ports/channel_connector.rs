//! ChannelConnector port - opens one bidirectional frame channel to the hub.
//!
//! The connection manager owns reconnection; a connector only knows how to
//! open a single link.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::realtime::WireFrame;

/// An open link to the hub.
///
/// Dropping `outgoing` closes the link from the client side. `incoming`
/// yields `None` once the hub side is gone.
pub struct ChannelLink {
    pub outgoing: mpsc::Sender<WireFrame>,
    pub incoming: mpsc::Receiver<WireFrame>,
}

/// Failure to open a link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection refused: {0}")]
    Refused(String),

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Transport closed")]
    Closed,
}

/// Port for opening links to the realtime hub.
#[async_trait]
pub trait ChannelConnector: Send + Sync {
    async fn open(&self) -> Result<ChannelLink, TransportError>;
}
