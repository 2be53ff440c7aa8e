//! WebSocket transport to a remote hub.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::domain::realtime::WireFrame;
use crate::ports::{ChannelConnector, ChannelLink, TransportError};

/// Opens links to `ws://host/ws` with tokio-tungstenite.
pub struct WsConnector {
    url: String,
    buffer: usize,
}

impl WsConnector {
    pub fn new(url: impl Into<String>, buffer: usize) -> Self {
        Self {
            url: url.into(),
            buffer: buffer.max(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChannelConnector for WsConnector {
    async fn open(&self) -> Result<ChannelLink, TransportError> {
        let (ws_stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| TransportError::Handshake(e.to_string()))?;
        tracing::debug!(url = %self.url, "WebSocket handshake complete");

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();
        let (outgoing, mut to_socket) = mpsc::channel::<WireFrame>(self.buffer);
        let (from_socket, incoming) = mpsc::channel::<WireFrame>(self.buffer);

        // Writer ends when the client drops its sender.
        tokio::spawn(async move {
            while let Some(frame) = to_socket.recv().await {
                let text = match frame.to_json() {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(event = %frame.event, error = %e, "Unserializable frame");
                        continue;
                    }
                };
                if let Err(e) = ws_sender.send(Message::Text(text)).await {
                    tracing::debug!(error = %e, "WebSocket send failed");
                    break;
                }
            }
            let _ = ws_sender.send(Message::Close(None)).await;
        });

        // Reader ends with the socket; dropping `from_socket` closes the link.
        tokio::spawn(async move {
            while let Some(message) = ws_receiver.next().await {
                match message {
                    Ok(Message::Text(text)) => match WireFrame::from_json(&text) {
                        Ok(frame) => {
                            if from_socket.send(frame).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "Malformed frame from hub"),
                    },
                    Ok(Message::Close(_)) => {
                        tracing::debug!("Hub closed the socket");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!(error = %e, "WebSocket receive failed");
                        break;
                    }
                }
            }
        });

        Ok(ChannelLink { outgoing, incoming })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_hub_is_a_handshake_error() {
        let connector = WsConnector::new("ws://127.0.0.1:1/ws", 8);
        assert!(matches!(
            connector.open().await,
            Err(TransportError::Handshake(_))
        ));
    }

    #[test]
    fn buffer_is_at_least_one() {
        let connector = WsConnector::new("ws://localhost/ws", 0);
        assert_eq!(connector.buffer, 1);
        assert_eq!(connector.url(), "ws://localhost/ws");
    }
}
