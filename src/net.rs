//! Connection driver.
//!
//! Deliberately thin: connect a WebSocket, split it, drain an outbound
//! channel on the writer side, feed inbound text frames to the handler on
//! the reader side. All protocol behavior lives behind this seam and is
//! testable without it.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{info, warn};

use crate::collab::Outbound;
use crate::config::ServerConfig;
use crate::error::BotError;
use crate::handler::Handler;

/// Production [`Outbound`]: formats `room|text` lines into the writer
/// channel.
pub struct ChannelOutbound {
    tx: mpsc::Sender<String>,
}

impl ChannelOutbound {
    /// Wrap a sender feeding the connection writer.
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Outbound for ChannelOutbound {
    async fn send(&self, room: Option<&str>, text: &str) {
        let line = format!("{}|{}", room.unwrap_or(""), text);
        if self.tx.send(line).await.is_err() {
            warn!("outbound channel closed, dropping message");
        }
    }
}

/// Connect and run until the connection closes or a fatal error surfaces.
///
/// `rx` is the receiving end of the channel `ChannelOutbound` writes to.
pub async fn run(
    server: &ServerConfig,
    handler: &mut Handler,
    mut rx: mpsc::Receiver<String>,
) -> Result<(), BotError> {
    let scheme = if server.tls { "wss" } else { "ws" };
    let url = format!("{scheme}://{}:{}{}", server.host, server.port, server.path);
    info!(url = %url, "connecting");

    let (stream, _) = connect_async(url.as_str()).await?;
    let (mut write, mut read) = stream.split();

    let writer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if write.send(WsMessage::Text(line)).await.is_err() {
                break;
            }
        }
    });

    // Frames are applied strictly in arrival order; the next frame is not
    // read until this one is fully handled.
    let result = async {
        while let Some(message) = read.next().await {
            match message? {
                WsMessage::Text(frame) => handler.handle_frame(&frame).await?,
                WsMessage::Close(_) => {
                    info!("connection closed by the service");
                    break;
                }
                _ => {}
            }
        }
        Ok(())
    }
    .await;

    writer.abort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_outbound_formats_lines() {
        let (tx, mut rx) = mpsc::channel(8);
        let outbound = ChannelOutbound::new(tx);

        outbound.send(None, "/avatar 246").await;
        outbound.send(Some("lobby"), "hello").await;

        assert_eq!(rx.recv().await.unwrap(), "|/avatar 246");
        assert_eq!(rx.recv().await.unwrap(), "lobby|hello");
    }
}
