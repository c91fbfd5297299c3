use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use gallop_core::{ClientMessage, ServerMessage};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Typed WebSocket connection to the relay.
pub struct Connection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Connection {
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url)
            .await
            .with_context(|| format!("failed to connect to {url}"))?;
        Ok(Self { stream })
    }

    pub async fn send(&mut self, message: &ClientMessage) -> Result<()> {
        let json = serde_json::to_string(message)?;
        self.stream
            .send(Message::Text(json.into()))
            .await
            .context("failed to send frame")?;
        Ok(())
    }

    /// Next server frame. Non-text frames are skipped; `None` means the
    /// server closed the connection.
    pub async fn next(&mut self) -> Result<Option<ServerMessage>> {
        while let Some(frame) = self.stream.next().await {
            match frame.context("websocket stream error")? {
                Message::Text(text) => {
                    let message =
                        serde_json::from_str(&text).context("unreadable server frame")?;
                    return Ok(Some(message));
                }
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }
}
