use async_trait::async_trait;
use gallop_core::ServerMessage;

use crate::types::ClientId;

/// Outbound seam between the lobby and the transport. The production
/// implementation is [`ClientRegistry`](crate::gateway::ClientRegistry);
/// tests install a recording mock.
///
/// Delivery is fire-and-forget: a closed or unknown client is skipped,
/// never reported back to the lobby.
#[async_trait]
pub trait ClientSink: Send + Sync {
    /// Send a frame to one client.
    async fn deliver(&self, client: ClientId, message: ServerMessage);

    /// Send a frame to every connected client.
    async fn broadcast(&self, message: ServerMessage);
}
