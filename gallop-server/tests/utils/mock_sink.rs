use std::sync::Arc;

use async_trait::async_trait;
use gallop_core::ServerMessage;
use gallop_server::{ClientId, ClientSink};
use tokio::sync::Mutex;

/// One outbound message as the lobby handed it to the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// Point-to-point to one client.
    To(ClientId, ServerMessage),
    /// Broadcast to every connection.
    All(ServerMessage),
}

/// `ClientSink` that records every outbound message for verification.
#[derive(Clone, Default)]
pub struct MockClientSink {
    log: Arc<Mutex<Vec<Delivery>>>,
}

impl MockClientSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order.
    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.log.lock().await.clone()
    }

    /// Messages delivered point-to-point to one specific client.
    pub async fn sent_to(&self, client: ClientId) -> Vec<ServerMessage> {
        self.log
            .lock()
            .await
            .iter()
            .filter_map(|d| match d {
                Delivery::To(id, msg) if *id == client => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Messages broadcast to every connection.
    pub async fn broadcasts(&self) -> Vec<ServerMessage> {
        self.log
            .lock()
            .await
            .iter()
            .filter_map(|d| match d {
                Delivery::All(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Drops everything recorded so far.
    pub async fn clear(&self) {
        self.log.lock().await.clear();
    }
}

#[async_trait]
impl ClientSink for MockClientSink {
    async fn deliver(&self, client: ClientId, message: ServerMessage) {
        self.log.lock().await.push(Delivery::To(client, message));
    }

    async fn broadcast(&self, message: ServerMessage) {
        self.log.lock().await.push(Delivery::All(message));
    }
}
