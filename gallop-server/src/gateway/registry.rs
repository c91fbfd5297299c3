use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use gallop_core::ServerMessage;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::gateway::ClientSink;
use crate::lobby::LobbyCommand;
use crate::types::ClientId;

struct RegistryInner {
    clients: DashMap<ClientId, mpsc::UnboundedSender<Message>>,
}

/// Live connection senders, shared between the axum handlers and the
/// lobby's delivery seam.
#[derive(Clone)]
pub struct ClientRegistry {
    inner: Arc<RegistryInner>,
    pub(crate) lobby_tx: mpsc::Sender<LobbyCommand>,
}

impl ClientRegistry {
    pub fn new(lobby_tx: mpsc::Sender<LobbyCommand>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                clients: DashMap::new(),
            }),
            lobby_tx,
        }
    }

    pub fn add_client(&self, client: ClientId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.clients.insert(client, tx);
    }

    pub fn remove_client(&self, client: &ClientId) {
        self.inner.clients.remove(client);
    }

    fn send_text(&self, client: ClientId, text: &str) {
        if let Some(tx) = self.inner.clients.get(&client) {
            if let Err(e) = tx.send(Message::Text(text.to_owned().into())) {
                error!("Failed to queue frame for {}: {:?}", client, e);
            }
        } else {
            debug!("Dropping frame for disconnected client {}", client);
        }
    }
}

#[async_trait]
impl ClientSink for ClientRegistry {
    async fn deliver(&self, client: ClientId, message: ServerMessage) {
        match serde_json::to_string(&message) {
            Ok(json) => self.send_text(client, &json),
            Err(e) => error!("Failed to serialize server message: {}", e),
        }
    }

    async fn broadcast(&self, message: ServerMessage) {
        // Serialized once, fanned out to every live sender.
        let json = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize server message: {}", e);
                return;
            }
        };
        for entry in self.inner.clients.iter() {
            if let Err(e) = entry.value().send(Message::Text(json.clone().into())) {
                error!("Failed to queue frame for {}: {:?}", entry.key(), e);
            }
        }
    }
}
