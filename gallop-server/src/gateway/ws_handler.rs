use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use gallop_core::ClientMessage;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::gateway::ClientRegistry;
use crate::lobby::LobbyCommand;
use crate::types::ClientId;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(registry): State<ClientRegistry>,
) -> impl IntoResponse {
    let client = ClientId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, client, registry))
}

async fn handle_socket(socket: WebSocket, client: ClientId, registry: ClientRegistry) {
    info!("New WebSocket connection: {}", client);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // The sender must be registered before the lobby handles Connected,
    // so the directory snapshot it pushes finds a live channel.
    registry.add_client(client, tx);

    if registry
        .lobby_tx
        .send(LobbyCommand::Connected { client })
        .await
        .is_err()
    {
        error!("Lobby is gone; dropping connection {}", client);
        registry.remove_client(&client);
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let registry = registry.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(message) => {
                            let cmd = LobbyCommand::Inbound { client, message };
                            if registry.lobby_tx.send(cmd).await.is_err() {
                                error!("Lobby died: closing {}", client);
                                break;
                            }
                        }
                        // Unreadable frames are dropped; the connection
                        // stays open.
                        Err(e) => warn!("Unreadable frame from {}: {:?}", client, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    registry.remove_client(&client);
    let _ = registry
        .lobby_tx
        .send(LobbyCommand::Disconnected { client })
        .await;

    info!("WebSocket disconnected: {}", client);
}
