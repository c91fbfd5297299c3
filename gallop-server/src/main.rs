use std::sync::Arc;

use anyhow::Result;
use gallop_server::{ClientRegistry, Lobby, ServerConfig, router};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();

    // The gateway writes commands here; the lobby task is the only
    // reader and the only owner of matchmaking state.
    let (lobby_tx, lobby_rx) = mpsc::channel(100);

    let registry = ClientRegistry::new(lobby_tx);
    let lobby = Lobby::new(lobby_rx, Arc::new(registry.clone()));

    tokio::spawn(lobby.run());
    info!("Lobby loop started");

    let addr = config.bind_addr();
    info!("Relay server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(registry)).await?;

    Ok(())
}
