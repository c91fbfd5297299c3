//! Matchmaking and move-relay server for gallop.
//!
//! The server is a trust-the-client relay: it tracks pending rooms and
//! matched sessions, forwards gameplay frames verbatim between the two
//! parties, and never validates a move. All state lives in one
//! [`Lobby`] task; the axum WebSocket gateway feeds it commands.

pub mod config;
pub mod gateway;
pub mod lobby;
pub mod types;

use axum::{Router, routing::get};

pub use config::ServerConfig;
pub use gateway::{ClientRegistry, ClientSink, ws_handler};
pub use lobby::{Lobby, LobbyCommand};
pub use types::ClientId;

/// Routes: the WebSocket upgrade plus a liveness probe.
pub fn router(registry: ClientRegistry) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(registry)
}
