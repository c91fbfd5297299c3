use gallop_core::ClientMessage;

use crate::types::ClientId;

/// Events fed into the lobby task by the WebSocket gateway. One queue,
/// one consumer: the lobby processes these strictly one at a time.
#[derive(Debug)]
pub enum LobbyCommand {
    /// A client finished the WebSocket handshake.
    Connected { client: ClientId },

    /// A parsed frame arrived from a client.
    Inbound {
        client: ClientId,
        message: ClientMessage,
    },

    /// The client's socket closed, for whatever reason.
    Disconnected { client: ClientId },
}
