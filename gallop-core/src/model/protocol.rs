use crate::model::{GameId, GameMove, PendingGame};
use serde::{Deserialize, Serialize};

/// Frames a client sends to the relay. Every frame is one JSON object
/// whose `type` field selects the variant.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    CreateGame {
        game: PendingGame,
    },
    #[serde(rename_all = "camelCase")]
    RemoveGame {
        game_id: GameId,
    },
    #[serde(rename_all = "camelCase")]
    JoinGame {
        game_id: GameId,
        guest_name: String,
        guest_color: String,
    },
    GetGames,
    GameMove {
        #[serde(rename = "move")]
        mv: GameMove,
    },
    GameEnd {
        winner: String,
    },
}

/// Frames the relay sends back.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    GamesList {
        games: Vec<PendingGame>,
    },
    #[serde(rename_all = "camelCase")]
    GameStarted {
        game_id: GameId,
        host_name: String,
        host_color: String,
        guest_name: String,
        guest_color: String,
    },
    OpponentMove {
        #[serde(rename = "move")]
        mv: GameMove,
    },
    GameEnded {
        winner: String,
    },
    OpponentLeft {
        message: String,
    },
}
