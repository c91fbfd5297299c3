use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ID_LEN: usize = 6;

/// Client-chosen room identifier. Ids are drawn from a 36^6 space and the
/// directory does not reject collisions, so uniqueness is probabilistic.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct GameId(pub String);

impl GameId {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let id = (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for GameId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A square on the 8×8 board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// A room waiting for a second player, as advertised in the directory.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingGame {
    pub id: GameId,
    pub host_name: String,
    pub host_color: String,
    /// Client-stamped unix milliseconds; the server only ever compares it
    /// against its own clock when sweeping.
    pub created_at: i64,
}

/// One relayed move. The server never interprets any of it; the full
/// updated apple list travels with every move.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameMove {
    pub player: u8,
    pub old_pos: Position,
    pub new_pos: Position,
    pub apples: Vec<Position>,
    pub next_turn: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_use_the_room_code_alphabet() {
        for _ in 0..64 {
            let id = GameId::generate();
            assert_eq!(id.as_str().len(), 6);
            assert!(
                id.as_str()
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            );
        }
    }

    #[test]
    fn game_id_serializes_as_a_bare_string() {
        let id = GameId::from("ABC123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ABC123\"");
    }
}
