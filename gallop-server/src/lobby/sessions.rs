use std::collections::HashMap;

use gallop_core::{GameId, Position};

use crate::lobby::binding::Role;
use crate::types::ClientId;

/// Initial board state recorded when a session is created.
///
/// The relay never reads or updates it afterwards — moves pass through
/// unverified. Kept as the hook for future server-side validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub player1_pos: Position,
    pub player2_pos: Position,
    pub apples: Vec<Position>,
    pub current_turn: u8,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            player1_pos: Position::new(0, 0),
            player2_pos: Position::new(7, 7),
            apples: Vec::new(),
            current_turn: 1,
        }
    }
}

/// A matched pair of connections relaying moves for one game.
#[derive(Debug)]
pub struct GameSession {
    pub host: ClientId,
    pub guest: ClientId,
    pub snapshot: GameSnapshot,
}

impl GameSession {
    pub fn new(host: ClientId, guest: ClientId) -> Self {
        Self {
            host,
            guest,
            snapshot: GameSnapshot::default(),
        }
    }

    pub fn opponent_of(&self, role: Role) -> ClientId {
        match role {
            Role::Host => self.guest,
            Role::Guest => self.host,
        }
    }
}

/// Active sessions keyed by game id; at most one session per id.
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: HashMap<GameId, GameSession>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: GameId, session: GameSession) {
        self.sessions.insert(id, session);
    }

    pub fn get(&self, id: &GameId) -> Option<&GameSession> {
        self.sessions.get(id)
    }

    pub fn remove(&mut self, id: &GameId) -> Option<GameSession> {
        self.sessions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
