use std::collections::HashMap;

use gallop_core::{GameId, PendingGame};

/// Rooms older than this are evicted by the periodic sweep.
pub const EXPIRY_THRESHOLD_MS: i64 = 60_000;

/// Pending rooms awaiting a second player.
///
/// Ids are client-chosen; a duplicate id silently replaces the earlier
/// entry. Collisions are left to the 36^6 id space, not rejected.
#[derive(Debug, Default)]
pub struct GameDirectory {
    games: HashMap<GameId, PendingGame>,
}

impl GameDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, game: PendingGame) {
        self.games.insert(game.id.clone(), game);
    }

    /// Returns whether anything was actually removed, so the caller can
    /// skip the directory broadcast on a miss.
    pub fn remove(&mut self, id: &GameId) -> bool {
        self.games.remove(id).is_some()
    }

    /// Removes and returns the room, consuming it for a match.
    pub fn take(&mut self, id: &GameId) -> Option<PendingGame> {
        self.games.remove(id)
    }

    pub fn snapshot(&self) -> Vec<PendingGame> {
        self.games.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Evicts every room strictly older than [`EXPIRY_THRESHOLD_MS`] and
    /// returns the evicted ids.
    pub fn sweep_expired(&mut self, now_ms: i64) -> Vec<GameId> {
        let expired: Vec<GameId> = self
            .games
            .iter()
            .filter(|(_, game)| now_ms - game.created_at > EXPIRY_THRESHOLD_MS)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            self.games.remove(id);
        }
        expired
    }
}
