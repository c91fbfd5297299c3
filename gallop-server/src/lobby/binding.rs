use gallop_core::GameId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Guest,
}

/// Where a connection currently sits in the matchmaking flow.
///
/// Kept as a tagged variant rather than `room_id` + `is_host` flags so
/// that illegal combinations (relaying a move while unbound, hosting
/// while already matched) are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Connected, browsing the directory.
    Unbound,
    /// Created a room that is still waiting for a guest.
    Hosting(GameId),
    /// Matched into an active session.
    InSession { game: GameId, role: Role },
}
