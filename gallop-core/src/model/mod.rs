mod game;
mod protocol;

pub use game::{GameId, GameMove, PendingGame, Position};
pub use protocol::{ClientMessage, ServerMessage};
