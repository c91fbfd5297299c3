pub mod board;
pub mod model;
pub mod time;

pub use model::{ClientMessage, GameId, GameMove, PendingGame, Position, ServerMessage};
