mod binding;
mod command;
mod directory;
mod lobby;
mod sessions;

pub use binding::{Binding, Role};
pub use command::LobbyCommand;
pub use directory::{EXPIRY_THRESHOLD_MS, GameDirectory};
pub use lobby::{Lobby, SWEEP_PERIOD};
pub use sessions::{GameSession, GameSnapshot, SessionTable};
