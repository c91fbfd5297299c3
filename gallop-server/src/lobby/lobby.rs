use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gallop_core::time::unix_millis;
use gallop_core::{ClientMessage, GameId, GameMove, PendingGame, ServerMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::gateway::ClientSink;
use crate::lobby::binding::{Binding, Role};
use crate::lobby::command::LobbyCommand;
use crate::lobby::directory::GameDirectory;
use crate::lobby::sessions::{GameSession, SessionTable};
use crate::types::ClientId;

/// How often the expiry sweep runs.
pub const SWEEP_PERIOD: Duration = Duration::from_secs(5);

const OPPONENT_LEFT_MESSAGE: &str = "Your opponent has left the game";

/// The single-threaded matchmaking and relay core.
///
/// One task owns all three tables; the gateway only ever talks to it
/// through the command channel, so every handler runs to completion
/// before the next event is looked at. Nothing here returns an error to
/// a client: a precondition miss is a silent no-op, a bad frame never
/// reaches this far.
pub struct Lobby {
    bindings: HashMap<ClientId, Binding>,
    directory: GameDirectory,
    sessions: SessionTable,
    command_rx: mpsc::Receiver<LobbyCommand>,
    sink: Arc<dyn ClientSink>,
}

impl Lobby {
    pub fn new(command_rx: mpsc::Receiver<LobbyCommand>, sink: Arc<dyn ClientSink>) -> Self {
        Self {
            bindings: HashMap::new(),
            directory: GameDirectory::new(),
            sessions: SessionTable::new(),
            command_rx,
            sink,
        }
    }

    pub async fn run(mut self) {
        info!("Lobby event loop started");

        let mut sweep = tokio::time::interval(SWEEP_PERIOD);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => {
                            info!("Command channel closed. Shutting down lobby.");
                            break;
                        }
                    }
                }

                _ = sweep.tick() => {
                    self.sweep(unix_millis()).await;
                }
            }
        }

        info!("Lobby event loop finished");
    }

    pub async fn handle_command(&mut self, cmd: LobbyCommand) {
        match cmd {
            LobbyCommand::Connected { client } => self.on_connected(client).await,
            LobbyCommand::Inbound { client, message } => self.on_message(client, message).await,
            LobbyCommand::Disconnected { client } => self.on_disconnected(client).await,
        }
    }

    /// Evicts expired pending rooms. Broadcasts the directory exactly
    /// once when at least one room was removed; active sessions are
    /// never touched.
    pub async fn sweep(&mut self, now_ms: i64) {
        let evicted = self.directory.sweep_expired(now_ms);
        if evicted.is_empty() {
            return;
        }

        for game_id in &evicted {
            info!("Expired game {} evicted", game_id);
            if let Some(host) = self.find_host(game_id) {
                self.bindings.insert(host, Binding::Unbound);
            }
        }

        self.broadcast_directory().await;
    }

    async fn on_connected(&mut self, client: ClientId) {
        info!("Client {} connected", client);
        self.bindings.insert(client, Binding::Unbound);

        // Every new client gets the current directory immediately.
        self.sink.deliver(client, self.games_list()).await;
    }

    async fn on_message(&mut self, client: ClientId, message: ClientMessage) {
        match message {
            ClientMessage::GetGames => {
                self.sink.deliver(client, self.games_list()).await;
            }
            ClientMessage::CreateGame { game } => self.create_game(client, game).await,
            ClientMessage::RemoveGame { game_id } => self.remove_game(client, game_id).await,
            ClientMessage::JoinGame {
                game_id,
                guest_name,
                guest_color,
            } => self.join_game(client, game_id, guest_name, guest_color).await,
            ClientMessage::GameMove { mv } => self.relay_move(client, mv).await,
            ClientMessage::GameEnd { winner } => self.end_game(client, winner).await,
        }
    }

    async fn on_disconnected(&mut self, client: ClientId) {
        info!("Client {} disconnected", client);

        let Some(binding) = self.bindings.remove(&client) else {
            return;
        };

        match binding {
            Binding::Unbound => {}

            Binding::Hosting(game_id) => {
                if self.directory.remove(&game_id) {
                    debug!("Removed pending game {} after host left", game_id);
                    self.broadcast_directory().await;
                }
            }

            Binding::InSession { game, role } => {
                if let Some(session) = self.sessions.remove(&game) {
                    let opponent = session.opponent_of(role);
                    self.bindings.insert(opponent, Binding::Unbound);
                    self.sink
                        .deliver(
                            opponent,
                            ServerMessage::OpponentLeft {
                                message: OPPONENT_LEFT_MESSAGE.to_owned(),
                            },
                        )
                        .await;
                    debug!("Cleaned up session {}", game);
                }
            }
        }
    }

    async fn create_game(&mut self, client: ClientId, game: PendingGame) {
        if self.binding(&client) != Binding::Unbound {
            debug!("Ignoring createGame from {} while bound", client);
            return;
        }

        let id = game.id.clone();
        info!("Game {} created by {}", id, game.host_name);

        // No uniqueness check: a colliding id replaces the earlier room
        // and strands its host's binding, matching the observed
        // behavior of the protocol.
        self.directory.insert(game);
        self.bindings.insert(client, Binding::Hosting(id));

        self.broadcast_directory().await;
    }

    async fn remove_game(&mut self, client: ClientId, game_id: GameId) {
        if self.binding(&client) != Binding::Hosting(game_id.clone()) {
            debug!("Ignoring removeGame for {} from non-host {}", game_id, client);
            return;
        }

        self.bindings.insert(client, Binding::Unbound);

        if self.directory.remove(&game_id) {
            info!("Game {} removed by its host", game_id);
            self.broadcast_directory().await;
        }
    }

    async fn join_game(
        &mut self,
        client: ClientId,
        game_id: GameId,
        guest_name: String,
        guest_color: String,
    ) {
        let Some(game) = self.directory.take(&game_id) else {
            debug!("Ignoring joinGame for unknown game {}", game_id);
            return;
        };

        // The guest is bound before the host scan, so a host joining its
        // own room consumes it without ever producing a session.
        self.bindings.insert(
            client,
            Binding::InSession {
                game: game_id.clone(),
                role: Role::Guest,
            },
        );

        if let Some(host) = self.find_host(&game_id) {
            self.bindings.insert(
                host,
                Binding::InSession {
                    game: game_id.clone(),
                    role: Role::Host,
                },
            );
            self.sessions
                .insert(game_id.clone(), GameSession::new(host, client));

            info!("{} joined game {}", guest_name, game_id);

            // Announced to every connection, not just the pair; idle
            // clients filter by relevance themselves.
            self.sink
                .broadcast(ServerMessage::GameStarted {
                    game_id,
                    host_name: game.host_name,
                    host_color: game.host_color,
                    guest_name,
                    guest_color,
                })
                .await;
        } else {
            // The room is consumed either way; the match is lost.
            warn!("Game {} joined but its host is gone", game_id);
        }

        self.broadcast_directory().await;
    }

    async fn relay_move(&mut self, client: ClientId, mv: GameMove) {
        let Binding::InSession { game, role } = self.binding(&client) else {
            debug!("Ignoring gameMove from {} outside a session", client);
            return;
        };
        let Some(session) = self.sessions.get(&game) else {
            return;
        };

        debug!("Forwarding move in game {}", game);
        let opponent = session.opponent_of(role);
        self.sink
            .deliver(opponent, ServerMessage::OpponentMove { mv })
            .await;
    }

    async fn end_game(&mut self, client: ClientId, winner: String) {
        let Binding::InSession { game, role } = self.binding(&client) else {
            debug!("Ignoring gameEnd from {} outside a session", client);
            return;
        };

        let Some(session) = self.sessions.remove(&game) else {
            // Orphaned half of a lost match; just release the binding.
            self.bindings.insert(client, Binding::Unbound);
            return;
        };

        info!("Game {} ended, winner: {}", game, winner);

        let opponent = session.opponent_of(role);
        self.sink
            .deliver(opponent, ServerMessage::GameEnded { winner })
            .await;

        self.bindings.insert(session.host, Binding::Unbound);
        self.bindings.insert(session.guest, Binding::Unbound);
    }

    fn binding(&self, client: &ClientId) -> Binding {
        self.bindings
            .get(client)
            .cloned()
            .unwrap_or(Binding::Unbound)
    }

    fn find_host(&self, game_id: &GameId) -> Option<ClientId> {
        self.bindings.iter().find_map(|(client, binding)| match binding {
            Binding::Hosting(id) if id == game_id => Some(*client),
            _ => None,
        })
    }

    fn games_list(&self) -> ServerMessage {
        ServerMessage::GamesList {
            games: self.directory.snapshot(),
        }
    }

    async fn broadcast_directory(&self) {
        self.sink.broadcast(self.games_list()).await;
    }
}
