mod game;
mod net;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use gallop_core::time::unix_millis;
use gallop_core::{ClientMessage, GameId, PendingGame, ServerMessage};
use tokio::time::{Duration, timeout};

use game::{Match, Seat};
use net::Connection;

/// How long a join attempt waits before concluding the room is gone.
/// The server never answers a miss; silence is the only signal.
const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "gallop", about = "Terminal client for the gallop relay")]
struct Cli {
    /// WebSocket endpoint of the relay server.
    #[arg(long, default_value = "ws://127.0.0.1:3001/ws")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the room directory once and print it.
    List,
    /// Follow directory updates and match announcements.
    Watch,
    /// Create a room and play once somebody joins.
    Host {
        name: String,
        #[arg(long, default_value = "#e74c3c")]
        color: String,
    },
    /// Join a pending room by id and play.
    Join {
        game_id: String,
        name: String,
        #[arg(long, default_value = "#3498db")]
        color: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut conn = Connection::connect(&cli.server).await?;

    match cli.command {
        Commands::List => list(&mut conn).await,
        Commands::Watch => watch(&mut conn).await,
        Commands::Host { name, color } => host(&mut conn, name, color).await,
        Commands::Join {
            game_id,
            name,
            color,
        } => join(&mut conn, game_id, name, color).await,
    }
}

async fn list(conn: &mut Connection) -> Result<()> {
    // The server pushes the current directory right after the
    // handshake; nothing to request.
    while let Some(msg) = conn.next().await? {
        if let ServerMessage::GamesList { games } = msg {
            print_games(&games);
            return Ok(());
        }
    }
    anyhow::bail!("server closed before sending the directory")
}

async fn watch(conn: &mut Connection) -> Result<()> {
    println!("{}", "Watching the lobby (ctrl-c to stop)".bold());
    while let Some(msg) = conn.next().await? {
        match msg {
            ServerMessage::GamesList { games } => print_games(&games),
            ServerMessage::GameStarted {
                game_id,
                host_name,
                guest_name,
                ..
            } => {
                println!(
                    "{} {} vs {} ({})",
                    "match:".green().bold(),
                    host_name,
                    guest_name,
                    game_id
                );
            }
            _ => {}
        }
    }
    Ok(())
}

async fn host(conn: &mut Connection, name: String, color: String) -> Result<()> {
    let game = PendingGame {
        id: GameId::generate(),
        host_name: name.clone(),
        host_color: color,
        created_at: unix_millis(),
    };
    println!(
        "Hosting room {} — waiting for an opponent (rooms expire after 60s)",
        game.id.to_string().yellow().bold()
    );
    conn.send(&ClientMessage::CreateGame { game: game.clone() })
        .await?;

    loop {
        match conn.next().await? {
            Some(ServerMessage::GameStarted {
                game_id,
                guest_name,
                ..
            }) if game_id == game.id => {
                println!("{} {} joined!", "go:".green().bold(), guest_name);
                return Match::new(Seat::Host, name, guest_name).play(conn).await;
            }
            // Our room dropping out of the directory before a match
            // means the sweeper took it.
            Some(ServerMessage::GamesList { games })
                if !games.iter().any(|g| g.id == game.id) =>
            {
                anyhow::bail!("room {} expired before anyone joined", game.id)
            }
            Some(_) => {}
            None => anyhow::bail!("server closed while waiting for a guest"),
        }
    }
}

async fn join(conn: &mut Connection, game_id: String, name: String, color: String) -> Result<()> {
    let game_id = GameId::from(game_id);
    conn.send(&ClientMessage::JoinGame {
        game_id: game_id.clone(),
        guest_name: name.clone(),
        guest_color: color,
    })
    .await?;

    loop {
        let msg = match timeout(JOIN_TIMEOUT, conn.next()).await {
            Ok(msg) => msg?,
            Err(_) => anyhow::bail!("no such room (or its host is gone): {game_id}"),
        };
        match msg {
            Some(ServerMessage::GameStarted {
                game_id: started,
                host_name,
                ..
            }) if started == game_id => {
                println!("{} playing against {}", "go:".green().bold(), host_name);
                return Match::new(Seat::Guest, name, host_name).play(conn).await;
            }
            Some(_) => {}
            None => anyhow::bail!("server closed before the match started"),
        }
    }
}

fn print_games(games: &[PendingGame]) {
    if games.is_empty() {
        println!("{}", "no open rooms".dimmed());
        return;
    }
    let mut games = games.to_vec();
    games.sort_by_key(|g| g.created_at);
    for game in &games {
        println!(
            "  {}  {} {}",
            game.id.to_string().yellow().bold(),
            game.host_name,
            format!("({})", game.host_color).dimmed()
        );
    }
}
