//! End-to-end flows over real WebSockets against a server bound to an
//! ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use gallop_core::time::unix_millis;
use gallop_core::{ClientMessage, GameId, GameMove, PendingGame, Position, ServerMessage};
use gallop_server::{ClientRegistry, Lobby, router};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> SocketAddr {
    let (lobby_tx, lobby_rx) = mpsc::channel(100);
    let registry = ClientRegistry::new(lobby_tx);
    let lobby = Lobby::new(lobby_rx, Arc::new(registry.clone()));
    tokio::spawn(lobby.run());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(registry)).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (stream, _) = timeout(
        Duration::from_secs(3),
        connect_async(format!("ws://{addr}/ws")),
    )
    .await
    .expect("connect timeout")
    .expect("connect failed");
    stream
}

async fn send(client: &mut Client, msg: &ClientMessage) {
    let json = serde_json::to_string(msg).unwrap();
    client.send(Message::Text(json.into())).await.unwrap();
}

async fn recv(client: &mut Client) -> ServerMessage {
    loop {
        let frame = timeout(Duration::from_secs(3), client.next())
            .await
            .expect("recv timeout")
            .expect("stream ended")
            .expect("ws error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("unparseable server frame");
        }
    }
}

fn new_game(id: &str, host_name: &str) -> PendingGame {
    PendingGame {
        id: GameId::from(id),
        host_name: host_name.to_owned(),
        host_color: "#ff0000".to_owned(),
        created_at: unix_millis(),
    }
}

#[tokio::test]
async fn connecting_pushes_the_directory_snapshot() {
    let addr = spawn_server().await;
    let mut client = connect(addr).await;

    match recv(&mut client).await {
        ServerMessage::GamesList { games } => assert!(games.is_empty()),
        other => panic!("expected gamesList, got {other:?}"),
    }
}

#[tokio::test]
async fn full_match_flow_over_sockets() {
    let addr = spawn_server().await;

    let mut host = connect(addr).await;
    recv(&mut host).await; // empty snapshot

    send(
        &mut host,
        &ClientMessage::CreateGame {
            game: new_game("WSGAME", "Anna"),
        },
    )
    .await;
    match recv(&mut host).await {
        ServerMessage::GamesList { games } => assert_eq!(games.len(), 1),
        other => panic!("expected gamesList, got {other:?}"),
    }

    // A second client sees the room in its snapshot and joins.
    let mut guest = connect(addr).await;
    match recv(&mut guest).await {
        ServerMessage::GamesList { games } => {
            assert_eq!(games[0].id, GameId::from("WSGAME"));
        }
        other => panic!("expected gamesList, got {other:?}"),
    }

    send(
        &mut guest,
        &ClientMessage::JoinGame {
            game_id: GameId::from("WSGAME"),
            guest_name: "Ben".to_owned(),
            guest_color: "#00ff00".to_owned(),
        },
    )
    .await;

    // Both sides see the global announcement, then the emptied
    // directory.
    for client in [&mut host, &mut guest] {
        match recv(client).await {
            ServerMessage::GameStarted {
                game_id,
                host_name,
                guest_name,
                ..
            } => {
                assert_eq!(game_id, GameId::from("WSGAME"));
                assert_eq!(host_name, "Anna");
                assert_eq!(guest_name, "Ben");
            }
            other => panic!("expected gameStarted, got {other:?}"),
        }
        match recv(client).await {
            ServerMessage::GamesList { games } => assert!(games.is_empty()),
            other => panic!("expected gamesList, got {other:?}"),
        }
    }

    // Host moves; the guest receives the payload untouched.
    let mv = GameMove {
        player: 1,
        old_pos: Position::new(0, 0),
        new_pos: Position::new(2, 1),
        apples: vec![Position::new(0, 0)],
        next_turn: 2,
    };
    send(&mut host, &ClientMessage::GameMove { mv: mv.clone() }).await;
    match recv(&mut guest).await {
        ServerMessage::OpponentMove { mv: relayed } => assert_eq!(relayed, mv),
        other => panic!("expected opponentMove, got {other:?}"),
    }

    // Host vanishes; the guest is told exactly once.
    drop(host);
    match recv(&mut guest).await {
        ServerMessage::OpponentLeft { message } => {
            assert_eq!(message, "Your opponent has left the game");
        }
        other => panic!("expected opponentLeft, got {other:?}"),
    }
}

#[tokio::test]
async fn game_end_reaches_the_opponent() {
    let addr = spawn_server().await;

    let mut host = connect(addr).await;
    recv(&mut host).await;
    send(
        &mut host,
        &ClientMessage::CreateGame {
            game: new_game("ENDGAME", "Anna"),
        },
    )
    .await;
    recv(&mut host).await; // directory broadcast

    let mut guest = connect(addr).await;
    recv(&mut guest).await; // snapshot with the room
    send(
        &mut guest,
        &ClientMessage::JoinGame {
            game_id: GameId::from("ENDGAME"),
            guest_name: "Ben".to_owned(),
            guest_color: "#00ff00".to_owned(),
        },
    )
    .await;
    for client in [&mut host, &mut guest] {
        recv(client).await; // gameStarted
        recv(client).await; // emptied directory
    }

    send(
        &mut guest,
        &ClientMessage::GameEnd {
            winner: "Ben".to_owned(),
        },
    )
    .await;
    match recv(&mut host).await {
        ServerMessage::GameEnded { winner } => assert_eq!(winner, "Ben"),
        other => panic!("expected gameEnded, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_frames_leave_the_connection_open() {
    let addr = spawn_server().await;
    let mut client = connect(addr).await;
    recv(&mut client).await;

    client
        .send(Message::Text("this is not json".into()))
        .await
        .unwrap();
    client
        .send(Message::Text(r#"{"type":"mystery"}"#.into()))
        .await
        .unwrap();

    // The connection still answers a well-formed request.
    send(&mut client, &ClientMessage::GetGames).await;
    match recv(&mut client).await {
        ServerMessage::GamesList { games } => assert!(games.is_empty()),
        other => panic!("expected gamesList, got {other:?}"),
    }
}
