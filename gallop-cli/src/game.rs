//! The terminal play loop. All rules run locally: the relay only moves
//! frames back and forth.
//!
//! Rules: each knight leaves an apple on the square it departs, landing
//! on the opponent captures and wins, and a player with no legal move
//! at the start of their turn loses. The host plays first.

use anyhow::Result;
use colored::Colorize;
use dialoguer::Select;
use gallop_core::board;
use gallop_core::{ClientMessage, GameMove, Position, ServerMessage};

use crate::net::Connection;

/// Which side this process plays. The host is player 1 and opens from
/// (0,0); the guest is player 2 at (7,7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Host,
    Guest,
}

pub struct Match {
    seat: Seat,
    own_name: String,
    opponent_name: String,
    own_pos: Position,
    opponent_pos: Position,
    apples: Vec<Position>,
    my_turn: bool,
}

impl Match {
    pub fn new(seat: Seat, own_name: String, opponent_name: String) -> Self {
        let (own_pos, opponent_pos, my_turn) = match seat {
            Seat::Host => (Position::new(0, 0), Position::new(7, 7), true),
            Seat::Guest => (Position::new(7, 7), Position::new(0, 0), false),
        };
        Self {
            seat,
            own_name,
            opponent_name,
            own_pos,
            opponent_pos,
            apples: Vec::new(),
            my_turn,
        }
    }

    pub async fn play(mut self, conn: &mut Connection) -> Result<()> {
        loop {
            self.render();
            if self.my_turn {
                if !self.take_turn(conn).await? {
                    return Ok(());
                }
            } else if !self.await_opponent(conn).await? {
                return Ok(());
            }
        }
    }

    /// One of our turns; returns false when the game is over.
    async fn take_turn(&mut self, conn: &mut Connection) -> Result<bool> {
        let options = board::legal_moves(self.own_pos, &self.apples, self.own_pos, self.opponent_pos);
        if options.is_empty() {
            println!("{}", "No legal moves left. You lose.".red().bold());
            conn.send(&ClientMessage::GameEnd {
                winner: self.opponent_name.clone(),
            })
            .await?;
            return Ok(false);
        }

        let labels: Vec<String> = options.iter().map(|p| describe_square(*p)).collect();
        let choice = Select::new()
            .with_prompt("Your move")
            .items(&labels)
            .default(0)
            .interact()?;
        let target = options[choice];

        let departed = self.own_pos;
        self.apples.push(departed);
        self.own_pos = target;

        let mv = GameMove {
            player: self.player_index(),
            old_pos: departed,
            new_pos: target,
            apples: self.apples.clone(),
            next_turn: self.opponent_index(),
        };
        conn.send(&ClientMessage::GameMove { mv }).await?;

        if target == self.opponent_pos {
            self.render();
            println!(
                "{}",
                format!("You captured {}! You win.", self.opponent_name)
                    .green()
                    .bold()
            );
            conn.send(&ClientMessage::GameEnd {
                winner: self.own_name.clone(),
            })
            .await?;
            return Ok(false);
        }

        self.my_turn = false;
        Ok(true)
    }

    /// Waits out the opponent's turn; returns false when the game is
    /// over.
    async fn await_opponent(&mut self, conn: &mut Connection) -> Result<bool> {
        println!("Waiting for {}...", self.opponent_name.cyan());
        loop {
            match conn.next().await? {
                Some(ServerMessage::OpponentMove { mv }) => {
                    self.opponent_pos = mv.new_pos;
                    self.apples = mv.apples;
                    if self.opponent_pos == self.own_pos {
                        self.render();
                        println!(
                            "{}",
                            format!("{} captured you. You lose.", self.opponent_name)
                                .red()
                                .bold()
                        );
                        return Ok(false);
                    }
                    self.my_turn = true;
                    return Ok(true);
                }
                Some(ServerMessage::GameEnded { winner }) => {
                    println!("Game over. Winner: {}", winner.green().bold());
                    return Ok(false);
                }
                Some(ServerMessage::OpponentLeft { message }) => {
                    println!("{}", message.yellow());
                    return Ok(false);
                }
                // Lobby chatter aimed at idle clients; not our concern
                // mid-game.
                Some(_) => {}
                None => {
                    println!("{}", "Connection closed.".red());
                    return Ok(false);
                }
            }
        }
    }

    fn player_index(&self) -> u8 {
        match self.seat {
            Seat::Host => 1,
            Seat::Guest => 2,
        }
    }

    fn opponent_index(&self) -> u8 {
        match self.seat {
            Seat::Host => 2,
            Seat::Guest => 1,
        }
    }

    fn render(&self) {
        println!();
        println!("    0 1 2 3 4 5 6 7");
        for row in 0..8u8 {
            let mut line = format!("  {} ", row);
            for col in 0..8u8 {
                let square = Position::new(row, col);
                let cell = if square == self.own_pos {
                    "N".green().bold().to_string()
                } else if square == self.opponent_pos {
                    "n".red().bold().to_string()
                } else if self.apples.contains(&square) {
                    "o".yellow().to_string()
                } else {
                    ".".dimmed().to_string()
                };
                line.push_str(&cell);
                line.push(' ');
            }
            println!("{line}");
        }
        println!(
            "  {} you   {} {}   {} apple",
            "N".green().bold(),
            "n".red().bold(),
            self.opponent_name,
            "o".yellow()
        );
    }
}

fn describe_square(p: Position) -> String {
    format!("row {}, col {}", p.row, p.col)
}
