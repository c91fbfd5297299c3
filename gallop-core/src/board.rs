//! Move rules for the L-shaped leaper on the 8×8 board.
//!
//! The relay server never calls into this module — it forwards moves
//! without validating them. Clients use it to offer only legal moves and
//! to detect the stalemate loss at the start of a turn.

use crate::model::Position;

pub const BOARD_SIZE: i8 = 8;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub fn is_inside_board(row: i8, col: i8) -> bool {
    (0..BOARD_SIZE).contains(&row) && (0..BOARD_SIZE).contains(&col)
}

/// Destinations reachable from `position`. A square is excluded when it
/// carries an apple or is the mover's own square; the opponent's square
/// stays legal — landing there is the capture that wins the game.
pub fn legal_moves(
    position: Position,
    apples: &[Position],
    own_pos: Position,
    _opponent_pos: Position,
) -> Vec<Position> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(d_row, d_col)| {
            let row = position.row as i8 + d_row;
            let col = position.col as i8 + d_col;
            if !is_inside_board(row, col) {
                return None;
            }
            let candidate = Position::new(row as u8, col as u8);
            if apples.contains(&candidate) || candidate == own_pos {
                return None;
            }
            Some(candidate)
        })
        .collect()
}

/// Whether the player can still move at all; `false` at the start of a
/// turn is a stalemate loss.
pub fn has_legal_moves(
    position: Position,
    apples: &[Position],
    own_pos: Position,
    opponent_pos: Position,
) -> bool {
    !legal_moves(position, apples, own_pos, opponent_pos).is_empty()
}
