//! Board geometry and occupancy endpoints

use crate::state::ServerState;
use axum::{extract::State, Json};
use glinski_core::board::{CENTER_FILE, FILE_COUNT};
use glinski_core::{all_positions, file_length, in_check, is_checkmated, Color, LastMove, Piece, Position};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct CellInfo {
    pub pos: Position,
    pub file: u8,
    pub rank: u8,
    /// Vertical placement in half-cells: `2 * rank + |file - center|`
    pub height: u8,
    pub piece: Option<Piece>,
}

#[derive(Serialize)]
pub struct CheckInfo {
    pub white: bool,
    pub black: bool,
}

#[derive(Serialize)]
pub struct BoardInfo {
    pub files: u8,
    pub file_lengths: Vec<u8>,
    pub cells: Vec<CellInfo>,
    pub turn: Color,
    pub active: bool,
    pub pending: bool,
    pub assigned_color: Option<Color>,
    pub last_move: Option<LastMove>,
    pub in_check: CheckInfo,
    /// In check with no safe king step
    pub checkmated: CheckInfo,
}

/// Get board geometry with the current position
pub async fn get_board(State(state): State<Arc<ServerState>>) -> Json<BoardInfo> {
    let board = state.session.snapshot();

    let cells = all_positions()
        .iter()
        .map(|&pos| CellInfo {
            pos,
            file: pos.file,
            rank: pos.rank,
            height: 2 * pos.rank + pos.file.abs_diff(CENTER_FILE),
            piece: board.piece_at(pos),
        })
        .collect();

    Json(BoardInfo {
        files: FILE_COUNT,
        file_lengths: (0..FILE_COUNT).map(file_length).collect(),
        cells,
        turn: board.turn(),
        active: board.is_active(),
        pending: board.is_pending(),
        assigned_color: board.assigned_color(),
        last_move: board.last_move(),
        in_check: CheckInfo {
            white: in_check(&board, Color::White),
            black: in_check(&board, Color::Black),
        },
        checkmated: CheckInfo {
            white: is_checkmated(&board, Color::White),
            black: is_checkmated(&board, Color::Black),
        },
    })
}

/// Get the board as snapshot text
pub async fn get_snapshot(State(state): State<Arc<ServerState>>) -> String {
    state.session.dump()
}
