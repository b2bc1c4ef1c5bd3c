//! Board state: occupancy, piece indices, turn and sync flags

use crate::board::{all_positions, Position};
use crate::pieces::{Cell, Color, Piece, PieceKind, WHITE_ANCHORS};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// The single level of undo kept between a move and its confirmation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    pub from: Position,
    pub to: Position,
    /// Whatever stood on `to` before the move
    pub captured: Option<Piece>,
}

/// Per-game mutable state (clone for a consistent snapshot)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    /// Board: every one of the 91 cells -> occupant
    pub(crate) board: FxHashMap<Position, Option<Piece>>,

    /// Occupied cells per color, kept in step with `board`
    pub(crate) white_pieces: FxHashSet<Position>,
    pub(crate) black_pieces: FxHashSet<Position>,

    /// King positions, `None` once captured
    pub(crate) white_king: Option<Position>,
    pub(crate) black_king: Option<Position>,

    pub(crate) turn: Color,
    pub(crate) active: bool,
    pub(crate) pending_move: bool,
    pub(crate) last_move: Option<LastMove>,
    pub(crate) assigned_color: Option<Color>,
}

impl BoardState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard starting layout, White to move
    pub fn new() -> Self {
        let mut state = Self::empty();
        for (kind, pos) in WHITE_ANCHORS {
            state.put(pos, Piece::new(Color::White, kind));
            state.put(pos.reflect(), Piece::new(Color::Black, kind));
        }
        state
    }

    /// All 91 cells empty, no kings
    pub fn empty() -> Self {
        let board = all_positions().iter().map(|&pos| (pos, None)).collect();
        Self {
            board,
            white_pieces: FxHashSet::default(),
            black_pieces: FxHashSet::default(),
            white_king: None,
            black_king: None,
            turn: Color::White,
            active: true,
            pending_move: false,
            last_move: None,
            assigned_color: None,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Cell at `pos`, `None` if `pos` is off the board
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.board.get(&pos).map(|&piece| Cell { pos, piece })
    }

    /// Occupant of `pos`, `None` if empty or off the board
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.board.get(&pos).copied().flatten()
    }

    /// Positions occupied by a color
    pub fn pieces(&self, color: Color) -> &FxHashSet<Position> {
        match color {
            Color::White => &self.white_pieces,
            Color::Black => &self.black_pieces,
        }
    }

    /// Iterate occupied cells, for rendering
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.board
            .iter()
            .filter_map(|(&pos, &piece)| piece.map(|p| (pos, p)))
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    /// Color to move
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// False once a king has been captured
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True while a local move awaits the peer's answer
    pub fn is_pending(&self) -> bool {
        self.pending_move
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    /// Color this instance plays, set by the handshake
    pub fn assigned_color(&self) -> Option<Color> {
        self.assigned_color
    }

    pub fn set_assigned_color(&mut self, color: Color) {
        self.assigned_color = Some(color);
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Number of pieces of each kind for a color
    pub fn piece_counts(&self, color: Color) -> FxHashMap<PieceKind, usize> {
        let mut counts = FxHashMap::default();
        for pos in self.pieces(color) {
            if let Some(piece) = self.piece_at(*pos) {
                *counts.entry(piece.kind).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Check the derived indices against the occupancy map
    pub fn is_consistent(&self) -> bool {
        if self.board.len() != all_positions().len() {
            return false;
        }

        for color in [Color::White, Color::Black] {
            let expected: FxHashSet<Position> = self
                .occupied()
                .filter(|(_, p)| p.color == color)
                .map(|(pos, _)| pos)
                .collect();
            if &expected != self.pieces(color) {
                return false;
            }

            let king = self.king_position(color);
            let on_board = self
                .occupied()
                .find(|(_, p)| p.color == color && p.is_king())
                .map(|(pos, _)| pos);
            if king.is_some() && king != on_board {
                return false;
            }
        }

        true
    }

    // ========================================================================
    // CELL MUTATION (indices follow the occupancy)
    // ========================================================================

    /// Place a piece on an empty cell
    pub(crate) fn put(&mut self, pos: Position, piece: Piece) {
        self.board.insert(pos, Some(piece));
        self.index_mut(piece.color).insert(pos);
        if piece.is_king() {
            *self.king_mut(piece.color) = Some(pos);
        }
    }

    /// Empty a cell, returning what stood there
    pub(crate) fn take(&mut self, pos: Position) -> Option<Piece> {
        let piece = self.board.get_mut(&pos).and_then(Option::take)?;
        self.index_mut(piece.color).remove(&pos);
        if piece.is_king() && self.king_position(piece.color) == Some(pos) {
            *self.king_mut(piece.color) = None;
        }
        Some(piece)
    }

    /// Empty every cell and drop both indices and king caches
    pub(crate) fn clear(&mut self) {
        for piece in self.board.values_mut() {
            *piece = None;
        }
        self.white_pieces.clear();
        self.black_pieces.clear();
        self.white_king = None;
        self.black_king = None;
    }

    fn index_mut(&mut self, color: Color) -> &mut FxHashSet<Position> {
        match color {
            Color::White => &mut self.white_pieces,
            Color::Black => &mut self.black_pieces,
        }
    }

    fn king_mut(&mut self, color: Color) -> &mut Option<Position> {
        match color {
            Color::White => &mut self.white_king,
            Color::Black => &mut self.black_king,
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}
