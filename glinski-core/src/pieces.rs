//! Piece kinds, colors and the standard starting layout

use crate::board::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Snapshot letter (W/B)
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'W' => Some(Color::White),
            'B' => Some(Color::Black),
            _ => None,
        }
    }
}

/// Piece kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Pawn,
    ];

    /// Snapshot letter (K/Q/R/B/N/P)
    pub fn letter(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Pawn => 'P',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        PieceKind::ALL.into_iter().find(|k| k.letter() == c)
    }
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.letter(), self.kind.letter())
    }
}

/// A cell and its occupant. An empty cell has neither color nor kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub pos: Position,
    pub piece: Option<Piece>,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }

    pub fn color(&self) -> Option<Color> {
        self.piece.map(|p| p.color)
    }

    pub fn kind(&self) -> Option<PieceKind> {
        self.piece.map(|p| p.kind)
    }
}

/// White's starting cells; Black starts on the reflection of each
pub const WHITE_ANCHORS: [(PieceKind, Position); 18] = [
    (PieceKind::King, Position::new(6, 1)),
    (PieceKind::Queen, Position::new(4, 1)),
    (PieceKind::Rook, Position::new(2, 1)),
    (PieceKind::Rook, Position::new(8, 1)),
    (PieceKind::Bishop, Position::new(5, 1)),
    (PieceKind::Bishop, Position::new(5, 2)),
    (PieceKind::Bishop, Position::new(5, 3)),
    (PieceKind::Knight, Position::new(3, 1)),
    (PieceKind::Knight, Position::new(7, 1)),
    (PieceKind::Pawn, Position::new(1, 1)),
    (PieceKind::Pawn, Position::new(2, 2)),
    (PieceKind::Pawn, Position::new(3, 3)),
    (PieceKind::Pawn, Position::new(4, 4)),
    (PieceKind::Pawn, Position::new(5, 5)),
    (PieceKind::Pawn, Position::new(6, 4)),
    (PieceKind::Pawn, Position::new(7, 3)),
    (PieceKind::Pawn, Position::new(8, 2)),
    (PieceKind::Pawn, Position::new(9, 1)),
];
