//! Glinski Core - Hexagonal chess engine
//!
//! This crate provides the rules and state of Glinski's hexagonal chess:
//! - Board geometry (91 cells, file/rank addressing across the center seam)
//! - Pieces, the starting layout and board state
//! - Move generation, ray casting and attack detection
//! - Move application with one level of undo for peer confirmation
//! - Text protocol tokens and board snapshots
//! - A lock-guarded game session for concurrent collaborators

pub mod board;
pub mod pieces;
pub mod error;
pub mod state;
pub mod movegen;
pub mod apply;
pub mod snapshot;
pub mod protocol;
pub mod session;

// Re-exports for convenient access
pub use board::{all_positions, file_length, rank_length, Direction, Position, CELL_COUNT};
pub use pieces::{Cell, Color, Piece, PieceKind};
pub use error::{EngineError, Result};
pub use state::{BoardState, LastMove};
pub use movegen::{in_check, is_checkmated, legal_destinations, legal_moves, under_attack, MoveConfig};
pub use apply::{apply_remote_move, commit_confirmed, propose_move, rollback};
pub use protocol::{Inbound, JoinTarget, Outbound};
pub use session::{GameSession, InboundEffect, NullSink, RecordingSink, TokenSink};
