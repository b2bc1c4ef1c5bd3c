//! Inspection commands - print boards and destinations
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_show(), run_moves() - orchestration
//! - Level 2: load_board()
//! - Level 3: render_board(), render_destinations()
//! - Level 4: command arguments

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use glinski_core::board::{CENTER_FILE, FILE_COUNT};
use glinski_core::{in_check, is_checkmated, legal_destinations, snapshot, BoardState, Color, Position};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ShowArgs {
    /// Snapshot file to load instead of the starting layout
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,
}

#[derive(Args)]
pub struct MovesArgs {
    /// Cell holding the piece, e.g. f5
    pub pos: String,

    /// Snapshot file to load instead of the starting layout
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Skip move rules (debugging)
    #[arg(long)]
    pub unrestricted: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Print the board
pub fn run_show(args: ShowArgs) -> Result<()> {
    let board = load_board(args.snapshot.as_deref())?;
    print!("{}", render_board(&board));
    Ok(())
}

/// Print destinations for one piece
pub fn run_moves(args: MovesArgs) -> Result<()> {
    let board = load_board(args.snapshot.as_deref())?;
    let from: Position = args
        .pos
        .parse()
        .with_context(|| format!("bad position '{}'", args.pos))?;

    let config = crate::server::move_config(args.unrestricted);
    let mut destinations = legal_destinations(&board, from, config)?;
    destinations.sort();

    println!("{}", render_destinations(from, &destinations));
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Starting layout, or the occupancy from a snapshot file
fn load_board(path: Option<&Path>) -> Result<BoardState> {
    let mut board = BoardState::new();

    if let Some(path) = path {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let pieces = snapshot::load(&mut board, &text)
            .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
        tracing::debug!("Loaded {} pieces from {}", pieces, path.display());
    }

    Ok(board)
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Draw the board with files as columns and each cell at its visual height
fn render_board(board: &BoardState) -> String {
    let mut out = String::new();

    // Visual height is 2 * rank + distance from the center file
    for height in (2..=22u8).rev() {
        let mut line = String::new();
        for file in 0..FILE_COUNT {
            let offset = file.abs_diff(CENTER_FILE);
            let pos = (height >= offset + 2 && (height - offset) % 2 == 0)
                .then(|| Position::new(file, (height - offset) / 2))
                .filter(|p| p.is_valid());

            match pos.map(|p| board.piece_at(p)) {
                Some(Some(piece)) => line.push_str(&format!(" {} ", piece)),
                Some(None) => line.push_str(" .. "),
                None => line.push_str("    "),
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let letters: String = (0..FILE_COUNT)
        .map(|f| format!("  {} ", Position::new(f, 1).file_letter()))
        .collect();
    out.push_str(letters.trim_end());
    out.push('\n');

    let mut status = format!("{:?} to move", board.turn());
    for color in [Color::White, Color::Black] {
        if is_checkmated(board, color) {
            status.push_str(&format!(", {:?} checkmated", color));
        } else if in_check(board, color) {
            status.push_str(&format!(", {:?} in check", color));
        }
    }
    if !board.is_active() {
        status.push_str(", game over");
    }
    out.push_str(&status);
    out.push('\n');

    out
}

fn render_destinations(from: Position, destinations: &[Position]) -> String {
    if destinations.is_empty() {
        return format!("{}: no moves", from);
    }
    let cells: Vec<String> = destinations.iter().map(Position::to_string).collect();
    format!("{}: {}", from, cells.join(" "))
}

// ============================================================================
// TESTS
// ============================================================================
