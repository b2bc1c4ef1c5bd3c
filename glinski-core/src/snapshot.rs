//! Textual board snapshots
//!
//! One piece per line, `<color><kind> <pos>`:
//!
//! ```text
//! WK f1
//! BQ e10
//! ```
//!
//! Cells not listed are empty. Blank lines are ignored.

use crate::board::Position;
use crate::error::{EngineError, Result};
use crate::pieces::{Color, Piece, PieceKind};
use crate::state::BoardState;
use rustc_hash::FxHashSet;

/// Replace the board's occupancy with the snapshot in `text`.
///
/// The whole text is validated first; on error the state is untouched.
/// Returns the number of pieces placed.
pub fn load(state: &mut BoardState, text: &str) -> Result<usize> {
    let placements = parse(text)?;

    state.clear();
    for &(pos, piece) in &placements {
        state.put(pos, piece);
    }

    state.pending_move = false;
    state.last_move = None;
    state.active = state.white_king.is_some() && state.black_king.is_some();

    tracing::info!(pieces = placements.len(), active = state.active, "loaded snapshot");
    Ok(placements.len())
}

/// Render the occupancy in the format [`load`] reads.
///
/// White before Black, then by file, then by rank.
pub fn dump(state: &BoardState) -> String {
    let mut pieces: Vec<(Position, Piece)> = state.occupied().collect();
    pieces.sort_by_key(|&(pos, piece)| (piece.color, pos.file, pos.rank));

    let mut out = String::new();
    for (pos, piece) in pieces {
        out.push_str(&format!("{}{} {}\n", piece.color.letter(), piece.kind.letter(), pos));
    }
    out
}

fn parse(text: &str) -> Result<Vec<(Position, Piece)>> {
    let mut placements = Vec::new();
    let mut seen = FxHashSet::default();
    let mut kings = FxHashSet::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (pos, piece) = parse_line(line)?;

        if !seen.insert(pos) {
            return Err(malformed(line, "cell listed twice"));
        }
        if piece.is_king() && !kings.insert(piece.color) {
            return Err(malformed(line, "second king for one color"));
        }
        placements.push((pos, piece));
    }

    Ok(placements)
}

fn parse_line(line: &str) -> Result<(Position, Piece)> {
    let mut parts = line.split_whitespace();
    let (Some(tag), Some(square), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed(line, "expected '<color><kind> <pos>'"));
    };

    let mut letters = tag.chars();
    let (Some(c), Some(k), None) = (letters.next(), letters.next(), letters.next()) else {
        return Err(malformed(line, "piece tag must be two letters"));
    };
    let color = Color::from_letter(c).ok_or_else(|| malformed(line, "unknown color letter"))?;
    let kind = PieceKind::from_letter(k).ok_or_else(|| malformed(line, "unknown piece letter"))?;

    let pos: Position = square
        .parse()
        .map_err(|e: crate::board::ParsePositionError| malformed(line, &e.to_string()))?;

    Ok((pos, Piece::new(color, kind)))
}

fn malformed(line: &str, reason: &str) -> EngineError {
    EngineError::MalformedLine {
        line: line.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn test_load_two_kings() {
        let mut state = BoardState::new();
        assert_eq!(load(&mut state, "WK f6\nBK f10"), Ok(2));

        assert_eq!(state.occupied().count(), 2);
        assert_eq!(state.king_position(Color::White), Some(pos("f6")));
        assert_eq!(state.king_position(Color::Black), Some(pos("f10")));
        assert!(state.is_active());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_load_without_king_ends_game() {
        let mut state = BoardState::new();
        load(&mut state, "WK f6\n\nBQ a1\n").unwrap();
        assert_eq!(state.king_position(Color::Black), None);
        assert!(!state.is_active());
    }

    #[test]
    fn test_load_clears_pending_keeps_turn() {
        let mut state = BoardState::new();
        crate::apply::propose_move(&mut state, pos("f5"), pos("f6")).unwrap();
        load(&mut state, "WK f1\nBK f10").unwrap();
        assert!(!state.is_pending());
        assert_eq!(state.last_move(), None);
        assert_eq!(state.turn(), Color::Black);
    }

    #[test]
    fn test_malformed_lines_leave_state() {
        let original = BoardState::new();
        for bad in ["WK", "XK f6", "WZ f6", "WK z6", "WK a7", "WKK f6", "WK f6 f7", "WK f6\nWK f7", "WQ f6\nBQ f6"] {
            let mut state = original.clone();
            let err = load(&mut state, bad).unwrap_err();
            assert!(matches!(err, EngineError::MalformedLine { .. }), "{bad}: {err:?}");
            assert_eq!(state, original, "{bad}");
        }
    }

    #[test]
    fn test_dump_order_and_reload() {
        let state = BoardState::new();
        let text = dump(&state);
        assert_eq!(text.lines().count(), 36);
        assert_eq!(text.lines().next(), Some("WP b1"));
        assert_eq!(text.lines().last(), Some("BP j7"));

        let mut reloaded = BoardState::empty();
        load(&mut reloaded, &text).unwrap();
        assert_eq!(reloaded, state);
    }
}
