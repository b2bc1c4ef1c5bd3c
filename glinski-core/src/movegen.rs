//! Move generation: per-piece destinations, ray casting and attack detection

use crate::board::{all_positions, Direction, Position, CENTER_FILE};
use crate::error::{EngineError, Result};
use crate::pieces::{Color, Piece, PieceKind};
use crate::state::BoardState;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Environment variable that turns on unrestricted moves
pub const UNRESTRICTED_ENV: &str = "GLINSKI_UNRESTRICTED";

/// Knight jumps, written from the center file like [`Direction`] offsets
const KNIGHT_OFFSETS: [(i8, i8); 12] = [
    (-3, -1),
    (-3, -2),
    (-2, 1),
    (-2, -3),
    (-1, 2),
    (-1, -3),
    (1, 2),
    (1, -3),
    (2, 1),
    (2, -3),
    (3, -1),
    (3, -2),
];

/// Rank White pawns start from on each file
fn white_pawn_start(file: u8) -> u8 {
    5u8.saturating_sub(file.abs_diff(CENTER_FILE))
}

const BLACK_PAWN_START: u8 = 7;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Move generation settings, passed explicitly to every query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveConfig {
    /// Debug mode: any piece may go to any other cell
    pub unrestricted: bool,
}

impl MoveConfig {
    pub const RESTRICTED: MoveConfig = MoveConfig { unrestricted: false };
    pub const UNRESTRICTED: MoveConfig = MoveConfig { unrestricted: true };

    /// Rules enforced unless `GLINSKI_UNRESTRICTED` is `1` or `true`
    pub fn from_env() -> Self {
        let unrestricted = std::env::var(UNRESTRICTED_ENV)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self { unrestricted }
    }
}

// ============================================================================
// PUBLIC QUERIES
// ============================================================================

/// Destinations for the piece on `pos`
pub fn legal_destinations(state: &BoardState, pos: Position, config: MoveConfig) -> Result<Vec<Position>> {
    let piece = state.piece_at(pos).ok_or(EngineError::InvalidQuery(pos))?;

    if config.unrestricted {
        return Ok(all_positions().iter().copied().filter(|&p| p != pos).collect());
    }

    let mut moves = Vec::new();
    match piece.kind {
        PieceKind::King => king_moves(state, pos, piece.color, &mut moves),
        _ => reach(state, pos, piece, &mut moves),
    }
    tracing::trace!(%pos, count = moves.len(), "generated destinations");
    Ok(moves)
}

/// Is `pos` reachable by any piece of `defender`'s opponent?
pub fn under_attack(state: &BoardState, pos: Position, defender: Color) -> Result<bool> {
    if !pos.is_valid() {
        return Err(EngineError::InvalidQuery(pos));
    }
    Ok(is_attacked(state, pos, defender, None))
}

/// Is `color`'s king attacked? False when the king is gone.
pub fn in_check(state: &BoardState, color: Color) -> bool {
    state
        .king_position(color)
        .is_some_and(|king| is_attacked(state, king, color, None))
}

/// `color` is in check and its king has no safe step.
///
/// Only the king's own moves are considered; blocking or capturing the
/// attacker with another piece does not lift it.
pub fn is_checkmated(state: &BoardState, color: Color) -> bool {
    let Some(king) = state.king_position(color) else {
        return false;
    };
    if !is_attacked(state, king, color, None) {
        return false;
    }

    let mut escapes = Vec::with_capacity(6);
    king_moves(state, king, color, &mut escapes);
    escapes.is_empty()
}

/// Every (from, to) pair available to `color`
pub fn legal_moves(state: &BoardState, color: Color, config: MoveConfig) -> Vec<(Position, Position)> {
    let mut from_cells: Vec<Position> = state.pieces(color).iter().copied().collect();
    from_cells.sort();

    let mut moves = Vec::new();
    for from in from_cells {
        if let Ok(dests) = legal_destinations(state, from, config) {
            moves.extend(dests.into_iter().map(|to| (from, to)));
        }
    }
    moves
}

// ============================================================================
// PIECE RULES
// ============================================================================

/// Cells the piece could move to, with kings taking plain adjacency.
///
/// This is what attack detection asks of every enemy piece, so it never
/// recurses into king filtering.
fn reach(state: &BoardState, pos: Position, piece: Piece, moves: &mut Vec<Position>) {
    match piece.kind {
        PieceKind::King => king_steps(state, pos, piece.color, moves),
        PieceKind::Queen => cast_rays(state, pos, piece.color, &Direction::ALL, moves),
        PieceKind::Rook => cast_rays(state, pos, piece.color, &Direction::ORTHOGONAL, moves),
        PieceKind::Bishop => cast_rays(state, pos, piece.color, &Direction::DIAGONAL, moves),
        PieceKind::Knight => knight_moves(state, pos, piece.color, moves),
        PieceKind::Pawn => pawn_moves(state, pos, piece.color, moves),
    }
}

fn king_moves(state: &BoardState, pos: Position, color: Color, moves: &mut Vec<Position>) {
    let mut steps = Vec::with_capacity(6);
    king_steps(state, pos, color, &mut steps);
    // The king's own cell is vacated by the move
    moves.extend(
        steps
            .into_iter()
            .filter(|&dest| !is_attacked(state, dest, color, Some(pos))),
    );
}

fn king_steps(state: &BoardState, pos: Position, color: Color, moves: &mut Vec<Position>) {
    for direction in Direction::ORTHOGONAL {
        if let Some(dest) = pos.step(direction) {
            if can_land(state, dest, color) {
                moves.push(dest);
            }
        }
    }
}

fn knight_moves(state: &BoardState, pos: Position, color: Color, moves: &mut Vec<Position>) {
    for offset in KNIGHT_OFFSETS {
        if let Some(dest) = pos.resolve_neighbor(offset) {
            if can_land(state, dest, color) {
                moves.push(dest);
            }
        }
    }
}

fn pawn_moves(state: &BoardState, pos: Position, color: Color, moves: &mut Vec<Position>) {
    let (forward, captures, on_start) = match color {
        Color::White => (
            Direction::Up,
            [Direction::UpLeft, Direction::UpRight],
            pos.rank == white_pawn_start(pos.file),
        ),
        Color::Black => (
            Direction::Down,
            [Direction::DownLeft, Direction::DownRight],
            pos.rank == BLACK_PAWN_START,
        ),
    };

    let one = pos.step(forward);
    if let Some(one) = one.filter(|&p| state.piece_at(p).is_none()) {
        moves.push(one);
    }
    // The double step only needs an empty landing cell; it may jump a piece
    if on_start {
        if let Some(two) = one
            .and_then(|p| p.step(forward))
            .filter(|&p| state.piece_at(p).is_none())
        {
            moves.push(two);
        }
    }

    for direction in captures {
        if let Some(dest) = pos.step(direction) {
            if state.piece_at(dest).is_some_and(|p| p.color != color) {
                moves.push(dest);
            }
        }
    }
}

// ============================================================================
// RAY CASTING
// ============================================================================

fn cast_rays(
    state: &BoardState,
    pos: Position,
    color: Color,
    directions: &[Direction],
    moves: &mut Vec<Position>,
) {
    for &direction in directions {
        cast_ray(state, pos, color, direction, None, moves);
    }
}

/// Walk one direction until the edge or the first occupied cell.
///
/// `vacated` is treated as empty, so a king is not shielded by itself.
fn cast_ray(
    state: &BoardState,
    pos: Position,
    color: Color,
    direction: Direction,
    vacated: Option<Position>,
    moves: &mut Vec<Position>,
) {
    let mut current = pos;
    while let Some(next) = current.step(direction) {
        current = next;
        let occupant = if vacated == Some(current) { None } else { state.piece_at(current) };
        match occupant {
            None => moves.push(current),
            Some(piece) => {
                if piece.color != color {
                    moves.push(current);
                }
                break; // Blocked
            }
        }
    }
}

fn can_land(state: &BoardState, dest: Position, color: Color) -> bool {
    state.piece_at(dest).map_or(true, |p| p.color != color)
}

// ============================================================================
// ATTACK DETECTION
// ============================================================================

/// Does any opponent of `defender` reach `target`?
fn is_attacked(state: &BoardState, target: Position, defender: Color, vacated: Option<Position>) -> bool {
    let attacker = defender.opponent();
    state.pieces(attacker).iter().any(|&from| {
        let Some(piece) = state.piece_at(from) else {
            return false;
        };
        attacks(state, from, piece, target, vacated)
    })
}

fn attacks(state: &BoardState, from: Position, piece: Piece, target: Position, vacated: Option<Position>) -> bool {
    let directions: &[Direction] = match piece.kind {
        PieceKind::Queen => &Direction::ALL,
        PieceKind::Rook => &Direction::ORTHOGONAL,
        PieceKind::Bishop => &Direction::DIAGONAL,
        _ => {
            let mut reachable = Vec::new();
            reach(state, from, piece, &mut reachable);
            return reachable.contains(&target);
        }
    };

    let mut ray = Vec::new();
    for &direction in directions {
        cast_ray(state, from, piece.color, direction, vacated, &mut ray);
    }
    ray.contains(&target)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn board_with(pieces: &[(&str, Color, PieceKind)]) -> BoardState {
        let mut state = BoardState::empty();
        for &(at, color, kind) in pieces {
            state.put(pos(at), Piece::new(color, kind));
        }
        state
    }

    fn dests(state: &BoardState, at: &str) -> Vec<Position> {
        let mut d = legal_destinations(state, pos(at), MoveConfig::RESTRICTED).unwrap();
        d.sort();
        d
    }

    #[test]
    fn test_empty_cell_is_invalid_query() {
        let state = BoardState::new();
        assert_eq!(
            legal_destinations(&state, pos("f6"), MoveConfig::RESTRICTED),
            Err(EngineError::InvalidQuery(pos("f6")))
        );
    }

    #[test]
    fn test_unrestricted_reaches_everything() {
        let state = BoardState::new();
        let d = legal_destinations(&state, pos("f1"), MoveConfig::UNRESTRICTED).unwrap();
        assert_eq!(d.len(), 90);
        assert!(!d.contains(&pos("f1")));
    }

    #[test]
    fn test_default_config_is_restricted() {
        assert!(!MoveConfig::default().unrestricted);
    }

    #[test]
    fn test_rook_from_center() {
        let state = board_with(&[("f6", Color::White, PieceKind::Rook)]);
        // 10 along the file plus four side rays of 5 cells each
        assert_eq!(dests(&state, "f6").len(), 30);
    }

    #[test]
    fn test_bishop_from_center() {
        let state = board_with(&[("f6", Color::White, PieceKind::Bishop)]);
        let d = dests(&state, "f6");
        assert_eq!(d.len(), 12);
        assert!(d.contains(&pos("e7")));
        assert!(d.contains(&pos("d8")));
        assert!(d.contains(&pos("d5")));
        assert!(d.contains(&pos("j4")));
        assert!(d.contains(&pos("e4")));
        assert!(d.contains(&pos("h2")));
        assert!(!d.contains(&pos("f7")));
    }

    #[test]
    fn test_bishop_ray_crosses_seam() {
        let state = board_with(&[("e3", Color::White, PieceKind::Bishop)]);
        let d = dests(&state, "e3");
        assert!(d.contains(&pos("f5")));
        assert!(d.contains(&pos("g6")));
        assert!(d.contains(&pos("h7")));
        assert!(d.contains(&pos("g3")));
        assert!(d.contains(&pos("i2")));
    }

    #[test]
    fn test_ray_stops_at_first_piece() {
        let state = board_with(&[
            ("f6", Color::White, PieceKind::Rook),
            ("f8", Color::Black, PieceKind::Pawn),
            ("f4", Color::White, PieceKind::Pawn),
        ]);
        let d = dests(&state, "f6");
        assert!(d.contains(&pos("f7")));
        assert!(d.contains(&pos("f8")));
        assert!(!d.contains(&pos("f9")));
        assert!(d.contains(&pos("f5")));
        assert!(!d.contains(&pos("f4")));
        assert!(!d.contains(&pos("f3")));
    }

    #[test]
    fn test_knight_jumps() {
        let state = board_with(&[("f6", Color::White, PieceKind::Knight)]);
        let d = dests(&state, "f6");
        assert_eq!(d.len(), 12);
        assert!(d.contains(&pos("e8")));
        assert!(d.contains(&pos("c5")));
        assert!(d.contains(&pos("i5")));
    }

    #[test]
    fn test_knight_skips_own_pieces() {
        let state = board_with(&[
            ("f6", Color::White, PieceKind::Knight),
            ("e8", Color::White, PieceKind::Pawn),
            ("g8", Color::Black, PieceKind::Pawn),
        ]);
        let d = dests(&state, "f6");
        assert!(!d.contains(&pos("e8")));
        assert!(d.contains(&pos("g8")));
    }

    #[test]
    fn test_white_pawn_openings() {
        let state = BoardState::new();
        // f7 holds a black pawn, so no double step from the center
        assert_eq!(dests(&state, "f5"), vec![pos("f6")]);
        assert_eq!(dests(&state, "b1"), vec![pos("b2"), pos("b3")]);
        assert_eq!(dests(&state, "e4"), vec![pos("e5"), pos("e6")]);
    }

    #[test]
    fn test_black_pawn_openings() {
        let state = BoardState::new();
        assert_eq!(dests(&state, "f7"), vec![pos("f6")]);
        assert_eq!(dests(&state, "b7"), vec![pos("b5"), pos("b6")]);
    }

    #[test]
    fn test_pawn_two_step_jumps_blocker() {
        let state = board_with(&[
            ("g1", Color::White, PieceKind::King),
            ("g10", Color::Black, PieceKind::King),
            ("e4", Color::White, PieceKind::Pawn),
            ("e5", Color::Black, PieceKind::Knight),
        ]);
        assert_eq!(dests(&state, "e4"), vec![pos("e6")]);

        let state = board_with(&[
            ("e4", Color::White, PieceKind::Pawn),
            ("e6", Color::Black, PieceKind::Knight),
        ]);
        assert_eq!(dests(&state, "e4"), vec![pos("e5")]);
    }

    #[test]
    fn test_pawn_captures() {
        let state = board_with(&[
            ("f6", Color::White, PieceKind::Pawn),
            ("e6", Color::Black, PieceKind::Rook),
            ("g6", Color::White, PieceKind::Rook),
            ("f7", Color::Black, PieceKind::Pawn),
        ]);
        assert_eq!(dests(&state, "f6"), vec![pos("e6")]);
        // Black captures down-left / down-right
        assert_eq!(dests(&state, "f7"), vec![pos("g6")]);
    }

    #[test]
    fn test_king_avoids_attacked_cells() {
        let state = board_with(&[
            ("f6", Color::White, PieceKind::King),
            ("a5", Color::Black, PieceKind::Rook),
        ]);
        let d = dests(&state, "f6");
        // e5 and f5 lie on the rook's down-right ray through b5
        assert!(!d.contains(&pos("e5")));
        assert!(!d.contains(&pos("f5")));
        assert_eq!(d.len(), 4);
    }

    #[test]
    fn test_king_cannot_retreat_along_attack_ray() {
        let state = board_with(&[
            ("f5", Color::White, PieceKind::King),
            ("f10", Color::Black, PieceKind::Rook),
        ]);
        let d = dests(&state, "f5");
        assert!(!d.contains(&pos("f4")));
        assert!(!d.contains(&pos("f6")));
    }

    #[test]
    fn test_facing_kings_do_not_recurse() {
        let state = board_with(&[
            ("f6", Color::White, PieceKind::King),
            ("f8", Color::Black, PieceKind::King),
        ]);
        let d = dests(&state, "f6");
        assert!(!d.contains(&pos("f7")));
        assert!(d.contains(&pos("f5")));
    }

    #[test]
    fn test_in_check() {
        let state = board_with(&[
            ("f1", Color::White, PieceKind::King),
            ("f9", Color::Black, PieceKind::Queen),
        ]);
        assert!(in_check(&state, Color::White));
        assert!(!in_check(&state, Color::Black));
        assert_eq!(under_attack(&state, pos("f2"), Color::White), Ok(true));
        assert_eq!(
            under_attack(&state, Position::new(0, 9), Color::White),
            Err(EngineError::InvalidQuery(Position::new(0, 9)))
        );
    }

    #[test]
    fn test_boxed_in_king_is_checkmated() {
        let mut pieces = vec![
            ("a1", Color::White, PieceKind::King),
            ("a6", Color::Black, PieceKind::Rook),
            ("f10", Color::Black, PieceKind::King),
        ];
        let state = board_with(&pieces);
        // b1 and b2 are still open
        assert!(in_check(&state, Color::White));
        assert!(!is_checkmated(&state, Color::White));

        pieces.push(("b7", Color::Black, PieceKind::Rook));
        let state = board_with(&pieces);
        assert!(dests(&state, "a1").is_empty());
        assert!(is_checkmated(&state, Color::White));
        assert!(!is_checkmated(&state, Color::Black));
    }

    #[test]
    fn test_no_checkmate_without_check_or_king() {
        let state = board_with(&[
            ("a1", Color::White, PieceKind::King),
            ("b7", Color::Black, PieceKind::Rook),
            ("c8", Color::Black, PieceKind::Rook),
        ]);
        assert!(!in_check(&state, Color::White));
        assert!(!is_checkmated(&state, Color::White));
        assert!(!is_checkmated(&state, Color::Black));
    }

    #[test]
    fn test_opening_moves() {
        let state = BoardState::new();
        let moves = legal_moves(&state, Color::White, MoveConfig::RESTRICTED);
        assert!(moves.contains(&(pos("f5"), pos("f6"))));
        assert!(moves.iter().all(|(from, _)| state.pieces(Color::White).contains(from)));
    }
}
