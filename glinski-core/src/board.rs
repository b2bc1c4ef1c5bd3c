//! Board geometry for the 91-cell Gliński hexagon
//!
//! Cells are addressed by `(file, rank)`: eleven files `a..k` (0..=10) whose
//! lengths grow towards the center file `f` (5) and shrink again past it.
//! Rank 1 is the bottom cell of every file, so the rank index of two
//! neighbouring cells depends on which side of the center file they sit.
//! [`Position::resolve_neighbor`] hides that seam behind a single formula.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of files (a..k)
pub const FILE_COUNT: u8 = 11;

/// Center file (f), where the rank numbering changes slope
pub const CENTER_FILE: u8 = 5;

/// Total number of cells on the board
pub const CELL_COUNT: usize = 91;

/// File letters indexed by file number
pub const FILE_LETTERS: &[u8; 11] = b"abcdefghijk";

const FILE_LENGTHS: [u8; 11] = [6, 7, 8, 9, 10, 11, 10, 9, 8, 7, 6];
const RANK_LENGTHS: [u8; 11] = [11, 11, 11, 11, 11, 11, 9, 7, 5, 3, 1];

/// Number of cells in a file, 0 for files off the board
pub fn file_length(file: u8) -> u8 {
    FILE_LENGTHS.get(file as usize).copied().unwrap_or(0)
}

/// Number of cells in a rank, 0 for ranks off the board
pub fn rank_length(rank: u8) -> u8 {
    if rank == 0 {
        return 0;
    }
    RANK_LENGTHS.get(rank as usize - 1).copied().unwrap_or(0)
}

/// A cell address
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Position {
    pub file: u8,
    pub rank: u8,
}

impl Position {
    pub const fn new(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    /// Check if this position is one of the 91 cells
    pub fn is_valid(&self) -> bool {
        self.rank >= 1 && self.rank <= file_length(self.file)
    }

    /// Same check expressed through rank widths (centered on file f)
    pub fn is_valid_by_rank(&self) -> bool {
        let width = rank_length(self.rank);
        width > 0 && self.file.abs_diff(CENTER_FILE) <= (width - 1) / 2
    }

    /// Mirror a cell within its own file: rank r maps to `len - r + 1`
    pub fn reflect(&self) -> Position {
        Position::new(self.file, (file_length(self.file) + 1).saturating_sub(self.rank))
    }

    /// Resolve an offset written as if `self` sat on the center file.
    ///
    /// On the center file the six adjacent cells are `(0, ±1)`, `(±1, 0)`
    /// and `(±1, -1)`. Everywhere else the same offsets describe the same
    /// geometric step; the rank correction is the difference in distance to
    /// the seam before and after the step, halved. Returns `None` when the
    /// target falls off the board.
    pub fn resolve_neighbor(&self, offset: (i8, i8)) -> Option<Position> {
        let (df, dr) = offset;
        let file = self.file as i8 + df;
        if !(0..FILE_COUNT as i8).contains(&file) {
            return None;
        }

        let center = CENTER_FILE as i8;
        let seam_before = (self.file as i8 - center).abs();
        let seam_after = (file - center).abs();
        let rank = self.rank as i8 + dr + (seam_before + df.abs() - seam_after) / 2;
        if rank < 1 {
            return None;
        }

        let target = Position::new(file as u8, rank as u8);
        target.is_valid().then_some(target)
    }

    /// One step along a ray direction
    pub fn step(&self, direction: Direction) -> Option<Position> {
        self.resolve_neighbor(direction.offset())
    }

    /// File letter (a..k)
    pub fn file_letter(&self) -> char {
        FILE_LETTERS.get(self.file as usize).map(|&b| b as char).unwrap_or('?')
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_letter(), self.rank)
    }
}

/// Failure to read a position from algebraic text
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParsePositionError {
    #[error("empty position")]
    Empty,

    #[error("unknown file letter '{0}'")]
    UnknownFile(char),

    #[error("bad rank in '{0}'")]
    BadRank(String),

    #[error("{0} is not on the board")]
    OffBoard(String),
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(ParsePositionError::Empty)?;
        let file = FILE_LETTERS
            .iter()
            .position(|&b| b as char == letter)
            .ok_or(ParsePositionError::UnknownFile(letter))? as u8;

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParsePositionError::BadRank(s.to_string()));
        }
        let rank: u8 = digits
            .parse()
            .map_err(|_| ParsePositionError::BadRank(s.to_string()))?;

        let pos = Position::new(file, rank);
        if !pos.is_valid() {
            return Err(ParsePositionError::OffBoard(s.to_string()));
        }
        Ok(pos)
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> Self {
        pos.to_string()
    }
}

impl TryFrom<String> for Position {
    type Error = ParsePositionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// All 91 cells, file by file
pub static ALL_POSITIONS: [Position; CELL_COUNT] = build_all_positions();

const fn build_all_positions() -> [Position; CELL_COUNT] {
    let mut out = [Position::new(0, 0); CELL_COUNT];
    let mut i = 0;
    let mut file = 0;
    while file < FILE_COUNT {
        let mut rank = 1;
        while rank <= FILE_LENGTHS[file as usize] {
            out[i] = Position::new(file, rank);
            i += 1;
            rank += 1;
        }
        file += 1;
    }
    out
}

/// Every cell on the board
pub fn all_positions() -> &'static [Position] {
    &ALL_POSITIONS
}

/// The twelve ray directions
///
/// Offsets are relative to a cell on the center file (see
/// [`Position::resolve_neighbor`]), so one table serves the whole board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    // Orthogonal: through a shared edge
    Up,
    Down,
    UpLeft,
    DownLeft,
    UpRight,
    DownRight,
    // Diagonal: between two edges
    DiagUpLeft,
    DiagUpRight,
    Left,
    Right,
    DiagDownLeft,
    DiagDownRight,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::UpLeft,
        Direction::DownLeft,
        Direction::UpRight,
        Direction::DownRight,
    ];

    pub const DIAGONAL: [Direction; 6] = [
        Direction::DiagUpLeft,
        Direction::DiagUpRight,
        Direction::Left,
        Direction::Right,
        Direction::DiagDownLeft,
        Direction::DiagDownRight,
    ];

    pub const ALL: [Direction; 12] = [
        Direction::Up,
        Direction::Down,
        Direction::UpLeft,
        Direction::DownLeft,
        Direction::UpRight,
        Direction::DownRight,
        Direction::DiagUpLeft,
        Direction::DiagUpRight,
        Direction::Left,
        Direction::Right,
        Direction::DiagDownLeft,
        Direction::DiagDownRight,
    ];

    /// Step as (file delta, rank delta) seen from the center file
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::UpLeft => (-1, 0),
            Direction::DownLeft => (-1, -1),
            Direction::UpRight => (1, 0),
            Direction::DownRight => (1, -1),
            Direction::DiagUpLeft => (-1, 1),
            Direction::DiagUpRight => (1, 1),
            Direction::Left => (-2, -1),
            Direction::Right => (2, -1),
            Direction::DiagDownLeft => (-1, -2),
            Direction::DiagDownRight => (1, -2),
        }
    }

    pub fn is_orthogonal(self) -> bool {
        Self::ORTHOGONAL.contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn test_cell_count() {
        assert_eq!(all_positions().len(), 91);
        let unique: std::collections::HashSet<_> = all_positions().iter().collect();
        assert_eq!(unique.len(), 91);
    }

    #[test]
    fn test_file_and_rank_bounds_agree() {
        for file in 0..=12u8 {
            for rank in 0..=12u8 {
                let p = Position::new(file, rank);
                assert_eq!(p.is_valid(), p.is_valid_by_rank(), "{:?}", p);
            }
        }
    }

    #[test]
    fn test_lengths() {
        assert_eq!(file_length(0), 6);
        assert_eq!(file_length(5), 11);
        assert_eq!(file_length(11), 0);
        assert_eq!(rank_length(1), 11);
        assert_eq!(rank_length(11), 1);
        assert_eq!(rank_length(0), 0);
    }

    #[test]
    fn test_algebraic() {
        assert_eq!(pos("f6"), Position::new(5, 6));
        assert_eq!(pos("a1").to_string(), "a1");
        assert_eq!(pos("f11").to_string(), "f11");
        assert_eq!("a7".parse::<Position>(), Err(ParsePositionError::OffBoard("a7".into())));
        assert_eq!("z1".parse::<Position>(), Err(ParsePositionError::UnknownFile('z')));
        assert!("f".parse::<Position>().is_err());
        assert!("f-1".parse::<Position>().is_err());
    }

    #[test]
    fn test_reflect() {
        assert_eq!(Position::new(6, 1).reflect(), Position::new(6, 10));
        assert_eq!(Position::new(5, 5).reflect(), Position::new(5, 7));
        for &p in all_positions() {
            assert!(p.reflect().is_valid());
            assert_eq!(p.reflect().reflect(), p);
        }
    }

    #[test]
    fn test_neighbors_on_each_side() {
        // Left of the seam, files slope one way...
        let c3 = pos("c3");
        assert_eq!(c3.step(Direction::UpRight), Some(pos("d4")));
        assert_eq!(c3.step(Direction::DownRight), Some(pos("d3")));
        assert_eq!(c3.step(Direction::UpLeft), Some(pos("b3")));
        assert_eq!(c3.step(Direction::DownLeft), Some(pos("b2")));
        // ...and the opposite way on the right
        let i3 = pos("i3");
        assert_eq!(i3.step(Direction::UpLeft), Some(pos("h4")));
        assert_eq!(i3.step(Direction::DownLeft), Some(pos("h3")));
        assert_eq!(i3.step(Direction::UpRight), Some(pos("j3")));
        assert_eq!(i3.step(Direction::DownRight), Some(pos("j2")));
        // On the seam both sides drop a rank
        let f6 = pos("f6");
        assert_eq!(f6.step(Direction::UpLeft), Some(pos("e6")));
        assert_eq!(f6.step(Direction::DownLeft), Some(pos("e5")));
        assert_eq!(f6.step(Direction::UpRight), Some(pos("g6")));
        assert_eq!(f6.step(Direction::DownRight), Some(pos("g5")));
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let opposite = |d: Direction| match d {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::UpLeft => Direction::DownRight,
            Direction::DownRight => Direction::UpLeft,
            Direction::UpRight => Direction::DownLeft,
            Direction::DownLeft => Direction::UpRight,
            Direction::DiagUpLeft => Direction::DiagDownRight,
            Direction::DiagDownRight => Direction::DiagUpLeft,
            Direction::DiagUpRight => Direction::DiagDownLeft,
            Direction::DiagDownLeft => Direction::DiagUpRight,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        };
        for &p in all_positions() {
            for d in Direction::ALL {
                if let Some(n) = p.step(d) {
                    assert_eq!(n.step(opposite(d)), Some(p), "{} {:?}", p, d);
                }
            }
        }
    }

    #[test]
    fn test_diagonal_crosses_seam() {
        assert_eq!(pos("e3").step(Direction::DiagUpRight), Some(pos("f5")));
        assert_eq!(pos("f5").step(Direction::DiagUpRight), Some(pos("g6")));
        assert_eq!(pos("e3").step(Direction::Right), Some(pos("g3")));
        assert_eq!(pos("f1").step(Direction::Left), None);
    }

    #[test]
    fn test_center_has_six_neighbors() {
        let count = Direction::ORTHOGONAL
            .iter()
            .filter_map(|&d| pos("f6").step(d))
            .count();
        assert_eq!(count, 6);
        let corner = Direction::ORTHOGONAL
            .iter()
            .filter_map(|&d| pos("a1").step(d))
            .count();
        assert_eq!(corner, 3);
    }
}
