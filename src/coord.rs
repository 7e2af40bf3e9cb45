use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChessError;

/// A board location. Row 0 is rank 1 and col 0 is file a.
///
/// Coordinates may be built off the board (geometry code steps past the
/// edges); only `in_range` coordinates may be used to index a `Board`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Debug)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Coord { row, col }
    }

    pub fn in_range(&self) -> bool {
        (0..8).contains(&self.row) && (0..8).contains(&self.col)
    }

    /// Dense index `row * 8 + col`, only meaningful for in-range coordinates.
    pub fn key(&self) -> u8 {
        debug_assert!(self.in_range(), "key of off-board coordinate {:?}", self);
        (self.row * 8 + self.col) as u8
    }

    pub fn from_key(key: u8) -> Self {
        Coord::new(key as i32 / 8, key as i32 % 8)
    }

    pub fn offset(&self, d_row: i32, d_col: i32) -> Self {
        Coord::new(self.row + d_row, self.col + d_col)
    }

    /// Parse algebraic square text such as `e4`.
    pub fn parse(text: &str) -> Result<Self, ChessError> {
        let invalid = || ChessError::InvalidSquare {
            text: text.to_string(),
        };
        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let (file, rank) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Ok(Coord::new((rank - b'1') as i32, (file - b'a') as i32))
    }
}

impl FromStr for Coord {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coord::parse(s)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.in_range() {
            return write!(f, "({}, {})", self.row, self.col);
        }
        let file = (b'a' + self.col as u8) as char;
        let rank = (b'1' + self.row as u8) as char;
        write!(f, "{file}{rank}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_corners() {
        assert_eq!(Coord::parse("a1").unwrap(), Coord::new(0, 0));
        assert_eq!(Coord::parse("h8").unwrap(), Coord::new(7, 7));
        assert_eq!(Coord::parse("e2").unwrap().to_string(), "e2");
    }

    #[test]
    fn rejects_off_board_text() {
        assert!(Coord::parse("i1").is_err());
        assert!(Coord::parse("a9").is_err());
        assert!(Coord::parse("a").is_err());
    }

    #[test]
    fn key_is_row_major() {
        let c = Coord::new(3, 5);
        assert_eq!(c.key(), 29);
        assert_eq!(Coord::from_key(29), c);
        assert!(!Coord::new(8, 0).in_range());
        assert!(!Coord::new(0, -1).in_range());
    }
}
