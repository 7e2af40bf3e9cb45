use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::error::ChessError;
use crate::piece::PieceType;

/// A single piece relocation. Castling produces two of these.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct FromTo {
    pub from: Coord,
    pub to: Coord,
}

impl FromTo {
    pub fn new(from: Coord, to: Coord) -> Self {
        FromTo { from, to }
    }

    /// The relocation that undoes this one.
    pub fn reverse(&self) -> Self {
        FromTo::new(self.to, self.from)
    }

    /// Absolute (row, col) distance.
    pub fn diff(&self) -> (i32, i32) {
        (
            (self.to.row - self.from.row).abs(),
            (self.to.col - self.from.col).abs(),
        )
    }

    pub fn in_range(&self) -> bool {
        self.from.in_range() && self.to.in_range()
    }
}

impl fmt::Display for FromTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// A requested move, as entered by a player or produced by move enumeration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Coord, to: Coord) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    pub fn promote(from: Coord, to: Coord, promotion: PieceType) -> Self {
        Move {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    pub fn from_to(&self) -> FromTo {
        FromTo::new(self.from, self.to)
    }

    pub fn diff(&self) -> (i32, i32) {
        self.from_to().diff()
    }

    pub fn in_range(&self) -> bool {
        self.from_to().in_range()
    }

    /// Parse move text: four characters `<file><rank><file><rank>`, optionally
    /// followed by a promotion letter (`q`, `r`, `b`, `n`).
    pub fn parse(text: &str) -> Result<Move, ChessError> {
        let invalid = || ChessError::InvalidMoveText {
            text: text.to_string(),
        };
        let text = text.trim();
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(invalid());
        }
        let from = Coord::parse(&text[0..2]).map_err(|_| invalid())?;
        let to = Coord::parse(&text[2..4]).map_err(|_| invalid())?;
        let promotion = match text.as_bytes().get(4) {
            None => None,
            Some(b'q') => Some(PieceType::Queen),
            Some(b'r') => Some(PieceType::Rook),
            Some(b'b') => Some(PieceType::Bishop),
            Some(b'n') => Some(PieceType::Knight),
            Some(_) => return Err(invalid()),
        };
        Ok(Move {
            from,
            to,
            promotion,
        })
    }
}

impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter())?;
        }
        Ok(())
    }
}
