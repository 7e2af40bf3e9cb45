use std::collections::BTreeMap;
use std::fmt;

use crate::coord::Coord;
use crate::error::ChessError;
use crate::moves::FromTo;
use crate::piece::{Color, Piece, PieceType};

const EMPTY_SQUARE: u8 = b' ';

/// One character per square in row-major order (a1, b1, ..., h8): the lower
/// case letter for a white piece, upper case for black, space for empty.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 64]);

impl Fingerprint {
    fn empty() -> Self {
        Fingerprint([EMPTY_SQUARE; 64])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:?})", self.to_string())
    }
}

/// 8x8 grid of optional pieces with per-color indices, running point totals
/// and a position fingerprint. All four are kept in step by `set`, the only
/// mutation path.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
    pieces: [BTreeMap<u8, Piece>; 2],
    points: [i32; 2],
    fingerprint: Fingerprint,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            pieces: [BTreeMap::new(), BTreeMap::new()],
            points: [0, 0],
            fingerprint: Fingerprint::empty(),
        }
    }

    /// The standard starting position.
    pub fn new() -> Self {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            for (col, &piece_type) in BACK_RANK.iter().enumerate() {
                let col = col as i32;
                board.set(
                    Coord::new(color.home_row(), col),
                    Some(Piece::new(piece_type, color)),
                );
                board.set(
                    Coord::new(color.pawn_row(), col),
                    Some(Piece::new(PieceType::Pawn, color)),
                );
            }
        }
        board
    }

    /// Build a board from a 64-character diagram in fingerprint order
    /// (rank 1 first, lower case white, upper case black, space empty).
    pub fn from_diagram(diagram: &str) -> Result<Self, ChessError> {
        let chars: Vec<char> = diagram.chars().collect();
        if chars.len() != 64 {
            return Err(ChessError::InvalidDiagram { len: chars.len() });
        }
        let mut board = Board::empty();
        for (index, &ch) in chars.iter().enumerate() {
            if ch == ' ' {
                continue;
            }
            let piece = Piece::from_symbol(ch).ok_or(ChessError::InvalidDiagramChar { ch, index })?;
            board.set(Coord::from_key(index as u8), Some(piece));
        }
        Ok(board)
    }

    /// The piece on `coord`; off-board coordinates read as empty.
    pub fn get(&self, coord: Coord) -> Option<Piece> {
        if coord.in_range() {
            self.squares[coord.row as usize][coord.col as usize]
        } else {
            None
        }
    }

    /// Place (or clear) a square, updating indices, totals and fingerprint.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is off the board.
    pub fn set(&mut self, coord: Coord, piece: Option<Piece>) {
        assert!(coord.in_range(), "Board::set called with off-board coordinate {:?}", coord);
        let key = coord.key();
        let slot = &mut self.squares[coord.row as usize][coord.col as usize];

        if let Some(old) = slot.take() {
            self.pieces[old.color.index()].remove(&key);
            self.points[old.color.index()] -= old.points();
        }
        if let Some(new) = piece {
            self.pieces[new.color.index()].insert(key, new);
            self.points[new.color.index()] += new.points();
        }
        *slot = piece;
        self.fingerprint.0[key as usize] = piece.map_or(EMPTY_SQUARE, |p| p.symbol() as u8);
    }

    /// Move whatever stands on `from_to.from` to `from_to.to`, overwriting the
    /// destination.
    ///
    /// # Panics
    ///
    /// Panics if the source square is empty: relocations are only issued for
    /// events that were validated against this board.
    pub fn relocate(&mut self, from_to: FromTo) {
        let piece = match self.get(from_to.from) {
            Some(p) => p,
            None => panic!("no piece to relocate at {} ({})\n{}", from_to.from, from_to, self),
        };
        self.set(from_to.from, None);
        self.set(from_to.to, Some(piece));
    }

    /// Pieces of one color keyed by `Coord::key`, in ascending square order.
    pub fn pieces(&self, color: Color) -> &BTreeMap<u8, Piece> {
        &self.pieces[color.index()]
    }

    /// Sum of the point values of one color's pieces.
    pub fn points(&self, color: Color) -> i32 {
        self.points[color.index()]
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn string_key(&self) -> String {
        self.fingerprint.to_string()
    }

    pub fn find_king(&self, color: Color) -> Option<Coord> {
        self.pieces(color)
            .iter()
            .find(|(_, p)| p.piece_type == PieceType::King)
            .map(|(&key, _)| Coord::from_key(key))
    }
}

fn write_files(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "  ")?;
    for file in 'a'..='h' {
        write!(f, "   {file}")?;
    }
    writeln!(f)
}

fn write_line(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "   +")?;
    for _ in 0..8 {
        write!(f, "---+")?;
    }
    writeln!(f)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_files(f)?;
        for row in (0..8).rev() {
            write_line(f)?;
            write!(f, " {} |", row + 1)?;
            for col in 0..8 {
                let symbol = self.squares[row][col].map_or(' ', |p| p.symbol());
                write!(f, " {symbol} |")?;
            }
            writeln!(f, "  {}", row + 1)?;
        }
        write_line(f)?;
        write_files(f)
    }
}
