use std::fmt;

use crate::board::Board;
use crate::coord::Coord;
use crate::moves::{FromTo, Move};
use crate::piece::{Piece, PieceType};

/// A piece removed by a move, and where it was removed from. For en passant
/// the square differs from the capturing move's destination.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Captured {
    pub piece: Piece,
    pub coord: Coord,
}

/// The fully resolved effect of one legal move.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Event {
    /// The moving piece first; castling adds the rook second.
    pub relocations: Vec<FromTo>,
    pub captured: Option<Captured>,
    /// Piece that replaces the pawn on its destination.
    pub promotion: Option<Piece>,
    /// Whether the move leaves the opponent's king threatened.
    pub gives_check: bool,
}

impl Event {
    pub(crate) fn relocation(from_to: FromTo) -> Self {
        Event {
            relocations: vec![from_to],
            captured: None,
            promotion: None,
            gives_check: false,
        }
    }

    pub(crate) fn capture(from_to: FromTo, piece: Piece, coord: Coord) -> Self {
        Event {
            captured: Some(Captured { piece, coord }),
            ..Event::relocation(from_to)
        }
    }

    /// A relocation, capturing whatever stands on the destination.
    pub(crate) fn move_or_capture(from_to: FromTo, target: Option<Piece>) -> Self {
        match target {
            Some(piece) => Event::capture(from_to, piece, from_to.to),
            None => Event::relocation(from_to),
        }
    }

    pub(crate) fn castle(king: FromTo, rook: FromTo) -> Self {
        Event {
            relocations: vec![king, rook],
            captured: None,
            promotion: None,
            gives_check: false,
        }
    }

    /// The relocation of the piece that was asked to move.
    pub fn primary(&self) -> FromTo {
        self.relocations[0]
    }

    pub fn is_castle(&self) -> bool {
        self.relocations.len() == 2
    }

    /// The move that produces this event, in move-text form.
    pub fn to_move(&self) -> Move {
        let primary = self.primary();
        Move {
            from: primary.from,
            to: primary.to,
            promotion: self.promotion.map(|p| p.piece_type),
        }
    }

    /// Remove the captured piece, perform every relocation in order, then
    /// swap in the promoted piece.
    pub fn apply(&self, board: &mut Board) {
        if let Some(captured) = self.captured {
            board.set(captured.coord, None);
        }
        for &from_to in &self.relocations {
            board.relocate(from_to);
        }
        if let Some(promotion) = self.promotion {
            board.set(self.primary().to, Some(promotion));
        }
    }

    /// Exact inverse of `apply`.
    pub fn undo(&self, board: &mut Board) {
        if let Some(promotion) = self.promotion {
            board.set(
                self.primary().to,
                Some(Piece::new(PieceType::Pawn, promotion.color)),
            );
        }
        for from_to in self.relocations.iter().rev() {
            board.relocate(from_to.reverse());
        }
        if let Some(captured) = self.captured {
            board.set(captured.coord, Some(captured.piece));
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_move())
    }
}

/// An event applied to a board for the lifetime of the guard. Dropping the
/// guard undoes it, so probing a position cannot leak a mutation on any
/// return path.
pub struct AppliedEvent<'a> {
    board: &'a mut Board,
    event: &'a Event,
}

impl<'a> AppliedEvent<'a> {
    pub fn new(board: &'a mut Board, event: &'a Event) -> Self {
        event.apply(board);
        AppliedEvent { board, event }
    }

    pub fn board(&self) -> &Board {
        self.board
    }
}

impl Drop for AppliedEvent<'_> {
    fn drop(&mut self) {
        self.event.undo(self.board);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color;

    fn c(text: &str) -> Coord {
        Coord::parse(text).unwrap()
    }

    fn ft(from: &str, to: &str) -> FromTo {
        FromTo::new(c(from), c(to))
    }

    #[test]
    fn en_passant_capture_undoes_exactly() {
        let mut board = Board::empty();
        board.set(c("e5"), Some(Piece::new(PieceType::Pawn, Color::White)));
        board.set(c("f5"), Some(Piece::new(PieceType::Pawn, Color::Black)));
        let before = board.clone();

        let event = Event::capture(ft("e5", "f6"), Piece::new(PieceType::Pawn, Color::Black), c("f5"));
        event.apply(&mut board);
        assert_eq!(board.get(c("f6")), Some(Piece::new(PieceType::Pawn, Color::White)));
        assert_eq!(board.get(c("f5")), None);
        assert_eq!(board.points(Color::Black), 0);

        event.undo(&mut board);
        assert_eq!(board, before);
    }

    #[test]
    fn promotion_capture_undoes_exactly() {
        let mut board = Board::empty();
        board.set(c("b7"), Some(Piece::new(PieceType::Pawn, Color::White)));
        board.set(c("a8"), Some(Piece::new(PieceType::Rook, Color::Black)));
        let before = board.clone();

        let mut event = Event::move_or_capture(ft("b7", "a8"), board.get(c("a8")));
        event.promotion = Some(Piece::new(PieceType::Knight, Color::White));
        event.apply(&mut board);
        assert_eq!(board.get(c("a8")), Some(Piece::new(PieceType::Knight, Color::White)));
        assert_eq!(board.points(Color::White), 3);
        assert_eq!(event.to_move().to_string(), "b7a8n");

        event.undo(&mut board);
        assert_eq!(board, before);
    }

    #[test]
    fn castle_relocates_both_pieces() {
        let mut board = Board::new();
        board.set(c("f1"), None);
        board.set(c("g1"), None);
        let before = board.clone();

        let event = Event::castle(ft("e1", "g1"), ft("h1", "f1"));
        event.apply(&mut board);
        assert_eq!(board.get(c("g1")).map(|p| p.piece_type), Some(PieceType::King));
        assert_eq!(board.get(c("f1")).map(|p| p.piece_type), Some(PieceType::Rook));
        event.undo(&mut board);
        assert_eq!(board, before);
    }

    #[test]
    fn guard_undoes_on_drop() {
        let mut board = Board::new();
        let before = board.clone();
        let event = Event::relocation(ft("e2", "e4"));
        {
            let applied = AppliedEvent::new(&mut board, &event);
            assert!(applied.board().get(c("e4")).is_some());
        }
        assert_eq!(board, before);
    }
}
