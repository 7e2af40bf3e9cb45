use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, Fingerprint};
use crate::coord::Coord;
use crate::error::{ChessError, ChessResult};
use crate::event::Event;
use crate::history::History;
use crate::moves::Move;
use crate::piece::{Color, PieceType};
use crate::rules;

/// Classification of the current position. `WhiteWins`, `BlackWins` and
/// `Draw` are terminal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum GameState {
    WhiteWins,
    BlackWins,
    Draw,
    WhiteInCheck,
    BlackInCheck,
    NotOver,
}

impl GameState {
    pub fn is_over(self) -> bool {
        matches!(self, GameState::WhiteWins | GameState::BlackWins | GameState::Draw)
    }

    fn wins(color: Color) -> Self {
        match color {
            Color::White => GameState::WhiteWins,
            Color::Black => GameState::BlackWins,
        }
    }

    fn in_check(color: Color) -> Self {
        match color {
            Color::White => GameState::WhiteInCheck,
            Color::Black => GameState::BlackInCheck,
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameState::WhiteWins => "white wins",
            GameState::BlackWins => "black wins",
            GameState::Draw => "draw",
            GameState::WhiteInCheck => "white in check",
            GameState::BlackInCheck => "black in check",
            GameState::NotOver => "not over",
        };
        write!(f, "{text}")
    }
}

/// Serializable summary of a game, for front ends and logs.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct GameSnapshot {
    pub fingerprint: String,
    pub turn: Color,
    pub state: GameState,
    pub moves: Vec<String>,
    pub white_points: i32,
    pub black_points: i32,
    pub captured_white: Vec<PieceType>,
    pub captured_black: Vec<PieceType>,
}

impl GameSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A chess game: side to move, board, move history and how many times each
/// position has been reached.
#[derive(Clone, Debug)]
pub struct Game {
    pub(crate) turn: Color,
    pub(crate) board: Board,
    pub(crate) history: History,
    position_counts: HashMap<Fingerprint, u32>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// The standard starting position, white to move.
    pub fn new() -> Self {
        Game::from_board(Board::new(), Color::White)
    }

    /// An arbitrary position with no history. Every king and rook on its home
    /// square keeps its castling right.
    pub fn from_board(board: Board, turn: Color) -> Self {
        let mut position_counts = HashMap::new();
        position_counts.insert(board.fingerprint(), 1);
        Game {
            turn,
            board,
            history: History::new(),
            position_counts,
        }
    }

    /// Start from `board` with `turn` to move and replay `moves`, rebuilding
    /// the history and the repetition counts.
    pub fn load(board: Board, turn: Color, moves: &[Move]) -> ChessResult<Self> {
        let mut game = Game::from_board(board, turn);
        for mv in moves {
            game.make_move(mv)?;
        }
        Ok(game)
    }

    /// Shorthand for `load` from the starting position with move text.
    pub fn from_move_text(moves: &[&str]) -> ChessResult<Self> {
        let moves = moves
            .iter()
            .map(|text| Move::parse(text))
            .collect::<ChessResult<Vec<_>>>()?;
        Game::load(Board::new(), Color::White, &moves)
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// How many times the current position has been reached.
    pub fn repetitions(&self) -> u32 {
        self.position_counts
            .get(&self.board.fingerprint())
            .copied()
            .unwrap_or(0)
    }

    /// Resolve `mv` without playing it.
    pub fn interpret_move(&mut self, mv: &Move) -> Option<Event> {
        rules::interpret_move(mv, self)
    }

    /// Play `mv` for the side to move. An illegal move is rejected with the
    /// game untouched.
    pub fn make_move(&mut self, mv: &Move) -> ChessResult<()> {
        let event = rules::interpret_move(mv, self).ok_or_else(|| ChessError::IllegalMove {
            mv: mv.to_string(),
        })?;
        event.apply(&mut self.board);
        debug!(mv = %event, color = ?self.turn, check = event.gives_check, "applied move");
        self.history.add_event(event);
        *self.position_counts.entry(self.board.fingerprint()).or_insert(0) += 1;
        self.turn = self.turn.opposite();
        Ok(())
    }

    /// Take back the last move, returning it.
    pub fn undo_move(&mut self) -> ChessResult<Move> {
        let event = self.history.pop_event().ok_or(ChessError::EmptyHistory)?;
        let leaving = self.board.fingerprint();
        if let Some(count) = self.position_counts.get_mut(&leaving) {
            *count -= 1;
            if *count == 0 {
                self.position_counts.remove(&leaving);
            }
        }
        event.undo(&mut self.board);
        self.turn = self.turn.opposite();
        debug!(mv = %event, "undid move");
        Ok(event.to_move())
    }

    /// Legal moves of the piece on `from`.
    pub fn legal_moves_from(&mut self, from: Coord) -> Vec<Move> {
        rules::legal_moves_from(from, self)
    }

    /// Every legal move for the side to move, in ascending square order of
    /// the moving piece.
    pub fn all_moves(&mut self) -> Vec<Move> {
        let squares: Vec<u8> = self.board.pieces(self.turn).keys().copied().collect();
        let mut moves = Vec::with_capacity(64);
        for key in squares {
            moves.extend(rules::legal_moves_from(Coord::from_key(key), self));
        }
        moves
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        rules::is_in_check(&self.board, color)
    }

    /// A side has insufficient material when it holds its king plus at most
    /// one knight or one bishop.
    pub fn insufficient_material(&self, color: Color) -> bool {
        let mut minors = 0;
        for piece in self.board.pieces(color).values() {
            match piece.piece_type {
                PieceType::King => {}
                PieceType::Knight | PieceType::Bishop => minors += 1,
                _ => return false,
            }
        }
        minors <= 1
    }

    /// Classify the position: insufficient material, then threefold
    /// repetition, then checkmate/stalemate, then check.
    pub fn state(&self) -> GameState {
        if self.insufficient_material(Color::White) && self.insufficient_material(Color::Black) {
            return GameState::Draw;
        }
        if self.repetitions() > 2 {
            return GameState::Draw;
        }
        let in_check = self.is_in_check(self.turn);
        if !rules::has_legal_move(&self.board, &self.history, self.turn) {
            return if in_check {
                GameState::wins(self.turn.opposite())
            } else {
                GameState::Draw
            };
        }
        if in_check {
            GameState::in_check(self.turn)
        } else if self.is_in_check(self.turn.opposite()) {
            GameState::in_check(self.turn.opposite())
        } else {
            GameState::NotOver
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let kinds = |color| {
            self.history
                .captured(color)
                .iter()
                .map(|p| p.piece_type)
                .collect::<Vec<_>>()
        };
        let captured_white = kinds(Color::White);
        let captured_black = kinds(Color::Black);
        GameSnapshot {
            fingerprint: self.board.string_key(),
            turn: self.turn,
            state: self.state(),
            moves: self.history.events().iter().map(|e| e.to_string()).collect(),
            white_points: self.board.points(Color::White),
            black_points: self.board.points(Color::Black),
            captured_white,
            captured_black,
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        write!(f, "{}", self.board)?;
        writeln!(f, "{}", self.history)?;
        if state == GameState::NotOver {
            write!(f, "{}'s turn", self.turn)
        } else {
            write!(f, "{state}")
        }
    }
}
