use crate::board::Fingerprint;
use crate::game::Game;
use crate::moves::Move;
use crate::piece::Color;
use crate::search::{AiConfig, Minimax, MinimaxGame, Score, SearchResult, MAX_SCORE, MIN_SCORE};

/// Chess as seen by the search: white maximizes material, black minimizes.
impl MinimaxGame for Game {
    type Move = Move;
    type Key = (Fingerprint, Color);

    fn legal_moves(&mut self) -> Vec<Move> {
        self.all_moves()
    }

    fn score(&mut self) -> Score {
        self.board.points(Color::White) - self.board.points(Color::Black)
    }

    /// Checkmate is a win for the side that delivered it; stalemate is level.
    fn terminal_score(&mut self) -> Score {
        if !self.is_in_check(self.turn) {
            return 0;
        }
        match self.turn {
            Color::White => MIN_SCORE,
            Color::Black => MAX_SCORE,
        }
    }

    fn make_move(&mut self, mv: &Move) {
        if let Err(e) = Game::make_move(self, mv) {
            panic!("search tried a move the game rejected: {e}\n{self}");
        }
    }

    fn undo_move(&mut self) {
        if let Err(e) = Game::undo_move(self) {
            panic!("search undo failed: {e}");
        }
    }

    /// The same placement with the other side to move is a different position.
    fn position_key(&self) -> (Fingerprint, Color) {
        (self.board.fingerprint(), self.turn)
    }
}

/// An automated player for one color.
pub struct AiPlayer {
    color: Color,
    searcher: Minimax<Game>,
}

impl AiPlayer {
    pub fn new(color: Color, config: AiConfig) -> Self {
        AiPlayer {
            color,
            searcher: Minimax::new(color == Color::Black, config),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Search the position for this player's move. `None` when it is not
    /// this player's turn or there is nothing to play.
    pub fn choose_move(&mut self, game: &mut Game) -> Option<SearchResult<Move>> {
        if game.turn() != self.color {
            return None;
        }
        self.searcher.get_move(game)
    }
}
