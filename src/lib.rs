pub mod ai;
pub mod board;
pub mod coord;
pub mod error;
pub mod event;
pub mod game;
pub mod history;
pub mod moves;
pub mod piece;
pub mod rules;
pub mod search;
pub mod tictactoe;

pub use ai::AiPlayer;
pub use board::{Board, Fingerprint};
pub use coord::Coord;
pub use error::{ChessError, ChessResult};
pub use game::{Game, GameSnapshot, GameState};
pub use moves::Move;
pub use piece::{Color, Piece, PieceType};
pub use search::{AiConfig, Minimax, MinimaxGame, Score, SearchResult};
