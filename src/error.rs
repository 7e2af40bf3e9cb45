//! Error types for the rules engine
//!
//! Recoverable failures only: malformed text input, rejected moves, undo on
//! an empty history and bad configuration. Broken board invariants panic.

use thiserror::Error;

/// Errors that can occur while parsing input or driving a game
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Move text is not `<file><rank><file><rank>` with an optional promotion letter
    #[error("Invalid move text: {text:?} (expected e.g. e2e4 or b7b8q)")]
    InvalidMoveText { text: String },

    /// Square text outside a1..h8
    #[error("Invalid square: {text:?}")]
    InvalidSquare { text: String },

    /// Board diagram of the wrong length
    #[error("Invalid board diagram: expected 64 squares, got {len}")]
    InvalidDiagram { len: usize },

    /// Board diagram holding an unknown piece letter
    #[error("Invalid board diagram character {ch:?} at square {index}")]
    InvalidDiagramChar { ch: char, index: usize },

    /// The move is not legal in the current position
    #[error("Illegal move: {mv}")]
    IllegalMove { mv: String },

    /// Undo requested before any move was made
    #[error("No move to undo")]
    EmptyHistory,

    /// Configuration value could not be parsed
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

/// Result type alias for rules engine operations
pub type ChessResult<T> = Result<T, ChessError>;
