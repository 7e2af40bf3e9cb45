// =============================================================================
// Noughts and crosses
//
// A second, much smaller game for the generic search. X moves first and
// maximizes; O minimizes. Small enough to search to the end (9 plies).
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, ChessResult};
use crate::search::{MinimaxGame, Score, MAX_SCORE, MIN_SCORE};

/// Enough plies to finish any game from the empty grid.
pub const FULL_DEPTH: usize = 9;

const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opposite(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    fn symbol(self) -> char {
        match self {
            Mark::X => 'x',
            Mark::O => 'o',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum Outcome {
    NotOver,
    XWins,
    OWins,
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::NotOver => "not over",
            Outcome::XWins => "x wins",
            Outcome::OWins => "o wins",
            Outcome::Draw => "draw",
        };
        write!(f, "{text}")
    }
}

type Grid = [[Option<Mark>; 3]; 3];

#[derive(Clone, Debug)]
pub struct TicTacToe {
    grid: Grid,
    turn: Mark,
    played: Vec<Cell>,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    pub fn new() -> Self {
        TicTacToe {
            grid: [[None; 3]; 3],
            turn: Mark::X,
            played: Vec::with_capacity(9),
        }
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn get(&self, cell: Cell) -> Option<Mark> {
        self.grid.get(cell.row)?.get(cell.col).copied().flatten()
    }

    /// Mark `cell` for the side to move.
    pub fn play(&mut self, cell: Cell) -> ChessResult<()> {
        if cell.row > 2 || cell.col > 2 || self.get(cell).is_some() || self.winner().is_some() {
            return Err(ChessError::IllegalMove {
                mv: cell.to_string(),
            });
        }
        self.grid[cell.row][cell.col] = Some(self.turn);
        self.played.push(cell);
        self.turn = self.turn.opposite();
        Ok(())
    }

    pub fn undo(&mut self) -> ChessResult<()> {
        let cell = self.played.pop().ok_or(ChessError::EmptyHistory)?;
        self.grid[cell.row][cell.col] = None;
        self.turn = self.turn.opposite();
        Ok(())
    }

    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|line| {
            let [a, b, c] = line.map(|(r, c)| self.grid[r][c]);
            match (a, b, c) {
                (Some(a), Some(b), Some(c)) if a == b && b == c => Some(a),
                _ => None,
            }
        })
    }

    pub fn outcome(&self) -> Outcome {
        match self.winner() {
            Some(Mark::X) => Outcome::XWins,
            Some(Mark::O) => Outcome::OWins,
            None if self.played.len() == 9 => Outcome::Draw,
            None => Outcome::NotOver,
        }
    }

    fn empty_cells(&self) -> Vec<Cell> {
        (0..3)
            .flat_map(|row| (0..3).map(move |col| Cell::new(row, col)))
            .filter(|&cell| self.get(cell).is_none())
            .collect()
    }
}

impl MinimaxGame for TicTacToe {
    type Move = Cell;
    type Key = Grid;

    fn legal_moves(&mut self) -> Vec<Cell> {
        if self.winner().is_some() {
            return Vec::new();
        }
        self.empty_cells()
    }

    fn score(&mut self) -> Score {
        match self.winner() {
            Some(Mark::X) => MAX_SCORE,
            Some(Mark::O) => MIN_SCORE,
            None => 0,
        }
    }

    fn make_move(&mut self, cell: &Cell) {
        if let Err(e) = self.play(*cell) {
            panic!("search tried a move the game rejected: {e}");
        }
    }

    fn undo_move(&mut self) {
        if let Err(e) = self.undo() {
            panic!("search undo failed: {e}");
        }
    }

    /// The side to move follows from the number of marks.
    fn position_key(&self) -> Grid {
        self.grid
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.grid.iter().enumerate() {
            if i != 0 {
                writeln!(f, "---+---+---")?;
            }
            let symbols: Vec<String> = row
                .iter()
                .map(|m| format!(" {} ", m.map_or(' ', |m| m.symbol())))
                .collect();
            writeln!(f, "{}", symbols.join("|"))?;
        }
        Ok(())
    }
}
