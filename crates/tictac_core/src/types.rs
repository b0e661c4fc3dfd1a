//! Core domain types for tic-tac-toe.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Player symbol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Player {
    /// Player X.
    X,
    /// Player O.
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Picks X or O with equal probability.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Player::X
        } else {
            Player::O
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

/// A cell address on the board as (column, row), both in `0..=2`.
///
/// Construction is checked, so a `Position` always points inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    col: u8,
    row: u8,
}

impl Position {
    /// All 9 positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position { col: 0, row: 0 },
        Position { col: 1, row: 0 },
        Position { col: 2, row: 0 },
        Position { col: 0, row: 1 },
        Position { col: 1, row: 1 },
        Position { col: 2, row: 1 },
        Position { col: 0, row: 2 },
        Position { col: 1, row: 2 },
        Position { col: 2, row: 2 },
    ];

    /// Creates a position, or `None` if either coordinate is off the grid.
    pub fn new(col: usize, row: usize) -> Option<Self> {
        (col < 3 && row < 3).then_some(Self {
            col: col as u8,
            row: row as u8,
        })
    }

    /// Column, 0 is leftmost.
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Row, 0 is topmost.
    pub fn row(self) -> usize {
        self.row as usize
    }

    /// Row-major index (0-8).
    pub fn index(self) -> usize {
        self.row() * 3 + self.col()
    }

    /// Creates a position from its row-major index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub(crate) fn with_col(self, col: u8) -> Self {
        Self { col, ..self }
    }

    pub(crate) fn with_row(self, row: u8) -> Self {
        Self { row, ..self }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// 3x3 tic-tac-toe board, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    rows: [[Square; 3]; 3],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from rows of squares, top row first.
    pub fn from_rows(rows: [[Square; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.rows[pos.row()][pos.col()]
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all rows, top row first.
    pub fn rows(&self) -> &[[Square; 3]; 3] {
        &self.rows
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|s| **s != Square::Empty)
            .count()
    }

    pub(crate) fn set(&mut self, pos: Position, square: Square) {
        self.rows[pos.row()][pos.col()] = square;
    }

    /// Formats the board as a human-readable string.
    #[instrument(skip(self))]
    pub fn display(&self) -> String {
        let mut result = String::new();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, square) in row.iter().enumerate() {
                let symbol = match square {
                    Square::Empty => '.',
                    Square::Occupied(Player::X) => 'X',
                    Square::Occupied(Player::O) => 'O',
                };
                result.push(symbol);
                if c < 2 {
                    result.push('|');
                }
            }
            if r < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(2, 2).is_some());
        assert!(Position::new(3, 0).is_none());
        assert!(Position::new(0, 3).is_none());
    }

    #[test]
    fn test_position_index_row_major() {
        let pos = Position::new(1, 2).unwrap();
        assert_eq!(pos.index(), 7);
        assert_eq!(Position::from_index(7), Some(pos));
        assert_eq!(Position::from_index(9), None);
    }

    #[test]
    fn test_board_display() {
        let mut board = Board::new();
        board.set(Position::new(0, 0).unwrap(), Square::Occupied(Player::X));
        board.set(Position::new(2, 2).unwrap(), Square::Occupied(Player::O));
        assert_eq!(board.display(), "X|.|.\n-+-+-\n.|.|.\n-+-+-\n.|.|O");
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Player::X.opponent(), Player::O);
        assert_eq!(Player::O.opponent(), Player::X);
    }
}
