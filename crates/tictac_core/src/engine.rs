//! Board engine: move legality and board transitions.
//!
//! Every operation takes the board by reference and hands back a new one;
//! the caller decides whether to keep it.

use crate::{Board, Player, Position, Square};
use tracing::{debug, instrument};

/// Rejected move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum IllegalMove {
    /// The target is off the 3x3 grid.
    #[display("Cell ({col}, {row}) is outside the board")]
    OutOfBounds {
        /// Requested column.
        col: usize,
        /// Requested row.
        row: usize,
    },

    /// The target square already holds a piece.
    #[display("Square {_0} is already occupied")]
    Occupied(#[error(not(source))] Position),
}

/// Places `turn`'s piece at `(col, row)`, returning the resulting board.
///
/// # Errors
///
/// Returns [`IllegalMove`] if the cell is off the grid or not empty. The
/// input board is never modified.
#[instrument(skip(board))]
pub fn play(board: &Board, turn: Player, (col, row): (usize, usize)) -> Result<Board, IllegalMove> {
    let pos = Position::new(col, row).ok_or(IllegalMove::OutOfBounds { col, row })?;

    if !board.is_empty(pos) {
        debug!(%pos, "Rejected move on occupied square");
        return Err(IllegalMove::Occupied(pos));
    }

    let mut next = *board;
    next.set(pos, Square::Occupied(turn));
    Ok(next)
}

/// Lists all empty squares in row-major order.
pub fn empty_cells(board: &Board) -> Vec<Position> {
    Position::ALL
        .into_iter()
        .filter(|pos| board.is_empty(*pos))
        .collect()
}

/// Returns a cleared board.
pub fn reset(_board: &Board) -> Board {
    Board::new()
}
