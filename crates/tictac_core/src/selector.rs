//! Selector cursor: the highlighted cell where the next piece would go.
//!
//! Movement ignores occupancy; only playing is restricted.

use crate::engine::empty_cells;
use crate::{Board, Position};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Moves up one row; no-op on the top row.
pub fn move_up(pos: Position) -> Position {
    pos.with_row(pos.row().saturating_sub(1) as u8)
}

/// Moves down one row; no-op on the bottom row.
pub fn move_down(pos: Position) -> Position {
    pos.with_row((pos.row() + 1).min(2) as u8)
}

/// Moves left one column; no-op on the left column.
pub fn move_left(pos: Position) -> Position {
    pos.with_col(pos.col().saturating_sub(1) as u8)
}

/// Moves right one column; no-op on the right column.
pub fn move_right(pos: Position) -> Position {
    pos.with_col((pos.col() + 1).min(2) as u8)
}

/// Picks any of the 9 cells uniformly. Used at game start.
pub fn random_cell<R: Rng>(rng: &mut R) -> Position {
    let col = rng.random_range(0..3);
    let row = rng.random_range(0..3);
    Position::new(col, row).unwrap_or(Position::ALL[0])
}

/// Picks uniformly among the board's empty cells, keeping `current` when the
/// board is full.
pub fn random_empty<R: Rng>(rng: &mut R, board: &Board, current: Position) -> Position {
    empty_cells(board).choose(rng).copied().unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::play;
    use crate::Player;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn at(col: usize, row: usize) -> Position {
        Position::new(col, row).unwrap()
    }

    #[test]
    fn test_moves_inside_grid() {
        assert_eq!(move_up(at(1, 1)), at(1, 0));
        assert_eq!(move_down(at(1, 1)), at(1, 2));
        assert_eq!(move_left(at(1, 1)), at(0, 1));
        assert_eq!(move_right(at(1, 1)), at(2, 1));
    }

    #[test]
    fn test_moves_clamp_at_edges() {
        assert_eq!(move_up(at(2, 0)), at(2, 0));
        assert_eq!(move_down(at(0, 2)), at(0, 2));
        assert_eq!(move_left(at(0, 1)), at(0, 1));
        assert_eq!(move_right(at(2, 1)), at(2, 1));
    }

    #[test]
    fn test_random_cell_covers_grid() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 9];
        for _ in 0..500 {
            seen[random_cell(&mut rng).index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_random_empty_only_picks_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = Board::new();
        let mut turn = Player::X;
        for pos in Position::ALL.into_iter().take(8) {
            board = play(&board, turn, (pos.col(), pos.row())).unwrap();
            turn = turn.opponent();
        }
        for _ in 0..20 {
            assert_eq!(random_empty(&mut rng, &board, at(0, 0)), at(2, 2));
        }
    }

    #[test]
    fn test_random_empty_full_board_keeps_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = Board::new();
        let mut turn = Player::X;
        for pos in Position::ALL {
            board = play(&board, turn, (pos.col(), pos.row())).unwrap();
            turn = turn.opponent();
        }
        assert_eq!(random_empty(&mut rng, &board, at(1, 2)), at(1, 2));
    }
}
