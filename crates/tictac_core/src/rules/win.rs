//! Win detection logic for tic-tac-toe.

use crate::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the 8 lines whose uniform occupancy wins the game.
///
/// The string form (`row-0`, `diag-tld`, ...) is the key the renderer uses
/// to look up the line's polygon.
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
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum WinLine {
    /// Top row.
    #[strum(serialize = "row-0")]
    Row0,
    /// Middle row.
    #[strum(serialize = "row-1")]
    Row1,
    /// Bottom row.
    #[strum(serialize = "row-2")]
    Row2,
    /// Left column.
    #[strum(serialize = "col-0")]
    Col0,
    /// Middle column.
    #[strum(serialize = "col-1")]
    Col1,
    /// Right column.
    #[strum(serialize = "col-2")]
    Col2,
    /// Top-left down to bottom-right.
    #[strum(serialize = "diag-tld")]
    DiagTld,
    /// Bottom-left up to top-right.
    #[strum(serialize = "diag-bru")]
    DiagBru,
}

impl WinLine {
    /// Lines in evaluation priority order.
    pub const PRIORITY: [WinLine; 8] = [
        WinLine::Row0,
        WinLine::Row1,
        WinLine::Row2,
        WinLine::Col0,
        WinLine::Col1,
        WinLine::Col2,
        WinLine::DiagTld,
        WinLine::DiagBru,
    ];

    /// The three cells of this line as (col, row).
    pub fn cells(self) -> [(usize, usize); 3] {
        match self {
            WinLine::Row0 => [(0, 0), (1, 0), (2, 0)],
            WinLine::Row1 => [(0, 1), (1, 1), (2, 1)],
            WinLine::Row2 => [(0, 2), (1, 2), (2, 2)],
            WinLine::Col0 => [(0, 0), (0, 1), (0, 2)],
            WinLine::Col1 => [(1, 0), (1, 1), (1, 2)],
            WinLine::Col2 => [(2, 0), (2, 1), (2, 2)],
            WinLine::DiagTld => [(0, 0), (1, 1), (2, 2)],
            WinLine::DiagBru => [(0, 2), (1, 1), (2, 0)],
        }
    }
}

/// A completed line and the player who owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinResult {
    /// Winning player.
    pub player: Player,
    /// The completed line.
    pub line: WinLine,
}

/// Checks if there is a winner on the board.
///
/// Rows are checked top to bottom, then columns left to right, then
/// `diag-tld`, then `diag-bru`; the first complete line is returned.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<WinResult> {
    WinLine::PRIORITY.into_iter().find_map(|line| {
        let [a, b, c] = line.cells().map(|(col, row)| {
            Position::new(col, row)
                .map(|pos| board.get(pos))
                .unwrap_or(Square::Empty)
        });
        match a {
            Square::Occupied(player) if a == b && b == c => Some(WinResult { player, line }),
            _ => None,
        }
    })
}
