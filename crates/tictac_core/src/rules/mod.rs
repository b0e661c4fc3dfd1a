//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board), kept apart from board
//! storage so the engine and the mode machine can share them.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{WinLine, WinResult, check_winner};
