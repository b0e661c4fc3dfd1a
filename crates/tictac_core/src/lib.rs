//! Tic-tac-toe badge core - game engine and mode state machine
//!
//! Everything here is pure: no clocks, no terminals, no files. The outside
//! world is reached through the [`Renderer`], [`Animation`] and
//! [`ScoreStore`] traits, driven by an [`Executor`].
//!
//! # Architecture
//!
//! - **Engine**: board, legality, win detection ([`engine`], [`rules`])
//! - **Selector**: cursor movement and random placement ([`selector`])
//! - **Input**: held-button tracking and chord cooldown
//! - **Mode machine**: Badge / Playing / GameOver, emits [`Command`]s
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use std::time::Duration;
//! use tictac_core::{Button, MachineSettings, Mode, ModeStateMachine, RawEvent, Score};
//!
//! let mut machine =
//!     ModeStateMachine::new(Score::default(), MachineSettings::default(), StdRng::seed_from_u64(1));
//! let now = Duration::ZERO;
//! machine.step(Some(RawEvent::press(Button::A)), now);
//! machine.step(Some(RawEvent::press(Button::C)), now);
//! machine.step(Some(RawEvent::release(Button::C)), now);
//! assert_eq!(machine.mode(), Mode::Playing);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod boot;
mod collaborators;
mod commands;
mod error;
mod input;
mod mode;
mod score;
mod types;

pub mod engine;
pub mod rules;
pub mod selector;

// Crate-level exports - Domain types
pub use types::{Board, Player, Position, Square};

// Crate-level exports - Rules
pub use engine::IllegalMove;
pub use rules::{WinLine, WinResult, check_winner};

// Crate-level exports - Scores
pub use score::{
    Score, ScoreStore, ScoreTracker, StoreError, StoreErrorKind, load_persisted, persist,
};

// Crate-level exports - Input
pub use input::{
    Button, ButtonRelease, COOLDOWN, Cooldown, EdgeKind, HeldButtons, InputDebouncer, RawEvent,
};

// Crate-level exports - Commands and collaborators
pub use collaborators::{Animation, Executor, RETRY_MARGIN, RenderError, Renderer};
pub use commands::{AnimationCommand, ColorParseError, Command, RenderCommand, Rgb, Screen};

// Crate-level exports - Mode machine
pub use boot::{RESET_GESTURE, boot};
pub use error::BadgeError;
pub use mode::{BrightnessRamp, MachineSettings, Mode, ModeStateMachine};
