//! Tic-tac-toe badge simulator
//!
//! Runs the badge control core against terminal stand-ins for the badge
//! hardware: a ratatui canvas for the e-paper panel, a colored row for the
//! NeoPixel strip, a JSON file for NVM, and the keyboard for the five
//! switches. An axum server exposes the accent-color page.
//!
//! # Architecture
//!
//! - **Display**: pending/shown scene with minimum refresh interval
//! - **LEDs**: four rainbow animations on eight pixels
//! - **Store**: JSON score record
//! - **HTTP**: `/` page, forwarded to the control loop over a channel
//! - **Runtime**: one page request and one input event per iteration

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod display;
mod http;
mod keys;
mod leds;
mod runtime;
mod store;
mod ui;

pub mod tui;

// Crate-level exports - Configuration
pub use cli::Cli;
pub use config::{BadgeConfig, ConfigError};

// Crate-level exports - Collaborators
pub use display::{
    GRID_LINES, PANEL_HEIGHT, PANEL_WIDTH, Scene, TILE_ORIGINS, TILE_SIZE, TerminalDisplay,
    all_time_label, session_label, tile_origin, win_line_polygon,
};
pub use leds::{ADVANCE_INTERVAL, AnimationKind, FRAME_INTERVAL, LedAnimations, PIXEL_COUNT, color_wheel};
pub use store::JsonScoreStore;

// Crate-level exports - Input
pub use keys::{KeyAction, KeyMapper, button_for};

// Crate-level exports - HTTP
pub use http::{
    COLOR_PARAM, PageError, PageRequest, PageSender, PageView, parse_color, render_index, router,
};

// Crate-level exports - Runtime
pub use runtime::{BadgeExecutor, BadgeRuntime};
