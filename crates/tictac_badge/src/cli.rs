//! Command-line interface for the badge simulator.

use clap::Parser;
use std::path::PathBuf;
use tictac_core::{Button, HeldButtons};

/// Tic-tac-toe badge - terminal simulation of the e-paper badge
#[derive(Parser, Debug)]
#[command(name = "tictac-badge")]
#[command(about = "Idle LED animations and tic-tac-toe on a simulated badge", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "badge.toml")]
    pub config: PathBuf,

    /// HTTP port (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// HTTP host (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// All-time score file (overrides config)
    #[arg(long)]
    pub scores: Option<PathBuf>,

    /// End the game when the board fills with no winner
    #[arg(long)]
    pub draw_ends_game: bool,

    /// Buttons held at power-on, e.g. `up,down,a` to wipe the high score
    #[arg(long, value_delimiter = ',')]
    pub hold: Vec<Button>,

    /// Seed for turn and selector randomness
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    /// Buttons simulated as held during boot.
    pub fn held_at_boot(&self) -> HeldButtons {
        HeldButtons::from_buttons(&self.hold)
    }
}
