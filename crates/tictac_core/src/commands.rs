//! Commands emitted by the mode machine for its collaborators.
//!
//! The machine never calls the display, LEDs or storage directly. Each step
//! returns a list of these, applied in order by an [`Executor`](crate::Executor).

use crate::{Player, Position, Score, WinLine};
use std::str::FromStr;

/// Which top-level screen the display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Screen {
    /// Badge artwork, shown while idle.
    Badge,
    /// Board with score panels.
    Game,
}

/// A 24-bit RGB color, `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(u32);

impl Rgb {
    /// All channels off.
    pub const BLACK: Rgb = Rgb(0x000000);

    /// Creates a color from a packed `0xRRGGBB` value; higher bits are dropped.
    pub const fn new(value: u32) -> Self {
        Self(value & 0xFF_FFFF)
    }

    /// Creates a color from channels.
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Packed value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Red, green, blue.
    pub const fn channels(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }

    /// Scales every channel by `factor` in `0.0..=1.0`.
    pub fn scaled(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let (r, g, b) = self.channels();
        let scale = |c: u8| (c as f32 * factor).round() as u8;
        Self::from_channels(scale(r), scale(g), scale(b))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Rejected color text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid color {input:?}: expected #RRGGBB or 0xRRGGBB")]
pub struct ColorParseError {
    /// The text that failed to parse.
    pub input: String,
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Accepts `#RRGGBB`, `0xRRGGBB` or bare `RRGGBB`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let err = || ColorParseError {
            input: s.to_string(),
        };
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        u32::from_str_radix(digits, 16).map(Rgb).map_err(|_| err())
    }
}

/// Display operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCommand {
    /// Switch the root screen.
    ShowScreen(Screen),
    /// Move the selector outline.
    PlaceSelector(Position),
    /// Draw a piece in a cell.
    PlacePiece {
        /// Target cell.
        position: Position,
        /// Piece to draw.
        player: Player,
    },
    /// Remove every drawn piece.
    ClearPieces,
    /// Draw the strike-through for a winning line.
    ShowWinLine(WinLine),
    /// Remove the strike-through.
    HideWinLine,
    /// Update the session score panel.
    SetSessionScore(Score),
    /// Update the all-time score panel.
    SetAllTimeScore(Score),
    /// Push pending changes to the panel.
    Refresh,
}

/// LED strip operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationCommand {
    /// Run one animation tick.
    Advance,
    /// Stop animating; pixels keep their content.
    Freeze,
    /// Start animating again.
    Resume,
    /// Set every pixel to one color.
    Fill(Rgb),
    /// Switch to the next animation in the sequence.
    Next,
    /// Switch to the previous animation in the sequence.
    Previous,
    /// Set global strip brightness, `0.0..=1.0`.
    SetBrightness(f32),
}

/// Anything the machine asks of the outside world.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::From)]
pub enum Command {
    /// Display operation.
    Render(RenderCommand),
    /// LED operation.
    Animate(AnimationCommand),
    /// Write the all-time score through to storage.
    Persist(Score),
}
