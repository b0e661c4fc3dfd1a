//! Button bookkeeping: held set, release events, and chord cooldown.
//!
//! The hardware event source is assumed debounced electrically; this layer
//! only tracks which buttons are down so chords can be recognised.

use std::time::Duration;
use tracing::{debug, instrument, trace};

/// Default minimum spacing between accepted chord transitions.
pub const COOLDOWN: Duration = Duration::from_millis(750);

/// The five logical badge buttons.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Button {
    /// Up switch.
    #[strum(serialize = "up")]
    Up,
    /// Down switch.
    #[strum(serialize = "down")]
    Down,
    /// A switch.
    #[strum(serialize = "a")]
    A,
    /// B switch.
    #[strum(serialize = "b")]
    B,
    /// C switch.
    #[strum(serialize = "c")]
    C,
}

impl Button {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Edge reported by the button source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Button went down.
    Press,
    /// Button came up.
    Release,
}

/// A raw press or release from the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// Which button.
    pub button: Button,
    /// Which edge.
    pub kind: EdgeKind,
}

impl RawEvent {
    /// A press of `button`.
    pub fn press(button: Button) -> Self {
        Self {
            button,
            kind: EdgeKind::Press,
        }
    }

    /// A release of `button`.
    pub fn release(button: Button) -> Self {
        Self {
            button,
            kind: EdgeKind::Release,
        }
    }
}

/// Set of currently held buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldButtons(u8);

impl HeldButtons {
    /// Builds a set from a list of buttons.
    pub fn from_buttons(buttons: &[Button]) -> Self {
        Self(buttons.iter().fold(0, |acc, b| acc | b.bit()))
    }

    /// True when `button` is held.
    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    /// True when every button in `buttons` is held.
    pub fn contains_all(self, buttons: &[Button]) -> bool {
        buttons.iter().all(|b| self.contains(*b))
    }

    /// True when nothing is held.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    fn remove(&mut self, button: Button) {
        self.0 &= !button.bit();
    }
}

/// A logical release, with the held set as it was just before the release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonRelease {
    /// Released button.
    pub button: Button,
    /// Buttons held before this release, including `button` if it was down.
    pub held_before: HeldButtons,
}

impl ButtonRelease {
    /// The mode-change gesture: C released while A is held.
    pub fn is_mode_chord(&self) -> bool {
        self.button == Button::C && self.held_before.contains(Button::A)
    }
}

/// Turns raw edges into release events while tracking the held set.
#[derive(Debug, Clone, Default)]
pub struct InputDebouncer {
    held: HeldButtons,
}

impl InputDebouncer {
    /// Creates a debouncer with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently held buttons.
    pub fn held(&self) -> HeldButtons {
        self.held
    }

    /// Feeds one raw edge. Presses only update the held set; releases come
    /// back as [`ButtonRelease`].
    #[instrument(skip(self), level = "trace")]
    pub fn feed(&mut self, event: RawEvent) -> Option<ButtonRelease> {
        match event.kind {
            EdgeKind::Press => {
                self.held.insert(event.button);
                trace!(held = ?self.held, "Button pressed");
                None
            }
            EdgeKind::Release => {
                let release = ButtonRelease {
                    button: event.button,
                    held_before: self.held,
                };
                self.held.remove(event.button);
                Some(release)
            }
        }
    }
}

/// Suppresses chord transitions that follow the last accepted one too closely.
#[derive(Debug, Clone, Copy)]
pub struct Cooldown {
    period: Duration,
    last_accepted: Option<Duration>,
}

impl Cooldown {
    /// Creates a cooldown; the first chord is always eligible.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_accepted: None,
        }
    }

    /// True when a chord at `now` would be accepted.
    pub fn ready(&self, now: Duration) -> bool {
        match self.last_accepted {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.period,
        }
    }

    /// Accepts the chord at `now` if the cooldown has elapsed, recording it.
    pub fn try_accept(&mut self, now: Duration) -> bool {
        if self.ready(now) {
            self.last_accepted = Some(now);
            true
        } else {
            debug!(?now, last = ?self.last_accepted, "Chord suppressed by cooldown");
            false
        }
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(COOLDOWN)
    }
}
