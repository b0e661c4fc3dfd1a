//! Keyboard to badge-button mapping.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tictac_core::{Button, RawEvent};
use tracing::debug;

/// What a key means to the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Leave the simulator.
    Quit,
    /// Button edges to queue, oldest first.
    Buttons(Vec<RawEvent>),
    /// Not a badge key.
    Ignored,
}

/// Maps a key code to its badge button.
pub fn button_for(code: KeyCode) -> Option<Button> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Button::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Button::Down),
        KeyCode::Char('a') => Some(Button::A),
        KeyCode::Char('b') => Some(Button::B),
        KeyCode::Char('c') => Some(Button::C),
        _ => None,
    }
}

/// Turns terminal key events into button edges.
///
/// Terminals that report key releases give true press and release edges.
/// Others only report presses, so each key becomes a press then a release,
/// except A, which latches: one hit holds it, the next lets go. That keeps
/// the A+C chord reachable.
#[derive(Debug, Clone, Default)]
pub struct KeyMapper {
    reports_releases: bool,
    a_latched: bool,
}

impl KeyMapper {
    /// Creates a mapper; `reports_releases` is whether the terminal sends
    /// key-release events.
    pub fn new(reports_releases: bool) -> Self {
        Self {
            reports_releases,
            a_latched: false,
        }
    }

    /// True while A is latched down.
    pub fn a_latched(&self) -> bool {
        self.a_latched
    }

    /// Maps one key event.
    pub fn map(&mut self, key: KeyEvent) -> KeyAction {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
            return if key.kind == KeyEventKind::Release {
                KeyAction::Ignored
            } else {
                KeyAction::Quit
            };
        }

        let Some(button) = button_for(key.code) else {
            return KeyAction::Ignored;
        };

        let events = if self.reports_releases {
            match key.kind {
                KeyEventKind::Press => vec![RawEvent::press(button)],
                KeyEventKind::Release => vec![RawEvent::release(button)],
                KeyEventKind::Repeat => Vec::new(),
            }
        } else if key.kind != KeyEventKind::Press {
            Vec::new()
        } else if button == Button::A {
            self.a_latched = !self.a_latched;
            debug!(latched = self.a_latched, "A toggled");
            if self.a_latched {
                vec![RawEvent::press(button)]
            } else {
                vec![RawEvent::release(button)]
            }
        } else {
            vec![RawEvent::press(button), RawEvent::release(button)]
        };

        if events.is_empty() {
            KeyAction::Ignored
        } else {
            KeyAction::Buttons(events)
        }
    }
}
