//! End-to-end scenarios for the badge mode machine.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tictac_core::{
    AnimationCommand, Board, Button, Command, MachineSettings, Mode, ModeStateMachine, Player,
    Position, RawEvent, RenderCommand, Score, Screen, WinLine,
};

type Machine = ModeStateMachine<StdRng>;

fn machine_with(all_time: Score, draw_ends_game: bool, seed: u64) -> Machine {
    let settings = MachineSettings {
        draw_ends_game,
        ..MachineSettings::default()
    };
    ModeStateMachine::new(all_time, settings, StdRng::seed_from_u64(seed))
}

fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

fn tap(m: &mut Machine, button: Button, now: Duration) -> Vec<Command> {
    m.step(Some(RawEvent::press(button)), now);
    m.step(Some(RawEvent::release(button)), now)
}

/// A+C chord; returns the commands produced by the C release.
fn chord(m: &mut Machine, now: Duration) -> Vec<Command> {
    m.step(Some(RawEvent::press(Button::A)), now);
    m.step(Some(RawEvent::press(Button::C)), now);
    let out = m.step(Some(RawEvent::release(Button::C)), now);
    // Releasing A alone is an ordinary button release.
    m.step(Some(RawEvent::release(Button::A)), now);
    out
}

fn go_to(m: &mut Machine, col: usize, row: usize, now: Duration) {
    while m.selector().row() > row {
        tap(m, Button::Up, now);
    }
    while m.selector().row() < row {
        tap(m, Button::Down, now);
    }
    while m.selector().col() > col {
        tap(m, Button::A, now);
    }
    while m.selector().col() < col {
        tap(m, Button::C, now);
    }
    assert_eq!(m.selector(), Position::new(col, row).unwrap());
}

fn play_at(m: &mut Machine, col: usize, row: usize, now: Duration) -> Vec<Command> {
    go_to(m, col, row, now);
    tap(m, Button::B, now)
}

/// First mover takes the top row.
const ROW_ZERO_GAME: [(usize, usize); 5] = [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)];

/// Fills the board without any line:
/// ```text
/// F S F
/// F S S
/// S F F
/// ```
const DRAW_GAME: [(usize, usize); 9] = [
    (0, 0),
    (1, 0),
    (2, 0),
    (1, 1),
    (0, 1),
    (2, 1),
    (1, 2),
    (0, 2),
    (2, 2),
];

#[test]
fn test_row_zero_win_scores_and_persists() {
    let mut m = machine_with(Score::new(2, 3), false, 5);
    chord(&mut m, secs(0.0));
    assert_eq!(m.mode(), Mode::Playing);

    let first = m.turn();
    let mut last = Vec::new();
    for (col, row) in ROW_ZERO_GAME {
        last = play_at(&mut m, col, row, secs(1.0));
    }

    assert_eq!(m.mode(), Mode::GameOver);
    let win = m.win().unwrap();
    assert_eq!(win.player, first);
    assert_eq!(win.line, WinLine::Row0);
    assert_eq!(win.line.to_string(), "row-0");

    assert_eq!(m.scores().session().wins(first), 1);
    assert_eq!(m.scores().session().wins(first.opponent()), 0);
    let expected_all_time = Score::new(2, 3).increment(first);
    assert_eq!(m.scores().all_time(), expected_all_time);

    assert!(last.contains(&Command::Persist(expected_all_time)));
    assert!(last.contains(&Command::Render(RenderCommand::ShowWinLine(WinLine::Row0))));
    assert_eq!(last.last(), Some(&Command::Render(RenderCommand::Refresh)));
}

#[test]
fn test_turns_alternate_strictly() {
    let mut m = machine_with(Score::default(), false, 8);
    chord(&mut m, secs(0.0));

    let mut expected = m.turn();
    for (col, row) in DRAW_GAME {
        let out = play_at(&mut m, col, row, secs(1.0));
        let placed: Vec<Player> = out
            .iter()
            .filter_map(|c| match c {
                Command::Render(RenderCommand::PlacePiece { player, .. }) => Some(*player),
                _ => None,
            })
            .collect();
        assert_eq!(placed, vec![expected]);
        expected = expected.opponent();
    }
}

#[test]
fn test_game_over_any_release_starts_new_round() {
    let mut m = machine_with(Score::default(), false, 13);
    chord(&mut m, secs(0.0));
    for (col, row) in ROW_ZERO_GAME {
        play_at(&mut m, col, row, secs(1.0));
    }
    assert_eq!(m.mode(), Mode::GameOver);

    // Presses alone do nothing.
    assert!(m.step(Some(RawEvent::press(Button::Down)), secs(2.0)).is_empty());
    let out = m.step(Some(RawEvent::release(Button::Down)), secs(2.0));

    assert_eq!(m.mode(), Mode::Playing);
    assert_eq!(m.board(), &Board::new());
    assert_eq!(m.win(), None);
    assert!(out.contains(&Command::Render(RenderCommand::ClearPieces)));
    assert!(out.contains(&Command::Render(RenderCommand::HideWinLine)));
    assert!(out.contains(&Command::Render(RenderCommand::PlaceSelector(m.selector()))));
    assert_eq!(m.scores().session().x + m.scores().session().o, 1);
}

#[test]
fn test_double_chord_within_cooldown_changes_mode_once() {
    let mut m = machine_with(Score::default(), false, 21);
    chord(&mut m, secs(10.0));
    assert_eq!(m.mode(), Mode::Playing);

    let selector = m.selector();
    let out = chord(&mut m, secs(10.5));
    assert!(out.is_empty(), "suppressed chord must be swallowed");
    assert_eq!(m.mode(), Mode::Playing);
    // Only the trailing A release moved the selector, never C.
    assert!(m.selector().col() <= selector.col());

    chord(&mut m, secs(10.76));
    assert_eq!(m.mode(), Mode::Badge);
}

#[test]
fn test_first_chord_after_boot_always_accepted() {
    let mut m = machine_with(Score::default(), false, 1);
    chord(&mut m, Duration::ZERO);
    assert_eq!(m.mode(), Mode::Playing);
}

#[test]
fn test_session_reset_on_badge_entry_and_all_time_monotonic() {
    let mut m = machine_with(Score::new(7, 7), false, 34);
    chord(&mut m, secs(0.0));
    for (col, row) in ROW_ZERO_GAME {
        play_at(&mut m, col, row, secs(0.1));
    }
    let all_time = m.scores().all_time();
    assert_eq!(all_time.x + all_time.o, 15);

    // Leave game over, then go back to the badge.
    tap(&mut m, Button::B, secs(0.2));
    let out = chord(&mut m, secs(1.0));
    assert_eq!(m.mode(), Mode::Badge);
    assert_eq!(m.scores().session(), Score::default());
    assert_eq!(m.scores().all_time(), all_time);
    assert!(out.contains(&Command::Render(RenderCommand::ShowScreen(Screen::Badge))));
    // The strip stays dark until UP or DOWN picks an animation.
    assert!(!out.contains(&Command::Animate(AnimationCommand::Resume)));

    let out = chord(&mut m, secs(2.0));
    assert_eq!(m.mode(), Mode::Playing);
    assert!(out.contains(&Command::Render(RenderCommand::SetSessionScore(Score::default()))));
    assert!(out.contains(&Command::Render(RenderCommand::SetAllTimeScore(all_time))));
}

#[test]
fn test_draw_stays_playing_by_default() {
    let mut m = machine_with(Score::default(), false, 55);
    chord(&mut m, secs(0.0));
    for (col, row) in DRAW_GAME {
        play_at(&mut m, col, row, secs(1.0));
    }
    assert_eq!(m.mode(), Mode::Playing);
    assert_eq!(m.board().occupied(), 9);
    assert_eq!(m.selector(), Position::new(2, 2).unwrap());
    assert_eq!(m.win(), None);
    assert_eq!(m.scores().all_time(), Score::default());

    // Still stuck on a full board; a confirm is rejected quietly.
    assert!(tap(&mut m, Button::B, secs(1.5)).is_empty());
}

#[test]
fn test_draw_ends_game_when_enabled() {
    let mut m = machine_with(Score::default(), true, 55);
    chord(&mut m, secs(0.0));
    for (col, row) in DRAW_GAME {
        play_at(&mut m, col, row, secs(1.0));
    }
    assert_eq!(m.mode(), Mode::GameOver);
    assert_eq!(m.win(), None);
    assert_eq!(m.scores().session(), Score::default());

    tap(&mut m, Button::Up, secs(2.0));
    assert_eq!(m.mode(), Mode::Playing);
    assert_eq!(m.board().occupied(), 0);
}

#[test]
fn test_leds_stay_blank_while_playing() {
    let mut m = machine_with(Score::default(), false, 3);
    chord(&mut m, secs(0.0));
    for _ in 0..5 {
        let out = m.step(None, secs(1.0));
        assert!(out.is_empty(), "no idle animation ticks outside badge mode");
    }
}
