//! Badge mode state machine.
//!
//! One [`ModeStateMachine`] owns the board, turn, selector, scores and input
//! state. It is driven by [`ModeStateMachine::step`], once per loop iteration,
//! and answers with the [`Command`]s the collaborators should carry out.

use crate::engine::{play, reset};
use crate::input::{
    Button, ButtonRelease, COOLDOWN, Cooldown, HeldButtons, InputDebouncer, RawEvent,
};
use crate::rules::{WinResult, check_winner, is_full};
use crate::selector::{move_down, move_left, move_right, move_up, random_cell, random_empty};
use crate::{
    AnimationCommand, Board, Command, Player, Position, RenderCommand, Rgb, Score, ScoreTracker,
    Screen,
};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Top-level badge mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum Mode {
    /// Idle; LEDs animate.
    #[default]
    Badge,
    /// A game is in progress.
    Playing,
    /// A game was won; waiting for any button.
    GameOver,
}

/// Cycles LED brightness through 0.2, 0.4, 0.6, 0.8, 1.0 and around again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessRamp {
    base: u32,
    current: f32,
}

impl BrightnessRamp {
    /// Brightness before the first step.
    pub const INITIAL: f32 = 0.2;

    /// Starts at [`Self::INITIAL`].
    pub fn new() -> Self {
        Self {
            base: 0,
            current: Self::INITIAL,
        }
    }

    /// The level most recently applied.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Moves to the next level and returns it.
    pub fn step(&mut self) -> f32 {
        self.current = (self.base % 10) as f32 / 10.0 + 0.2;
        self.base = self.base.wrapping_add(2);
        self.current
    }
}

impl Default for BrightnessRamp {
    fn default() -> Self {
        Self::new()
    }
}

/// Tunables for the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineSettings {
    /// Minimum spacing between accepted A+C mode changes.
    pub cooldown: Duration,
    /// When set, a full board without a winner ends the game unscored.
    pub draw_ends_game: bool,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            cooldown: COOLDOWN,
            draw_ends_game: false,
        }
    }
}

/// The badge application state.
#[derive(Debug)]
pub struct ModeStateMachine<R> {
    mode: Mode,
    board: Board,
    turn: Player,
    selector: Position,
    win: Option<WinResult>,
    scores: ScoreTracker,
    input: InputDebouncer,
    cooldown: Cooldown,
    brightness: BrightnessRamp,
    accent: Option<Rgb>,
    settings: MachineSettings,
    rng: R,
}

impl<R: Rng> ModeStateMachine<R> {
    /// Creates a machine in Badge mode with the loaded all-time score.
    pub fn new(all_time: Score, settings: MachineSettings, mut rng: R) -> Self {
        let turn = Player::random(&mut rng);
        let selector = random_cell(&mut rng);
        Self {
            mode: Mode::Badge,
            board: Board::new(),
            turn,
            selector,
            win: None,
            scores: ScoreTracker::new(all_time),
            input: InputDebouncer::new(),
            cooldown: Cooldown::new(settings.cooldown),
            brightness: BrightnessRamp::new(),
            accent: None,
            settings,
            rng,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player to move next.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Selector position.
    pub fn selector(&self) -> Position {
        self.selector
    }

    /// Winning line of the finished game, if any.
    pub fn win(&self) -> Option<WinResult> {
        self.win
    }

    /// Session and all-time scores.
    pub fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    /// Buttons currently held.
    pub fn held(&self) -> HeldButtons {
        self.input.held()
    }

    /// Current LED brightness.
    pub fn brightness(&self) -> f32 {
        self.brightness.current()
    }

    /// Last accent color set over HTTP.
    pub fn accent(&self) -> Option<Rgb> {
        self.accent
    }

    /// Commands that draw the initial Badge screen.
    pub fn startup(&self) -> Vec<Command> {
        vec![
            RenderCommand::SetSessionScore(self.scores.session()).into(),
            RenderCommand::SetAllTimeScore(self.scores.all_time()).into(),
            RenderCommand::ShowScreen(Screen::Badge).into(),
            RenderCommand::Refresh.into(),
            AnimationCommand::SetBrightness(self.brightness.current()).into(),
        ]
    }

    /// Records the accent color. In Badge mode the strip is frozen and filled
    /// with it at the current brightness; in other modes it is only stored.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn set_accent_color(&mut self, color: Rgb) -> Vec<Command> {
        self.accent = Some(color);
        if self.mode != Mode::Badge {
            debug!("Accent stored; LEDs stay blank outside badge mode");
            return Vec::new();
        }
        info!(%color, "Accent color applied");
        vec![
            AnimationCommand::SetBrightness(self.brightness.current()).into(),
            AnimationCommand::Freeze.into(),
            AnimationCommand::Fill(color).into(),
        ]
    }

    /// Runs one loop iteration: consumes at most one raw event, updates
    /// state, and returns the resulting commands.
    ///
    /// `now` is a monotonic timestamp used only for the chord cooldown.
    pub fn step(&mut self, event: Option<RawEvent>, now: Duration) -> Vec<Command> {
        let release = event.and_then(|e| self.input.feed(e));
        let mut out = Vec::new();
        match self.mode {
            Mode::Badge => self.step_badge(release, now, &mut out),
            Mode::Playing => {
                if let Some(release) = release {
                    self.step_playing(release, now, &mut out);
                }
            }
            Mode::GameOver => {
                if let Some(release) = release {
                    debug!(button = %release.button, "Leaving game over");
                    self.start_round(&mut out);
                    self.mode = Mode::Playing;
                }
            }
        }
        out
    }

    fn step_badge(&mut self, release: Option<ButtonRelease>, now: Duration, out: &mut Vec<Command>) {
        out.push(AnimationCommand::Advance.into());
        let Some(release) = release else {
            return;
        };

        // Every C release steps the ramp, chord or not.
        if release.button == Button::C {
            let level = self.brightness.step();
            debug!(level, "Brightness stepped");
            out.push(AnimationCommand::SetBrightness(level).into());
        }

        if release.is_mode_chord() {
            if self.cooldown.try_accept(now) {
                self.enter_playing(out);
            } else {
                debug!("Chord inside cooldown, ignored");
            }
            return;
        }

        match release.button {
            Button::Up => {
                out.push(AnimationCommand::Resume.into());
                out.push(AnimationCommand::Next.into());
            }
            Button::Down => {
                out.push(AnimationCommand::Resume.into());
                out.push(AnimationCommand::Previous.into());
            }
            Button::B => {
                out.push(AnimationCommand::Freeze.into());
                out.push(AnimationCommand::Fill(Rgb::BLACK).into());
            }
            Button::A | Button::C => {}
        }
    }

    fn step_playing(&mut self, release: ButtonRelease, now: Duration, out: &mut Vec<Command>) {
        if release.is_mode_chord() {
            if self.cooldown.try_accept(now) {
                self.enter_badge(out);
            }
            return;
        }

        let moved = match release.button {
            Button::Up => move_up(self.selector),
            Button::Down => move_down(self.selector),
            Button::A => move_left(self.selector),
            Button::C => move_right(self.selector),
            Button::B => {
                self.confirm(out);
                return;
            }
        };

        if moved != self.selector {
            self.selector = moved;
            out.push(RenderCommand::PlaceSelector(moved).into());
            out.push(RenderCommand::Refresh.into());
        }
    }

    #[instrument(skip(self, out), fields(turn = %self.turn, selector = %self.selector))]
    fn confirm(&mut self, out: &mut Vec<Command>) {
        let target = self.selector;
        let board = match play(&self.board, self.turn, (target.col(), target.row())) {
            Ok(board) => board,
            Err(e) => {
                warn!(error = %e, "Can't play there");
                return;
            }
        };

        self.board = board;
        out.push(
            RenderCommand::PlacePiece {
                position: target,
                player: self.turn,
            }
            .into(),
        );
        self.turn = self.turn.opponent();
        self.selector = random_empty(&mut self.rng, &self.board, self.selector);
        out.push(RenderCommand::PlaceSelector(self.selector).into());
        debug!(board = %self.board.display(), "Move played");

        if let Some(result) = check_winner(&self.board) {
            info!(player = %result.player, line = %result.line, "Game won");
            self.scores.record_win(result.player);
            self.win = Some(result);
            self.mode = Mode::GameOver;
            out.push(Command::Persist(self.scores.all_time()));
            out.push(RenderCommand::ShowWinLine(result.line).into());
            out.push(RenderCommand::SetSessionScore(self.scores.session()).into());
            out.push(RenderCommand::SetAllTimeScore(self.scores.all_time()).into());
        } else if is_full(&self.board) && self.settings.draw_ends_game {
            info!("Board full with no winner, game drawn");
            self.mode = Mode::GameOver;
        }
        out.push(RenderCommand::Refresh.into());
    }

    /// Clears the board and picks a fresh turn and selector.
    fn start_round(&mut self, out: &mut Vec<Command>) {
        self.board = reset(&self.board);
        self.win = None;
        self.turn = Player::random(&mut self.rng);
        self.selector = random_cell(&mut self.rng);
        info!(turn = %self.turn, selector = %self.selector, "New round");
        out.push(RenderCommand::ClearPieces.into());
        out.push(RenderCommand::HideWinLine.into());
        out.push(RenderCommand::PlaceSelector(self.selector).into());
        out.push(RenderCommand::Refresh.into());
    }

    fn enter_playing(&mut self, out: &mut Vec<Command>) {
        info!("Entering game mode");
        self.mode = Mode::Playing;
        out.push(AnimationCommand::Freeze.into());
        out.push(AnimationCommand::Fill(Rgb::BLACK).into());
        out.push(RenderCommand::SetSessionScore(self.scores.session()).into());
        out.push(RenderCommand::SetAllTimeScore(self.scores.all_time()).into());
        out.push(RenderCommand::ShowScreen(Screen::Game).into());
        self.start_round(out);
    }

    fn enter_badge(&mut self, out: &mut Vec<Command>) {
        info!(session = ?self.scores.session(), "Returning to badge mode");
        self.mode = Mode::Badge;
        self.scores.reset_session();
        out.push(RenderCommand::SetSessionScore(self.scores.session()).into());
        out.push(RenderCommand::ShowScreen(Screen::Badge).into());
        out.push(RenderCommand::Refresh.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn machine() -> ModeStateMachine<StdRng> {
        ModeStateMachine::new(
            Score::default(),
            MachineSettings::default(),
            StdRng::seed_from_u64(11),
        )
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn chord(m: &mut ModeStateMachine<StdRng>, at: Duration) -> Vec<Command> {
        m.step(Some(RawEvent::press(Button::A)), at);
        m.step(Some(RawEvent::press(Button::C)), at);
        let out = m.step(Some(RawEvent::release(Button::C)), at);
        m.step(Some(RawEvent::release(Button::A)), at);
        out
    }

    fn tap(m: &mut ModeStateMachine<StdRng>, button: Button, at: Duration) -> Vec<Command> {
        m.step(Some(RawEvent::press(button)), at);
        m.step(Some(RawEvent::release(button)), at)
    }

    #[test]
    fn test_brightness_ramp() {
        let mut ramp = BrightnessRamp::new();
        assert!((ramp.current() - 0.2).abs() < 1e-6);
        let levels: Vec<f32> = (0..6).map(|_| ramp.step()).collect();
        let expected = [0.2, 0.4, 0.6, 0.8, 1.0, 0.2];
        for (got, want) in levels.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{got} != {want}");
        }
    }

    #[test]
    fn test_idle_tick_advances_animation() {
        let mut m = machine();
        let out = m.step(None, ms(0));
        assert_eq!(out, vec![Command::Animate(AnimationCommand::Advance)]);
    }

    #[test]
    fn test_chord_enters_playing_and_blanks_leds() {
        let mut m = machine();
        let out = chord(&mut m, ms(10));
        assert_eq!(m.mode(), Mode::Playing);
        assert!(out.contains(&Command::Animate(AnimationCommand::Freeze)));
        assert!(out.contains(&Command::Animate(AnimationCommand::Fill(Rgb::BLACK))));
        assert!(out.contains(&Command::Render(RenderCommand::ShowScreen(Screen::Game))));
        assert_eq!(out.last(), Some(&Command::Render(RenderCommand::Refresh)));
        assert_eq!(m.board(), &Board::new());
    }

    #[test]
    fn test_accepted_chord_steps_brightness() {
        let mut m = machine();
        let out = chord(&mut m, ms(1000));
        assert_eq!(m.mode(), Mode::Playing);
        assert_eq!(out[1], Command::Animate(AnimationCommand::SetBrightness(0.2)));
        assert!(out.contains(&Command::Animate(AnimationCommand::Fill(Rgb::BLACK))));

        // Back in Badge the ramp carries on from where the chord left it.
        chord(&mut m, ms(2000));
        assert_eq!(m.mode(), Mode::Badge);
        let out = tap(&mut m, Button::C, ms(2100));
        assert!(out.iter().any(|c| matches!(
            c,
            Command::Animate(AnimationCommand::SetBrightness(b)) if (b - 0.4).abs() < 1e-6
        )));
    }

    #[test]
    fn test_suppressed_chord_still_steps_brightness() {
        let mut m = machine();
        chord(&mut m, ms(1000));
        chord(&mut m, ms(2000));
        assert_eq!(m.mode(), Mode::Badge);

        let out = chord(&mut m, ms(2200));
        assert_eq!(m.mode(), Mode::Badge, "inside cooldown");
        assert_eq!(
            out,
            vec![
                Command::Animate(AnimationCommand::Advance),
                Command::Animate(AnimationCommand::SetBrightness(0.4)),
            ]
        );
        assert!((m.brightness() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_badge_entry_leaves_leds_frozen() {
        let mut m = machine();
        chord(&mut m, ms(1000));
        let out = chord(&mut m, ms(2000));
        assert_eq!(m.mode(), Mode::Badge);
        assert!(!out.contains(&Command::Animate(AnimationCommand::Resume)));

        let out = tap(&mut m, Button::Up, ms(2100));
        assert!(out.contains(&Command::Animate(AnimationCommand::Resume)));
    }

    #[test]
    fn test_plain_c_steps_brightness() {
        let mut m = machine();
        let out = tap(&mut m, Button::C, ms(0));
        assert!(out.contains(&Command::Animate(AnimationCommand::SetBrightness(0.2))));
        let out = tap(&mut m, Button::C, ms(0));
        assert_eq!(m.mode(), Mode::Badge);
        assert!(
            out.iter()
                .any(|c| matches!(c, Command::Animate(AnimationCommand::SetBrightness(b)) if (b - 0.4).abs() < 1e-6))
        );
    }

    #[test]
    fn test_badge_buttons() {
        let mut m = machine();
        let out = tap(&mut m, Button::Up, ms(0));
        assert_eq!(
            &out[1..],
            &[
                Command::Animate(AnimationCommand::Resume),
                Command::Animate(AnimationCommand::Next)
            ]
        );
        let out = tap(&mut m, Button::Down, ms(0));
        assert_eq!(out[2], Command::Animate(AnimationCommand::Previous));
        let out = tap(&mut m, Button::B, ms(0));
        assert_eq!(out[2], Command::Animate(AnimationCommand::Fill(Rgb::BLACK)));
    }

    #[test]
    fn test_playing_moves_selector_with_clamp() {
        let mut m = machine();
        chord(&mut m, ms(0));
        for _ in 0..3 {
            tap(&mut m, Button::Up, ms(1));
            tap(&mut m, Button::A, ms(1));
        }
        assert_eq!(m.selector(), Position::new(0, 0).unwrap());
        let out = tap(&mut m, Button::Up, ms(1));
        assert!(out.is_empty(), "boundary move must not redraw");
        tap(&mut m, Button::C, ms(1));
        tap(&mut m, Button::Down, ms(1));
        assert_eq!(m.selector(), Position::new(1, 1).unwrap());
    }

    #[test]
    fn test_confirm_plays_and_alternates_turn() {
        let mut m = machine();
        chord(&mut m, ms(0));
        let first = m.turn();
        let target = m.selector();
        let out = tap(&mut m, Button::B, ms(1));
        assert!(out.contains(&Command::Render(RenderCommand::PlacePiece {
            position: target,
            player: first
        })));
        assert_eq!(m.turn(), first.opponent());
        assert_eq!(m.board().occupied(), 1);
        assert!(m.board().is_empty(m.selector()), "selector moves to an empty cell");
    }

    #[test]
    fn test_confirm_on_occupied_is_ignored() {
        let mut m = machine();
        chord(&mut m, ms(0));
        let target = m.selector();
        tap(&mut m, Button::B, ms(1));
        m.selector = target;
        let turn = m.turn();
        let board = *m.board();
        let out = tap(&mut m, Button::B, ms(1));
        assert!(out.is_empty());
        assert_eq!(m.turn(), turn);
        assert_eq!(m.board(), &board);
    }

    #[test]
    fn test_http_color_outside_badge_is_only_stored() {
        let mut m = machine();
        chord(&mut m, ms(0));
        assert!(m.set_accent_color(Rgb::new(0x00FF00)).is_empty());
        assert_eq!(m.accent(), Some(Rgb::new(0x00FF00)));
    }

    #[test]
    fn test_http_color_in_badge_freezes_and_fills() {
        let mut m = machine();
        let out = m.set_accent_color(Rgb::new(0xFF0000));
        assert_eq!(
            out,
            vec![
                Command::Animate(AnimationCommand::SetBrightness(BrightnessRamp::INITIAL)),
                Command::Animate(AnimationCommand::Freeze),
                Command::Animate(AnimationCommand::Fill(Rgb::new(0xFF0000))),
            ]
        );
    }

    #[test]
    fn test_startup_shows_badge() {
        let m = machine();
        let out = m.startup();
        assert!(out.contains(&Command::Render(RenderCommand::ShowScreen(Screen::Badge))));
        assert!(out.contains(&Command::Render(RenderCommand::Refresh)));
    }
}
