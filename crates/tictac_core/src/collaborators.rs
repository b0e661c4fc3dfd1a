//! Collaborator seams and the executor that drives them.

use crate::{
    AnimationCommand, BadgeError, Command, Player, Position, RenderCommand, Rgb, Score,
    ScoreStore, Screen, WinLine, persist,
};
use std::time::Duration;
use tracing::{error, instrument, trace, warn};

/// Extra sleep added to the display's requested wait before retrying a refresh.
pub const RETRY_MARGIN: Duration = Duration::from_millis(600);

/// Display failures.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RenderError {
    /// The panel was refreshed again before its minimum interval.
    #[display("Refresh too soon, panel ready in {wait:?}")]
    TooSoon {
        /// Time until the panel accepts another refresh.
        wait: Duration,
    },

    /// Anything else the display backend reports.
    #[display("Display backend error: {_0}")]
    Backend(#[error(not(source))] String),
}

/// Bitmap display with deferred refresh.
///
/// All setters change the pending scene only; nothing is visible until
/// [`Renderer::refresh`] succeeds.
pub trait Renderer {
    /// Switches the root screen.
    fn show_screen(&mut self, screen: Screen);
    /// Moves the selector outline to a cell.
    fn place_selector(&mut self, position: Position);
    /// Draws a piece at a cell.
    fn place_piece(&mut self, position: Position, player: Player);
    /// Removes all pieces.
    fn clear_pieces(&mut self);
    /// Draws the winning strike-through.
    fn show_win_line(&mut self, line: WinLine);
    /// Removes the strike-through.
    fn hide_win_line(&mut self);
    /// Updates the session score panel.
    fn set_session_score(&mut self, score: Score);
    /// Updates the all-time score panel.
    fn set_all_time_score(&mut self, score: Score);
    /// Pushes the pending scene to the panel.
    ///
    /// # Errors
    ///
    /// [`RenderError::TooSoon`] when the panel is still inside its minimum
    /// refresh interval.
    fn refresh(&mut self) -> Result<(), RenderError>;
}

/// LED animation sequence player.
pub trait Animation {
    /// Runs one tick of the current animation, if not frozen.
    fn advance(&mut self);
    /// Stops animating.
    fn freeze(&mut self);
    /// Resumes animating.
    fn resume(&mut self);
    /// Sets all pixels to `color`.
    fn fill(&mut self, color: Rgb);
    /// Selects the next animation.
    fn next(&mut self);
    /// Selects the previous animation.
    fn previous(&mut self);
    /// Sets strip brightness.
    fn set_brightness(&mut self, brightness: f32);
}

/// Applies machine commands to the collaborators, in order.
pub struct Executor<R, A, S> {
    renderer: R,
    animation: A,
    store: S,
    retry_margin: Duration,
    sleep: fn(Duration),
}

impl<R, A, S> Executor<R, A, S>
where
    R: Renderer,
    A: Animation,
    S: ScoreStore,
{
    /// Creates an executor that sleeps the calling thread before a retry.
    pub fn new(renderer: R, animation: A, store: S) -> Self {
        Self {
            renderer,
            animation,
            store,
            retry_margin: RETRY_MARGIN,
            sleep: std::thread::sleep,
        }
    }

    /// Overrides the margin added to the display's wait hint.
    pub fn with_retry_margin(mut self, margin: Duration) -> Self {
        self.retry_margin = margin;
        self
    }

    /// Overrides how the executor waits before a retry.
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    /// The display.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The LED player.
    pub fn animation(&self) -> &A {
        &self.animation
    }

    /// The score store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies every command.
    ///
    /// Persistence failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::Render`] when a refresh fails after its retry, or
    /// fails with anything other than a timing fault.
    #[instrument(skip_all, fields(count = commands.len()))]
    pub fn execute(&mut self, commands: &[Command]) -> Result<(), BadgeError> {
        for command in commands {
            match *command {
                Command::Render(cmd) => self.render(cmd)?,
                Command::Animate(cmd) => self.animate(cmd),
                Command::Persist(score) => {
                    if let Err(e) = persist(&mut self.store, score) {
                        error!(error = %e, ?score, "Failed to persist all-time score");
                    }
                }
            }
        }
        Ok(())
    }

    fn render(&mut self, cmd: RenderCommand) -> Result<(), BadgeError> {
        match cmd {
            RenderCommand::ShowScreen(screen) => self.renderer.show_screen(screen),
            RenderCommand::PlaceSelector(pos) => self.renderer.place_selector(pos),
            RenderCommand::PlacePiece { position, player } => {
                self.renderer.place_piece(position, player)
            }
            RenderCommand::ClearPieces => self.renderer.clear_pieces(),
            RenderCommand::ShowWinLine(line) => self.renderer.show_win_line(line),
            RenderCommand::HideWinLine => self.renderer.hide_win_line(),
            RenderCommand::SetSessionScore(score) => self.renderer.set_session_score(score),
            RenderCommand::SetAllTimeScore(score) => self.renderer.set_all_time_score(score),
            RenderCommand::Refresh => self.refresh_with_retry()?,
        }
        Ok(())
    }

    fn refresh_with_retry(&mut self) -> Result<(), BadgeError> {
        match self.renderer.refresh() {
            Ok(()) => Ok(()),
            Err(RenderError::TooSoon { wait }) => {
                let delay = wait + self.retry_margin;
                warn!(?wait, ?delay, "Display refreshed too soon, retrying once");
                (self.sleep)(delay);
                self.renderer.refresh().map_err(|e| {
                    error!(error = %e, "Refresh retry failed");
                    BadgeError::from(e)
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn animate(&mut self, cmd: AnimationCommand) {
        trace!(?cmd, "Animation command");
        match cmd {
            AnimationCommand::Advance => self.animation.advance(),
            AnimationCommand::Freeze => self.animation.freeze(),
            AnimationCommand::Resume => self.animation.resume(),
            AnimationCommand::Fill(color) => self.animation.fill(color),
            AnimationCommand::Next => self.animation.next(),
            AnimationCommand::Previous => self.animation.previous(),
            AnimationCommand::SetBrightness(b) => self.animation.set_brightness(b),
        }
    }
}
