//! Simulated e-paper panel.
//!
//! Setters edit a pending [`Scene`]; only a successful refresh makes it the
//! shown scene. Like the real panel, refreshing again before the minimum
//! interval fails with the remaining wait.

use std::time::{Duration, Instant};
use tictac_core::{Player, Position, RenderError, Renderer, Score, Screen, WinLine};
use tracing::{debug, instrument};

/// Panel size in pixels; the board occupies the left 128x128.
pub const PANEL_WIDTH: u16 = 296;
/// Panel height in pixels.
pub const PANEL_HEIGHT: u16 = 128;

/// Top-left pixel of each cell's tile, indexed `[row][col]`.
pub const TILE_ORIGINS: [[(u16, u16); 3]; 3] = [
    [(7, 7), (45, 7), (85, 7)],
    [(7, 45), (45, 45), (85, 45)],
    [(7, 85), (45, 85), (85, 85)],
];

/// Side of a selector or piece tile.
pub const TILE_SIZE: u16 = 32;

/// Grid lines as `(x, y, width, height)` rectangles.
pub const GRID_LINES: [(u16, u16, u16, u16); 4] = [
    (40, 5, 2, 118),
    (80, 5, 2, 118),
    (5, 40, 118, 2),
    (5, 80, 118, 2),
];

/// Pixel origin of a cell's tile.
pub fn tile_origin(position: Position) -> (u16, u16) {
    TILE_ORIGINS[position.row()][position.col()]
}

/// Corner points of the strike-through polygon for a winning line.
pub fn win_line_polygon(line: WinLine) -> [(u16, u16); 4] {
    match line {
        WinLine::Row0 => [(12, 17), (12, 23), (115, 23), (115, 17)],
        WinLine::Row1 => [(12, 57), (12, 63), (115, 63), (115, 57)],
        WinLine::Row2 => [(12, 97), (12, 103), (115, 103), (115, 97)],
        WinLine::Col0 => [(20, 12), (26, 12), (26, 115), (20, 115)],
        WinLine::Col1 => [(58, 12), (64, 12), (64, 115), (58, 115)],
        WinLine::Col2 => [(98, 12), (104, 12), (104, 115), (98, 115)],
        WinLine::DiagTld => [(5, 15), (15, 5), (115, 105), (105, 115)],
        WinLine::DiagBru => [(5, 105), (15, 115), (115, 15), (105, 5)],
    }
}

/// Session score panel text.
pub fn session_label(score: Score) -> String {
    format!("Score\nRound:\n X: {}\n O: {}", score.x, score.o)
}

/// All-time score panel text.
pub fn all_time_label(score: Score) -> String {
    format!("All:\n X: {}\n O: {}", score.x, score.o)
}

/// Everything drawn on the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    /// Root screen.
    pub screen: Screen,
    /// Selector cell.
    pub selector: Option<Position>,
    /// Played pieces, in play order.
    pub pieces: Vec<(Position, Player)>,
    /// Strike-through, when a game is won.
    pub win_line: Option<WinLine>,
    /// Session score panel.
    pub session: Score,
    /// All-time score panel.
    pub all_time: Score,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            screen: Screen::Badge,
            selector: None,
            pieces: Vec::new(),
            win_line: None,
            session: Score::default(),
            all_time: Score::default(),
        }
    }
}

/// The simulated panel.
#[derive(Debug)]
pub struct TerminalDisplay {
    pending: Scene,
    shown: Scene,
    min_refresh: Duration,
    last_refresh: Option<Instant>,
    refreshes: u64,
}

impl TerminalDisplay {
    /// Creates a blank panel with the given minimum refresh interval.
    pub fn new(min_refresh: Duration) -> Self {
        Self {
            pending: Scene::default(),
            shown: Scene::default(),
            min_refresh,
            last_refresh: None,
            refreshes: 0,
        }
    }

    /// Scene currently visible.
    pub fn shown(&self) -> &Scene {
        &self.shown
    }

    /// Scene that the next refresh will show.
    pub fn pending(&self) -> &Scene {
        &self.pending
    }

    /// Successful refresh count.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Time left before the panel accepts a refresh at `now`.
    pub fn time_to_refresh(&self, now: Instant) -> Duration {
        self.last_refresh
            .map(|last| (last + self.min_refresh).saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Refreshes as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// [`RenderError::TooSoon`] inside the minimum refresh interval.
    #[instrument(skip(self), fields(refreshes = self.refreshes))]
    pub fn refresh_at(&mut self, now: Instant) -> Result<(), RenderError> {
        let wait = self.time_to_refresh(now);
        if !wait.is_zero() {
            return Err(RenderError::TooSoon { wait });
        }
        self.shown = self.pending.clone();
        self.last_refresh = Some(now);
        self.refreshes += 1;
        debug!(screen = %self.shown.screen, pieces = self.shown.pieces.len(), "Panel refreshed");
        Ok(())
    }
}

impl Renderer for TerminalDisplay {
    fn show_screen(&mut self, screen: Screen) {
        self.pending.screen = screen;
    }

    fn place_selector(&mut self, position: Position) {
        self.pending.selector = Some(position);
    }

    fn place_piece(&mut self, position: Position, player: Player) {
        self.pending.pieces.push((position, player));
    }

    fn clear_pieces(&mut self) {
        self.pending.pieces.clear();
    }

    fn show_win_line(&mut self, line: WinLine) {
        self.pending.win_line = Some(line);
    }

    fn hide_win_line(&mut self) {
        self.pending.win_line = None;
    }

    fn set_session_score(&mut self, score: Score) {
        self.pending.session = score;
    }

    fn set_all_time_score(&mut self, score: Score) {
        self.pending.all_time = score;
    }

    fn refresh(&mut self) -> Result<(), RenderError> {
        self.refresh_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_stay_pending_until_refresh() {
        let mut display = TerminalDisplay::new(Duration::from_secs(1));
        display.show_screen(Screen::Game);
        display.place_piece(Position::new(1, 1).unwrap(), Player::X);
        assert_eq!(display.shown(), &Scene::default());

        display.refresh_at(Instant::now()).unwrap();
        assert_eq!(display.shown().screen, Screen::Game);
        assert_eq!(display.shown().pieces.len(), 1);
    }

    #[test]
    fn test_refresh_too_soon_reports_wait() {
        let mut display = TerminalDisplay::new(Duration::from_secs(2));
        let start = Instant::now();
        display.refresh_at(start).unwrap();

        let err = display
            .refresh_at(start + Duration::from_millis(500))
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::TooSoon {
                wait: Duration::from_millis(1500)
            }
        );
        assert_eq!(display.refreshes(), 1);

        display.refresh_at(start + Duration::from_secs(2)).unwrap();
        assert_eq!(display.refreshes(), 2);
    }

    #[test]
    fn test_tile_origins() {
        assert_eq!(tile_origin(Position::new(0, 0).unwrap()), (7, 7));
        assert_eq!(tile_origin(Position::new(2, 1).unwrap()), (85, 45));
        assert_eq!(tile_origin(Position::new(1, 2).unwrap()), (45, 85));
    }

    #[test]
    fn test_win_polygons_span_their_line() {
        let [a, _, c, _] = win_line_polygon(WinLine::DiagBru);
        assert!(a.0 < c.0 && a.1 > c.1, "anti-diagonal rises left to right");
        let [a, _, c, _] = win_line_polygon(WinLine::DiagTld);
        assert!(a.0 < c.0 && a.1 < c.1);
    }

    #[test]
    fn test_labels() {
        assert_eq!(session_label(Score::new(1, 2)), "Score\nRound:\n X: 1\n O: 2");
        assert_eq!(all_time_label(Score::new(10, 0)), "All:\n X: 10\n O: 0");
    }
}
