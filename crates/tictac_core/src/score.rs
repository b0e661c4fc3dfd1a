//! Session and all-time score bookkeeping.

use crate::Player;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Win counters for X and O.
///
/// Deserialization is strict: a record missing either field is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Score {
    /// Wins for X.
    #[serde(rename = "X")]
    pub x: u32,
    /// Wins for O.
    #[serde(rename = "O")]
    pub o: u32,
}

impl Score {
    /// Creates a score.
    pub fn new(x: u32, o: u32) -> Self {
        Self { x, o }
    }

    /// Wins recorded for `player`.
    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }

    /// Returns a copy with one more win for `player`.
    pub fn increment(self, player: Player) -> Self {
        match player {
            Player::X => Self {
                x: self.x.saturating_add(1),
                ..self
            },
            Player::O => Self {
                o: self.o.saturating_add(1),
                ..self
            },
        }
    }
}

/// What went wrong talking to persistent score storage.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StoreErrorKind {
    /// Nothing stored yet (first boot).
    #[display("no score record stored")]
    NoData,
    /// A record exists but could not be decoded.
    #[display("corrupt score record: {_0}")]
    Corrupt(String),
    /// The storage medium failed.
    #[display("storage failure: {_0}")]
    Io(String),
}

/// Score storage error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Score store error: {} at {}:{}", kind, file, line)]
pub struct StoreError {
    /// Error category.
    pub kind: StoreErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// True for the first-boot condition.
    pub fn is_no_data(&self) -> bool {
        self.kind == StoreErrorKind::NoData
    }
}

/// Non-volatile storage for the all-time score.
pub trait ScoreStore {
    /// Reads the stored record.
    ///
    /// # Errors
    ///
    /// [`StoreErrorKind::NoData`] when nothing has been written yet.
    fn read(&mut self) -> Result<Score, StoreError>;

    /// Writes the record. With `test_run` set the write is only logged.
    fn write(&mut self, score: Score, test_run: bool) -> Result<(), StoreError>;
}

/// Session and all-time scores, owned by the mode machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreTracker {
    session: Score,
    all_time: Score,
}

impl ScoreTracker {
    /// Starts a tracker with an empty session and the loaded all-time score.
    pub fn new(all_time: Score) -> Self {
        Self {
            session: Score::default(),
            all_time,
        }
    }

    /// Current session score.
    pub fn session(&self) -> Score {
        self.session
    }

    /// Current all-time score.
    pub fn all_time(&self) -> Score {
        self.all_time
    }

    /// Credits a win to both counters.
    #[instrument(skip(self))]
    pub fn record_win(&mut self, player: Player) {
        self.session = self.session.increment(player);
        self.all_time = self.all_time.increment(player);
        info!(session = ?self.session, all_time = ?self.all_time, "Win recorded");
    }

    /// Zeroes the session score.
    pub fn reset_session(&mut self) {
        self.session = Score::default();
    }
}

/// Loads the all-time score, writing a zero record on first boot.
///
/// # Errors
///
/// Any store error other than `NoData`, or a failure writing the default.
#[instrument(skip(store))]
pub fn load_persisted(store: &mut dyn ScoreStore) -> Result<Score, StoreError> {
    match store.read() {
        Ok(score) => {
            info!(?score, "Loaded all-time score");
            Ok(score)
        }
        Err(e) if e.is_no_data() => {
            warn!("No stored score, writing defaults");
            let score = Score::default();
            store.write(score, false)?;
            Ok(score)
        }
        Err(e) => Err(e),
    }
}

/// Writes the all-time score through to storage.
///
/// # Errors
///
/// Propagates the store's write error.
#[instrument(skip(store))]
pub fn persist(store: &mut dyn ScoreStore, score: Score) -> Result<(), StoreError> {
    store.write(score, false)
}
