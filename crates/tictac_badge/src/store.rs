//! All-time score kept in a small JSON file, standing in for badge NVM.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tictac_core::{Score, ScoreStore, StoreError, StoreErrorKind};
use tracing::{debug, info, instrument};

/// JSON-file score store.
///
/// A missing or empty file reads as first boot.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    /// Creates a store backed by `path`. Nothing is touched until the first
    /// read or write.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        info!("Creating JsonScoreStore");
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonScoreStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn read(&mut self) -> Result<Score, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::new(StoreErrorKind::NoData));
            }
            Err(e) => return Err(StoreError::new(StoreErrorKind::Io(e.to_string()))),
        };

        if content.trim().is_empty() {
            return Err(StoreError::new(StoreErrorKind::NoData));
        }

        let score: Score = serde_json::from_str(&content)
            .map_err(|e| StoreError::new(StoreErrorKind::Corrupt(e.to_string())))?;
        debug!(?score, "Score read");
        Ok(score)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn write(&mut self, score: Score, test_run: bool) -> Result<(), StoreError> {
        let json = serde_json::to_string(&score)
            .map_err(|e| StoreError::new(StoreErrorKind::Corrupt(e.to_string())))?;
        if test_run {
            info!(%json, "Test run, score not written");
            return Ok(());
        }
        // Stage beside the record, then rename over it, so a crash leaves
        // either the old record or the new one.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io = |e: std::io::Error| StoreError::new(StoreErrorKind::Io(e.to_string()));
        let mut staged = NamedTempFile::new_in(dir).map_err(io)?;
        staged.write_all(json.as_bytes()).map_err(io)?;
        staged.as_file().sync_all().map_err(io)?;
        staged.persist(&self.path).map_err(|e| io(e.error))?;
        debug!(?score, "Score written");
        Ok(())
    }
}
