//! JSON-file persistence for the progress document.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use super::state::ProgressState;

/// Loads and saves the progress document at a fixed path.
///
/// `load` never fails: a missing, unreadable, or malformed file yields an
/// empty document, so a damaged progress file costs at most re-crawling
/// work the entity store already holds. `save` rewrites the file atomically
/// via a temp file in the same directory.
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Read the document, falling back to an empty one on any failure.
    pub fn load(&self) -> ProgressState {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no progress file, starting fresh");
                return ProgressState::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "progress file unreadable, starting fresh");
                return ProgressState::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "progress file malformed, starting fresh");
                ProgressState::default()
            }
        }
    }

    /// Stamp `last_updated` and write the document. Returns whether the
    /// write succeeded; failures are logged, never propagated, so a full
    /// disk cannot take down a crawl that is otherwise persisting entities.
    pub fn save(&self, state: &mut ProgressState) -> bool {
        state.last_updated = Some(Utc::now());

        match self.write_atomic(state) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to save progress file");
                false
            }
        }
    }

    fn write_atomic(&self, state: &ProgressState) -> anyhow::Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let body = serde_json::to_string_pretty(state)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(body.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path)?;

        Ok(())
    }
}
