//! File-backed score store.
//!
//! The whole score map lives in one pretty-printed JSON object
//! (`{"toets1_1_en.json": {"pct": 72.5}, ...}`) and is rewritten on every
//! `record`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use quiz_core::model::QuizKey;
use tracing::{debug, info, warn};

use crate::repository::{ScoreBook, ScoreRecord, ScoreRepository, StorageError};

mod atomic;

/// Score file relative to the program directory.
pub const DEFAULT_SCORES_RELATIVE: [&str; 3] = ["assets", "score", "scores.json"];

pub struct JsonScoreStore {
    path: PathBuf,
    book: Mutex<ScoreBook>,
}

impl JsonScoreStore {
    /// Open the store at `path`, reading whatever history is there.
    ///
    /// A missing, empty or corrupt file yields an empty history.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let book = read_book(&path);
        Self {
            path,
            book: Mutex::new(book),
        }
    }

    /// `<dir>/assets/score/scores.json`.
    #[must_use]
    pub fn default_path_in(dir: &Path) -> PathBuf {
        DEFAULT_SCORES_RELATIVE
            .iter()
            .fold(dir.to_path_buf(), |acc, part| acc.join(part))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file, replacing the cached history.
    pub fn reload(&self) -> ScoreBook {
        let book = read_book(&self.path);
        if let Ok(mut guard) = self.book.lock() {
            *guard = book.clone();
        }
        book
    }
}

impl ScoreRepository for JsonScoreStore {
    fn load(&self) -> ScoreBook {
        self.book
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn record(&self, key: &QuizKey, pct: f64) -> Result<ScoreRecord, StorageError> {
        let mut guard = self
            .book
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;

        let mut next = guard.clone();
        let record = next.upsert(key, pct)?;
        atomic::write_atomic(&self.path, &next.to_json_pretty()?)?;
        *guard = next;

        info!(quiz = %key, pct = record.pct, path = %self.path.display(), "score recorded");
        Ok(record)
    }
}

impl std::fmt::Debug for JsonScoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonScoreStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn read_book(path: &Path) -> ScoreBook {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no score file yet");
            return ScoreBook::new();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "score file unreadable; starting empty");
            return ScoreBook::new();
        }
    };
    if raw.trim().is_empty() {
        return ScoreBook::new();
    }
    ScoreBook::from_json_str(&raw).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "score file corrupt; starting empty");
        ScoreBook::new()
    })
}
