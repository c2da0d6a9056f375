use quiz_core::model::QuizKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::json::JsonScoreStore;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors surfaced by score store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("score must be a finite number, got {0}")]
    NonFinite(f64),

    #[error("score store lock poisoned: {0}")]
    Poisoned(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("could not replace score file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Last achieved percentage for one quiz file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub pct: f64,
}

/// Rounds `value` to `decimals` places, ties to even. Never returns `-0.0`.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor + 0.0
}

/// Every persisted score entry, keyed by quiz file basename.
///
/// Entries are kept as raw JSON so a rewrite never drops values this
/// program cannot interpret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBook {
    entries: BTreeMap<String, Value>,
}

impl ScoreBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a score file body; the top level must be a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` for anything that is not an object.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Pretty-printed UTF-8 body for the score file.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if an entry cannot be serialized.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored percentage as written, accepting numbers and numeric strings.
    #[must_use]
    pub fn pct(&self, key: &str) -> Option<f64> {
        let pct = match self.entries.get(key)?.get("pct")? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        pct.is_finite().then_some(pct)
    }

    /// Entries whose percentage can be read.
    #[must_use]
    pub fn records(&self) -> BTreeMap<String, ScoreRecord> {
        self.entries
            .keys()
            .filter_map(|key| self.pct(key).map(|pct| (key.clone(), ScoreRecord { pct })))
            .collect()
    }

    /// Round `pct` to two decimals and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NonFinite` for NaN or infinite input.
    pub fn upsert(&mut self, key: &QuizKey, pct: f64) -> Result<ScoreRecord, StorageError> {
        if !pct.is_finite() {
            return Err(StorageError::NonFinite(pct));
        }
        let record = ScoreRecord {
            pct: round_to(pct, 2),
        };
        let value = serde_json::to_value(record)?;
        self.entries.insert(key.as_str().to_owned(), value);
        Ok(record)
    }
}

//
// ─── REPOSITORY CONTRACT ──────────────────────────────────────────────────────
//

/// Last-score persistence keyed by quiz file basename.
pub trait ScoreRepository: Send + Sync {
    /// Current score history. Never fails: unreadable state is an empty book.
    fn load(&self) -> ScoreBook;

    /// Round `pct` to two decimals, upsert it under `key` and persist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value is not finite or cannot be written.
    fn record(&self, key: &QuizKey, pct: f64) -> Result<ScoreRecord, StorageError>;

    /// Stored percentage rounded to one decimal for display.
    fn percent_for(&self, key: &QuizKey) -> Option<f64> {
        self.load().pct(key.as_str()).map(|pct| round_to(pct, 1))
    }
}

/// Simple in-memory score store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryScoreRepository {
    book: Arc<Mutex<ScoreBook>>,
}

impl InMemoryScoreRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_book(book: ScoreBook) -> Self {
        Self {
            book: Arc::new(Mutex::new(book)),
        }
    }
}

impl ScoreRepository for InMemoryScoreRepository {
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
        guard.upsert(key, pct)
    }
}

/// Score store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub scores: Arc<dyn ScoreRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            scores: Arc::new(InMemoryScoreRepository::new()),
        }
    }

    /// File-backed storage at `scores_path`.
    #[must_use]
    pub fn json(scores_path: &Path) -> Self {
        Self {
            scores: Arc::new(JsonScoreStore::open(scores_path)),
        }
    }
}
