use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuizKey;
use crate::model::selection::Selection;
use crate::scoring::{is_full_credit, is_no_credit};

/// Percentage at or above which an attempt counts as passed.
pub const PASS_THRESHOLD_PCT: f64 = 65.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("{answers} answer slots do not match {scores} score slots")]
    SlotMismatch { answers: usize, scores: usize },
}

/// Statistics for a finished or stopped quiz attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    key: QuizKey,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    correct: usize,
    incorrect: usize,
    skipped: usize,
    total: usize,
    total_score: f64,
    pct: f64,
}

impl SessionSummary {
    /// Build a summary from per-question answers and scores.
    ///
    /// Both slices are indexed by displayed question position. `None` in
    /// `answers` marks a skipped question; `None` in `scores` marks a
    /// question that never produced a score.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SummaryError::SlotMismatch` if the slices differ in length.
    pub fn from_slots(
        key: QuizKey,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        answers: &[Option<Selection>],
        scores: &[Option<f64>],
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        if answers.len() != scores.len() {
            return Err(SummaryError::SlotMismatch {
                answers: answers.len(),
                scores: scores.len(),
            });
        }

        let graded = scores.iter().flatten().copied();
        let correct = graded.clone().filter(|s| is_full_credit(*s)).count();
        let incorrect = graded.clone().filter(|s| is_no_credit(*s)).count();
        let total_score = graded.fold(0.0, |acc, s| acc + s);
        let skipped = answers.iter().filter(|a| a.is_none()).count();
        let total = answers.len();

        #[allow(clippy::cast_precision_loss)]
        let pct = if total > 0 {
            total_score / total as f64 * 100.0
        } else {
            0.0
        };

        Ok(Self {
            key,
            started_at,
            completed_at,
            correct,
            incorrect,
            skipped,
            total,
            total_score,
            pct,
        })
    }

    #[must_use]
    pub fn key(&self) -> &QuizKey {
        &self.key
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Questions that earned exactly full credit.
    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Questions that earned exactly zero credit (including empty submissions).
    #[must_use]
    pub fn incorrect(&self) -> usize {
        self.incorrect
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    #[must_use]
    pub fn pct(&self) -> f64 {
        self.pct
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.pct >= PASS_THRESHOLD_PCT
    }
}
