use std::path::Path;
use std::sync::Arc;

use quiz_core::model::{QuizDocument, Selection, SessionSummary};
use quiz_core::timer::{Countdown, DEFAULT_TOTAL_SECS};
use storage::question_bank;
use storage::repository::{ScoreRecord, ScoreRepository};
use tracing::{debug, info, warn};

use super::service::{Navigation, QuizSession, SubmitOutcome};
use super::view::ReviewItem;
use crate::Clock;
use crate::error::SessionError;

/// Lifecycle of the engine's single session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Active,
    Finished,
}

/// Statistics of a finished or stopped attempt plus the persisted score.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishReport {
    pub summary: SessionSummary,
    /// Stored record, or `None` if persisting failed. A `Some` means score
    /// indicators for this quiz are stale and should be refreshed.
    pub recorded: Option<ScoreRecord>,
}

/// Owns the one active quiz session and persists its score on finish.
///
/// Starting a new quiz while another is open discards the old one unscored.
pub struct SessionEngine {
    clock: Clock,
    scores: Arc<dyn ScoreRepository>,
    timer_secs: u32,
    active: Option<QuizSession>,
}

impl SessionEngine {
    #[must_use]
    pub fn new(clock: Clock, scores: Arc<dyn ScoreRepository>) -> Self {
        Self {
            clock,
            scores,
            timer_secs: DEFAULT_TOTAL_SECS,
            active: None,
        }
    }

    /// Countdown length for sessions started from now on.
    #[must_use]
    pub fn with_timer_secs(mut self, timer_secs: u32) -> Self {
        self.timer_secs = timer_secs;
        self
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        match &self.active {
            None => EngineState::Idle,
            Some(session) if session.is_complete() => EngineState::Finished,
            Some(_) => EngineState::Active,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn scores(&self) -> &Arc<dyn ScoreRepository> {
        &self.scores
    }

    /// Start a quiz from an already loaded document.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the document has no questions.
    pub fn start(&mut self, document: QuizDocument) -> Result<&QuizSession, SessionError> {
        let session = QuizSession::start(document, self.clock.now())?
            .with_timer(Countdown::new(self.timer_secs));
        if let Some(previous) = self.active.take() {
            debug!(quiz = %previous.key(), "discarding open session");
        }
        info!(quiz = %session.key(), questions = session.total(), "session started");
        Ok(self.active.insert(session))
    }

    /// Load `path` and start a quiz from it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` naming the file if it cannot be loaded,
    /// or `SessionError::Empty` if it has no questions.
    pub fn start_from_path(&mut self, path: &Path) -> Result<&QuizSession, SessionError> {
        let document = question_bank::load_path(path)?;
        self.start(document)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Idle` without a session.
    pub fn goto(&mut self, index: usize) -> Result<usize, SessionError> {
        Ok(self.active_mut()?.goto(index))
    }

    /// # Errors
    ///
    /// Returns `SessionError::Idle` without a session.
    pub fn next(&mut self) -> Result<Navigation, SessionError> {
        Ok(self.active_mut()?.next())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Idle` without a session.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        Ok(self.active_mut()?.previous())
    }

    /// Submit an answer for the question on screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Idle` without a session, and the session's
    /// errors for finished sessions or unknown option indices.
    pub fn submit(&mut self, selection: Selection) -> Result<SubmitOutcome, SessionError> {
        let outcome = self.active_mut()?.submit(selection)?;
        debug!(
            position = outcome.position,
            question = %outcome.question,
            score = outcome.score,
            finished = outcome.finished,
            "answer submitted"
        );
        Ok(outcome)
    }

    /// One-second countdown tick; `None` without a session.
    pub fn tick(&mut self) -> Option<u32> {
        self.active.as_mut().map(QuizSession::tick)
    }

    /// Apply `secs` of wall-clock time to the countdown; `None` without a session.
    pub fn elapse(&mut self, secs: u32) -> Option<u32> {
        self.active.as_mut().map(|session| session.elapse(secs))
    }

    /// Pause or resume the countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Idle` without a session.
    pub fn toggle_timer(&mut self) -> Result<bool, SessionError> {
        Ok(self.active_mut()?.timer_mut().toggle())
    }

    /// Restore the full countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Idle` without a session.
    pub fn reset_timer(&mut self, start_running: bool) -> Result<(), SessionError> {
        self.active_mut()?.timer_mut().reset(start_running);
        Ok(())
    }

    /// End the attempt, summarize it and persist its percentage.
    ///
    /// Persisting is best effort: a failed write is logged and reported
    /// through `FinishReport::recorded`, never as an error. The session stays
    /// available for review until [`SessionEngine::close`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Idle` without a session.
    pub fn finish(&mut self) -> Result<FinishReport, SessionError> {
        let now = self.clock.now();
        let session = self.active.as_mut().ok_or(SessionError::Idle)?;
        let summary = session.finish(now)?;

        let recorded = match self.scores.record(summary.key(), summary.pct()) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(quiz = %summary.key(), error = %err, "could not persist score");
                None
            }
        };
        info!(
            quiz = %summary.key(),
            total = summary.total(),
            correct = summary.correct(),
            skipped = summary.skipped(),
            pct = summary.pct(),
            "session finished"
        );

        Ok(FinishReport { summary, recorded })
    }

    /// The "Stop" action: finish early over whatever was answered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Idle` without a session.
    pub fn stop(&mut self) -> Result<FinishReport, SessionError> {
        self.finish()
    }

    /// Review of every question in display order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Idle` without a session.
    pub fn review(&self) -> Result<Vec<ReviewItem>, SessionError> {
        self.active
            .as_ref()
            .map(QuizSession::review)
            .ok_or(SessionError::Idle)
    }

    /// Leave the quiz without persisting anything. Returns whether a session was open.
    pub fn exit(&mut self) -> bool {
        match self.active.take() {
            Some(session) => {
                info!(quiz = %session.key(), finished = session.is_complete(), "session discarded");
                true
            }
            None => false,
        }
    }

    /// Drop a session after its review is done.
    pub fn close(&mut self) {
        self.active = None;
    }

    fn active_mut(&mut self) -> Result<&mut QuizSession, SessionError> {
        self.active.as_mut().ok_or(SessionError::Idle)
    }
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("clock", &self.clock)
            .field("timer_secs", &self.timer_secs)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
