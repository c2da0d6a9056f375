use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;

use quiz_core::model::{Question, QuestionId, QuizDocument, QuizKey, Selection, SessionSummary};
use quiz_core::scoring;
use quiz_core::timer::Countdown;

use super::plan::{PlannedQuestion, SessionBuilder, SessionPlan};
use super::progress::SessionProgress;
use super::view::ReviewItem;
use crate::error::SessionError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Finished,
}

/// Result of stepping forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Moved(usize),
    /// Already on the last question; the shell shows statistics.
    AtEnd,
}

/// Outcome of submitting an answer for the question on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmitOutcome {
    pub position: usize,
    pub question: QuestionId,
    pub score: f64,
    pub finished: bool,
}

/// The question on screen, with what the shell needs to render it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveQuestion<'a> {
    pub position: usize,
    pub total: usize,
    pub question: &'a Question,
    pub options: &'a [String],
    /// Earlier submission for this question, to pre-tick boxes on revisit.
    pub saved: Option<&'a Selection>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One in-memory attempt at a quiz document.
///
/// Answers and scores are stored per displayed position, so resubmitting a
/// question replaces its earlier answer instead of adding another score.
pub struct QuizSession {
    key: QuizKey,
    title: String,
    questions: Vec<PlannedQuestion>,
    current: usize,
    answers: Vec<Option<Selection>>,
    scores: Vec<Option<f64>>,
    state: SessionState,
    timer: Countdown,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session with shuffled questions and options.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the document has no questions.
    pub fn start(document: QuizDocument, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        Self::start_with_rng(document, started_at, &mut rand::rng())
    }

    /// Like [`QuizSession::start`] with a caller-provided random source.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the document has no questions.
    pub fn start_with_rng<R: Rng + ?Sized>(
        document: QuizDocument,
        started_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let plan = SessionBuilder::new().build(document, rng);
        Self::from_plan(plan, started_at)
    }

    /// Start from an already built plan.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the plan has no questions.
    pub fn from_plan(plan: SessionPlan, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if plan.is_empty() {
            return Err(SessionError::Empty);
        }
        let total = plan.total();
        Ok(Self {
            key: plan.key,
            title: plan.title,
            questions: plan.questions,
            current: 0,
            answers: vec![None; total],
            scores: vec![None; total],
            state: SessionState::Active,
            timer: Countdown::default(),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn with_timer(mut self, timer: Countdown) -> Self {
        self.timer = timer;
        self
    }

    #[must_use]
    pub fn key(&self) -> &QuizKey {
        &self.key
    }

    /// Title with question count, e.g. `"Key concepts (40)"`.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Finished
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<Selection>] {
        &self.answers
    }

    #[must_use]
    pub fn scores(&self) -> &[Option<f64>] {
        &self.scores
    }

    #[must_use]
    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut Countdown {
        &mut self.timer
    }

    /// Display order of the options of question `position`.
    #[must_use]
    pub fn option_order(&self, position: usize) -> Option<&[String]> {
        self.questions.get(position).map(|p| p.options.as_slice())
    }

    #[must_use]
    pub fn current(&self) -> ActiveQuestion<'_> {
        let planned = &self.questions[self.current];
        ActiveQuestion {
            position: self.current,
            total: self.questions.len(),
            question: &planned.question,
            options: &planned.options,
            saved: self.answers[self.current].as_ref(),
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            answered: self.answers.iter().filter(|a| a.is_some()).count(),
            skipped: self.answers.iter().filter(|a| a.is_none()).count(),
            current: self.current,
            is_complete: self.is_complete(),
        }
    }

    /// Jump to `index`, clamped to the valid range.
    pub fn goto(&mut self, index: usize) -> usize {
        self.current = index.min(self.questions.len() - 1);
        self.current
    }

    pub fn next(&mut self) -> Navigation {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Navigation::Moved(self.current)
        } else {
            Navigation::AtEnd
        }
    }

    pub fn previous(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    /// Record `selection` for the question on screen, score it and advance.
    ///
    /// Submitting the last question finishes the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session is finished.
    /// Returns `SessionError::OptionOutOfRange` if an index does not name a
    /// displayed option; nothing is recorded in that case.
    pub fn submit(&mut self, selection: Selection) -> Result<SubmitOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }

        let position = self.current;
        let planned = &self.questions[position];
        if let Some(index) = selection.max_index().filter(|i| *i >= planned.options.len()) {
            return Err(SessionError::OptionOutOfRange {
                index,
                options: planned.options.len(),
            });
        }

        let score = scoring::score(planned.question.answer(), &selection, &planned.options);
        let question = planned.question.id();
        self.answers[position] = Some(selection);
        self.scores[position] = Some(score);

        let finished = position + 1 >= self.questions.len();
        if finished {
            self.state = SessionState::Finished;
        } else {
            self.current = position + 1;
        }

        Ok(SubmitOutcome {
            position,
            question,
            score,
            finished,
        })
    }

    /// Count down one second while the session is active.
    pub fn tick(&mut self) -> u32 {
        if self.state == SessionState::Active {
            self.timer.tick()
        } else {
            self.timer.remaining_secs()
        }
    }

    /// Count down `secs` seconds while the session is active.
    pub fn elapse(&mut self, secs: u32) -> u32 {
        if self.state == SessionState::Active {
            self.timer.elapse(secs)
        } else {
            self.timer.remaining_secs()
        }
    }

    /// End the attempt (also valid before the last question) and summarize.
    ///
    /// The first completion time is kept when called again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if `completed_at` precedes the start.
    pub fn finish(&mut self, completed_at: DateTime<Utc>) -> Result<SessionSummary, SessionError> {
        let completed_at = *self.completed_at.get_or_insert(completed_at);
        self.state = SessionState::Finished;
        self.summary(completed_at)
    }

    /// Summarize whatever has been answered so far.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if `completed_at` precedes the start.
    pub fn summary(&self, completed_at: DateTime<Utc>) -> Result<SessionSummary, SessionError> {
        Ok(SessionSummary::from_slots(
            self.key.clone(),
            self.started_at,
            completed_at,
            &self.answers,
            &self.scores,
        )?)
    }

    #[must_use]
    pub fn review_item(&self, position: usize) -> Option<ReviewItem> {
        let planned = self.questions.get(position)?;
        Some(ReviewItem::build(
            position,
            planned,
            self.answers[position].as_ref(),
            self.scores[position],
        ))
    }

    #[must_use]
    pub fn review(&self) -> Vec<ReviewItem> {
        (0..self.questions.len())
            .filter_map(|position| self.review_item(position))
            .collect()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("key", &self.key)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("state", &self.state)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::AnswerKey;
    use quiz_core::Clock;
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    /// Two questions in authored order: single "B" over [A,B,C], multi {X,Y} over [W,X,Y,Z].
    fn build_session() -> QuizSession {
        let questions = vec![
            Question::new(
                QuestionId::new(0),
                "Q1",
                labels(&["A", "B", "C"]),
                AnswerKey::Single("B".into()),
            ),
            Question::new(
                QuestionId::new(1),
                "Q2",
                labels(&["W", "X", "Y", "Z"]),
                AnswerKey::Multiple(labels(&["X", "Y"])),
            ),
        ];
        let doc = QuizDocument::new(QuizKey::new("t.json"), Some("T".into()), None, "t", questions);
        let plan = SessionBuilder::new()
            .with_shuffle(false)
            .build(doc, &mut StdRng::seed_from_u64(0));
        QuizSession::from_plan(plan, fixed_now()).unwrap()
    }

    #[test]
    fn empty_document_is_rejected() {
        let doc = QuizDocument::new(QuizKey::new("e.json"), None, None, "e", Vec::new());
        let err = QuizSession::start(doc, fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn starts_unanswered_at_first_question() {
        let session = build_session();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.state(), SessionState::Active);
        assert!(session.answers().iter().all(Option::is_none));
        assert!(session.scores().iter().all(Option::is_none));
        assert_eq!(session.title(), "T (2)");
    }

    #[test]
    fn goto_clamps_out_of_range() {
        let mut session = build_session();
        assert_eq!(session.goto(99), 1);
        assert_eq!(session.goto(0), 0);
        assert_eq!(session.previous(), 0);
        assert_eq!(session.next(), Navigation::Moved(1));
        assert_eq!(session.next(), Navigation::AtEnd);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn scenario_two_questions_seventy_five_percent() {
        let mut session = build_session();

        let first = session.submit(Selection::from([1])).unwrap();
        assert!((first.score - 1.0).abs() < f64::EPSILON);
        assert!(!first.finished);
        assert_eq!(session.current_index(), 1);

        let second = session.submit(Selection::from([1, 3])).unwrap();
        assert!((second.score - 0.5).abs() < f64::EPSILON);
        assert!(second.finished);
        assert!(session.is_complete());

        let summary = session.finish(fixed_now()).unwrap();
        assert_eq!(summary.total(), 2);
        assert!((summary.total_score() - 1.5).abs() < f64::EPSILON);
        assert!((summary.pct() - 75.0).abs() < f64::EPSILON);
        assert_eq!(summary.correct(), 1);
        assert_eq!(summary.incorrect(), 0);
        assert_eq!(summary.skipped(), 0);
    }

    #[test]
    fn resubmission_replaces_previous_score() {
        let mut session = build_session();
        session.submit(Selection::from([0])).unwrap();
        session.goto(0);
        session.submit(Selection::from([1])).unwrap();

        let summary = session.summary(fixed_now()).unwrap();
        assert_eq!(session.scores().iter().flatten().count(), 1);
        assert!((summary.total_score() - 1.0).abs() < f64::EPSILON);
        assert_eq!(summary.correct(), 1);
        assert_eq!(summary.incorrect(), 0);
        assert_eq!(summary.skipped(), 1);
    }

    #[test]
    fn submit_after_finish_is_rejected() {
        let mut session = build_session();
        session.goto(1);
        session.submit(Selection::from([1, 2])).unwrap();
        assert!(session.is_complete());
        let err = session.submit(Selection::from([0])).unwrap_err();
        assert!(matches!(err, SessionError::Completed));
    }

    #[test]
    fn out_of_range_option_records_nothing() {
        let mut session = build_session();
        let err = session.submit(Selection::from([0, 3])).unwrap_err();
        assert!(matches!(
            err,
            SessionError::OptionOutOfRange { index: 3, options: 3 }
        ));
        assert!(session.answers()[0].is_none());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn stopping_early_counts_unanswered_as_skipped() {
        let mut session = build_session();
        session.submit(Selection::empty()).unwrap();

        let summary = session.finish(fixed_now()).unwrap();

        assert!(session.is_complete());
        assert_eq!(summary.incorrect(), 1);
        assert_eq!(summary.skipped(), 1);
        assert!(summary.pct().abs() < f64::EPSILON);
    }

    #[test]
    fn all_skipped_finish_is_zero() {
        let mut session = build_session();
        let summary = session.finish(fixed_now()).unwrap();
        assert_eq!(summary.skipped(), summary.total());
        assert!(summary.pct().abs() < f64::EPSILON);
    }

    #[test]
    fn current_question_exposes_saved_selection() {
        let mut session = build_session();
        session.submit(Selection::from([2])).unwrap();
        session.previous();

        let current = session.current();
        assert_eq!(current.position, 0);
        assert_eq!(current.total, 2);
        assert_eq!(current.options, labels(&["A", "B", "C"]).as_slice());
        assert_eq!(current.saved, Some(&Selection::from([2])));
    }

    #[test]
    fn timer_only_ticks_while_active() {
        let mut session = build_session().with_timer(Countdown::new(10));
        assert_eq!(session.tick(), 9);
        session.finish(fixed_now()).unwrap();
        assert_eq!(session.tick(), 9);
    }

    #[test]
    fn progress_counts_answers() {
        let mut session = build_session();
        session.submit(Selection::from([1])).unwrap();
        let progress = session.progress();
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.skipped, 1);
        assert_eq!(progress.position(), (2, 2));
        assert!(!progress.is_complete);
    }

    #[test]
    fn finishing_twice_keeps_first_completion_time() {
        let mut clock = Clock::fixed(fixed_now());
        let mut session = build_session();

        clock.advance(chrono::Duration::seconds(90));
        let first = session.finish(clock.now()).unwrap();
        clock.advance(chrono::Duration::seconds(30));
        let second = session.finish(clock.now()).unwrap();

        assert_eq!(
            first.completed_at() - first.started_at(),
            chrono::Duration::seconds(90)
        );
        assert_eq!(second.completed_at(), first.completed_at());
    }
}
