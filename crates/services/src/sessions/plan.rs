use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, QuizDocument, QuizKey};

/// A question together with the option order shown for the whole session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedQuestion {
    pub question: Question,
    /// Authored options plus injected answers, in display order.
    pub options: Vec<String>,
}

/// Question order and per-question option orders for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub key: QuizKey,
    pub title: String,
    pub questions: Vec<PlannedQuestion>,
}

impl SessionPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Builds a session plan from a loaded document.
///
/// Each question's options are first made selectable (missing answers
/// appended), then shuffled independently of every other question.
#[derive(Debug, Clone, Copy)]
pub struct SessionBuilder {
    shuffle: bool,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self { shuffle: true }
    }

    /// Enable or disable both shuffles; disabled keeps authored order.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn build<R: Rng + ?Sized>(self, document: QuizDocument, rng: &mut R) -> SessionPlan {
        let key = document.key().clone();
        let title = document.display_title();

        let mut questions: Vec<PlannedQuestion> = document
            .into_iter()
            .map(|question| {
                let options = question.selectable_options();
                PlannedQuestion { question, options }
            })
            .collect();

        if self.shuffle {
            questions.shuffle(rng);
            for planned in &mut questions {
                planned.options.shuffle(rng);
            }
        }

        SessionPlan {
            key,
            title,
            questions,
        }
    }
}
