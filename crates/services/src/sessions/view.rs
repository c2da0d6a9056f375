use std::path::PathBuf;

use quiz_core::model::{QuestionId, Selection};

use super::plan::PlannedQuestion;

/// How an option relates to the user's answer, for review rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionVerdict {
    /// Ticked and correct.
    Hit,
    /// Ticked but not correct.
    Wrong,
    /// Correct but not ticked.
    Missed,
    /// Neither ticked nor correct.
    Neutral,
}

/// One option line in the answer review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOption {
    pub label: String,
    pub selected: bool,
    pub correct: bool,
    pub explanation: Option<String>,
}

impl ReviewOption {
    #[must_use]
    pub fn verdict(&self) -> OptionVerdict {
        match (self.selected, self.correct) {
            (true, true) => OptionVerdict::Hit,
            (true, false) => OptionVerdict::Wrong,
            (false, true) => OptionVerdict::Missed,
            (false, false) => OptionVerdict::Neutral,
        }
    }
}

/// Presentation-agnostic review of one question after the attempt.
///
/// No pre-formatted strings; the shell decides colors and markers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub position: usize,
    pub question_id: QuestionId,
    pub text: String,
    pub image: Option<PathBuf>,
    /// `None` when the question was never submitted.
    pub score: Option<f64>,
    pub options: Vec<ReviewOption>,
}

impl ReviewItem {
    pub(crate) fn build(
        position: usize,
        planned: &PlannedQuestion,
        answer: Option<&Selection>,
        score: Option<f64>,
    ) -> Self {
        let question = &planned.question;
        let options = planned
            .options
            .iter()
            .enumerate()
            .map(|(index, label)| ReviewOption {
                label: label.clone(),
                selected: answer.is_some_and(|s| s.contains(index)),
                correct: question.answer().contains(label),
                explanation: question.explanation_for(label).map(str::to_owned),
            })
            .collect();

        Self {
            position,
            question_id: question.id(),
            text: question.text().to_owned(),
            image: question.image().map(PathBuf::from),
            score,
            options,
        }
    }

    #[must_use]
    pub fn was_answered(&self) -> bool {
        self.score.is_some()
    }
}
