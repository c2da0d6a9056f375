use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::model::ids::QuestionId;

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// Correct answer(s) of a question, expressed as option labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    /// Exactly one option is correct; only the exact singleton selection scores.
    Single(String),
    /// Several options are correct; partial credit applies.
    Multiple(Vec<String>),
}

impl AnswerKey {
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        matches!(self, AnswerKey::Multiple(_))
    }

    /// Returns true if `label` is one of the correct answers.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        match self {
            AnswerKey::Single(answer) => answer == label,
            AnswerKey::Multiple(answers) => answers.iter().any(|a| a == label),
        }
    }

    /// Correct labels in authored order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        match self {
            AnswerKey::Single(answer) => std::slice::from_ref(answer),
            AnswerKey::Multiple(answers) => answers,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question as authored in a quiz document.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    answer: AnswerKey,
    explanation: HashMap<String, String>,
    image: Option<PathBuf>,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        answer: AnswerKey,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            options,
            answer,
            explanation: HashMap::new(),
            image: None,
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: HashMap<String, String>) -> Self {
        self.explanation = explanation;
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: Option<PathBuf>) -> Self {
        self.image = image;
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Options exactly as authored, before answer injection.
    #[must_use]
    pub fn authored_options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &AnswerKey {
        &self.answer
    }

    #[must_use]
    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    #[must_use]
    pub fn explanation_for(&self, label: &str) -> Option<&str> {
        self.explanation
            .get(label)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    /// Options a user can pick from: the authored list followed by every
    /// correct answer that the author left out, in answer order.
    ///
    /// Authored duplicates are kept as-is. The result is not shuffled.
    #[must_use]
    pub fn selectable_options(&self) -> Vec<String> {
        let mut options = self.options.clone();
        for label in self.answer.labels() {
            if !options.contains(label) {
                options.push(label.clone());
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn selectable_options_keep_authored_order() {
        let q = Question::new(
            QuestionId::new(0),
            "Q",
            labels(&["A", "B", "C"]),
            AnswerKey::Single("B".into()),
        );
        assert_eq!(q.selectable_options(), labels(&["A", "B", "C"]));
    }

    #[test]
    fn missing_single_answer_is_appended() {
        let q = Question::new(
            QuestionId::new(0),
            "Q",
            labels(&["A", "B"]),
            AnswerKey::Single("D".into()),
        );
        assert_eq!(q.selectable_options(), labels(&["A", "B", "D"]));
    }

    #[test]
    fn missing_multi_answers_are_appended_once() {
        let q = Question::new(
            QuestionId::new(0),
            "Q",
            labels(&["W", "X"]),
            AnswerKey::Multiple(labels(&["X", "Y", "Z", "Y"])),
        );
        assert_eq!(q.selectable_options(), labels(&["W", "X", "Y", "Z"]));
    }

    #[test]
    fn empty_authored_options_still_expose_answer() {
        let q = Question::new(QuestionId::new(3), "Q", Vec::new(), AnswerKey::Single("A".into()));
        assert_eq!(q.selectable_options(), labels(&["A"]));
    }

    #[test]
    fn blank_explanations_are_hidden() {
        let mut explanation = HashMap::new();
        explanation.insert("A".to_owned(), "Because.".to_owned());
        explanation.insert("B".to_owned(), String::new());
        let answer = AnswerKey::Single("A".into());
        let q = Question::new(QuestionId::new(0), "Q", labels(&["A", "B"]), answer)
            .with_explanation(explanation);

        assert_eq!(q.explanation_for("A"), Some("Because."));
        assert_eq!(q.explanation_for("B"), None);
        assert_eq!(q.explanation_for("C"), None);
    }

    #[test]
    fn answer_key_membership() {
        let single = AnswerKey::Single("A".into());
        let multi = AnswerKey::Multiple(labels(&["A", "C"]));
        assert!(single.contains("A"));
        assert!(!single.contains("C"));
        assert!(multi.contains("C"));
        assert!(multi.is_multiple());
        assert!(!single.is_multiple());
    }
}
