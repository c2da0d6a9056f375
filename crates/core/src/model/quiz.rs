use crate::model::ids::QuizKey;
use crate::model::question::Question;

/// One loaded quiz document (the first chapter of a quiz file).
///
/// Immutable once built; per-session ordering lives in the session, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizDocument {
    key: QuizKey,
    title: String,
    description: Option<String>,
    questions: Vec<Question>,
}

impl QuizDocument {
    /// Builds a document, picking the first non-blank of `chapter`,
    /// `description` and `fallback_title` as its title.
    #[must_use]
    pub fn new(
        key: QuizKey,
        chapter: Option<String>,
        description: Option<String>,
        fallback_title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        let title = [chapter.as_deref(), description.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map_or_else(|| fallback_title.into(), str::to_owned);
        Self {
            key,
            title,
            description,
            questions,
        }
    }

    #[must_use]
    pub fn key(&self) -> &QuizKey {
        &self.key
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Title with the question count, e.g. `"Chapter 1 (40)"`.
    #[must_use]
    pub fn display_title(&self) -> String {
        format!("{} ({})", self.title, self.questions.len())
    }
}

impl IntoIterator for QuizDocument {
    type Item = Question;
    type IntoIter = std::vec::IntoIter<Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.into_iter()
    }
}
