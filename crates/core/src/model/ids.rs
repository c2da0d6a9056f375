use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Score key of a quiz document: the basename of the file it was loaded from.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizKey(String);

impl QuizKey {
    /// Creates a new `QuizKey` from an already-reduced basename.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derives the key from a quiz file path.
    ///
    /// Paths without a file name fall back to the whole path string.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.file_name() {
            Some(name) => Self(name.to_string_lossy().into_owned()),
            None => Self(path.to_string_lossy().into_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Authored 0-based position of a question inside its document.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(usize);

impl QuestionId {
    #[must_use]
    pub fn new(position: usize) -> Self {
        Self(position)
    }

    /// Returns the authored position.
    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for QuizKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuizKey({:?})", self.0)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Display for QuizKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for QuizKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
