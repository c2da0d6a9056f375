//! Quiz documents on disk.
//!
//! Expected shape:
//!
//! ```json
//! { "chapters": [ { "chapter": "...", "description": "...",
//!     "questions": [ { "question": "...", "options": ["..."],
//!                      "answer": "..." | ["...", "..."],
//!                      "explanation": { "<option>": "..." },
//!                      "image": "assets/img/q1.png" } ] } ] }
//! ```
//!
//! Only the first chapter is used.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quiz_core::model::{AnswerKey, Question, QuestionId, QuizDocument, QuizKey};
use serde::Deserialize;
use serde::de::IgnoredAny;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("could not read quiz file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed quiz file {path}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },
}

//
// ─── WIRE RECORDS ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct QuizFileRecord<C> {
    chapters: Vec<C>,
}

#[derive(Debug, Deserialize)]
struct ChapterRecord {
    chapter: Option<String>,
    description: Option<String>,
    questions: Vec<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
struct ChapterCountRecord {
    questions: Vec<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct QuestionRecord {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    answer: AnswerRecord,
    #[serde(default)]
    explanation: Option<HashMap<String, String>>,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswerRecord {
    One(String),
    Many(Vec<String>),
}

impl QuestionRecord {
    fn into_question(self, position: usize) -> Question {
        let answer = match self.answer {
            AnswerRecord::One(label) => AnswerKey::Single(label),
            AnswerRecord::Many(labels) => AnswerKey::Multiple(labels),
        };
        let image = self
            .image
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Question::new(QuestionId::new(position), self.question, self.options, answer)
            .with_explanation(self.explanation.unwrap_or_default())
            .with_image(image)
    }
}

//
// ─── LOADING ───────────────────────────────────────────────────────────────────
//

/// Load a quiz document from disk, keyed by the file's basename.
///
/// # Errors
///
/// Returns `LoadError::Unreadable` if the file cannot be read and
/// `LoadError::MalformedDocument` if it is not a quiz document.
pub fn load_path(path: &Path) -> Result<QuizDocument, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let key = QuizKey::from_path(path);
    let fallback = path
        .file_stem()
        .map_or_else(|| key.to_string(), |s| s.to_string_lossy().into_owned());

    let document = parse_with_path(&raw, key, fallback, path)?;
    debug!(
        path = %path.display(),
        questions = document.len(),
        "quiz document loaded"
    );
    Ok(document)
}

/// Parse a quiz document body.
///
/// `fallback_title` is used when the chapter has neither a title nor a description.
///
/// # Errors
///
/// Returns `LoadError::MalformedDocument` if required fields are missing or the
/// body is not valid JSON.
pub fn parse_str(
    raw: &str,
    key: QuizKey,
    fallback_title: impl Into<String>,
) -> Result<QuizDocument, LoadError> {
    let origin = PathBuf::from(key.as_str());
    parse_with_path(raw, key, fallback_title.into(), &origin)
}

fn parse_with_path(
    raw: &str,
    key: QuizKey,
    fallback_title: String,
    path: &Path,
) -> Result<QuizDocument, LoadError> {
    let chapter: ChapterRecord = first_chapter(raw, path)?;
    let questions = chapter
        .questions
        .into_iter()
        .enumerate()
        .map(|(position, record)| record.into_question(position))
        .collect();

    Ok(QuizDocument::new(
        key,
        chapter.chapter,
        chapter.description,
        fallback_title,
        questions,
    ))
}

fn first_chapter<C>(raw: &str, path: &Path) -> Result<C, LoadError>
where
    C: for<'de> Deserialize<'de>,
{
    let malformed = |reason: String| LoadError::MalformedDocument {
        path: path.to_path_buf(),
        reason,
    };
    let file: QuizFileRecord<C> =
        serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
    file.chapters
        .into_iter()
        .next()
        .ok_or_else(|| malformed("document has no chapters".into()))
}

//
// ─── COUNTING ──────────────────────────────────────────────────────────────────
//

/// Number of questions in a document body, without building questions.
///
/// # Errors
///
/// Returns `LoadError::MalformedDocument` if the body has no first chapter
/// with a `questions` list.
pub fn count_questions(raw: &str) -> Result<usize, LoadError> {
    let chapter: ChapterCountRecord = first_chapter(raw, Path::new("<inline>"))?;
    Ok(chapter.questions.len())
}

/// Number of questions in a quiz file; `0` when it cannot be read or parsed.
#[must_use]
pub fn count_in_path(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| count_questions(&raw).ok())
        .unwrap_or(0)
}

/// Resolve a question image against `base_dir`.
///
/// Relative paths are joined onto `base_dir`; `None` if the file does not exist.
#[must_use]
pub fn resolve_image(base_dir: &Path, image: &Path) -> Option<PathBuf> {
    let full = if image.is_absolute() {
        image.to_path_buf()
    } else {
        base_dir.join(image)
    };
    full.exists().then_some(full)
}
