//! Quiz files available on disk, with their last scores.
//!
//! Two naming schemes are recognised: chapter quizzes `hoofdstuk{n}.json`
//! and practice exams `toets{group}_{index}[_.]{lang}.json` with a
//! language-less `toets{group}_{index}.json` fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quiz_core::model::{PASS_THRESHOLD_PCT, QuizKey};
use storage::question_bank;
use storage::repository::{ScoreBook, ScoreRepository, round_to};

use crate::error::CatalogError;

/// One quiz file as shown in a menu.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub key: QuizKey,
    pub path: PathBuf,
    pub question_count: usize,
    /// Last recorded percentage, rounded to one decimal.
    pub last_pct: Option<f64>,
}

impl CatalogEntry {
    /// Pass/fail of the last attempt, if there was one.
    #[must_use]
    pub fn passed(&self) -> Option<bool> {
        self.last_pct.map(|pct| pct >= PASS_THRESHOLD_PCT)
    }
}

#[derive(Clone)]
pub struct CatalogService {
    dir: PathBuf,
    scores: Arc<dyn ScoreRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, scores: Arc<dyn ScoreRepository>) -> Self {
        Self {
            dir: dir.into(),
            scores,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every `*.json` quiz in the directory, sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Directory` if the directory cannot be listed.
    pub fn entries(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let book = self.scores.load();
        let mut paths: Vec<PathBuf> = self
            .file_names()?
            .into_iter()
            .filter(|name| {
                Path::new(name)
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            })
            .map(|name| self.dir.join(name))
            .filter(|path| path.is_file())
            .collect();
        paths.sort();
        Ok(paths.iter().map(|path| entry_with(&book, path)).collect())
    }

    /// Menu entry for a single quiz file.
    #[must_use]
    pub fn entry_for(&self, path: &Path) -> CatalogEntry {
        entry_with(&self.scores.load(), path)
    }

    /// `hoofdstuk{n}.json`, if present.
    #[must_use]
    pub fn chapter_file(&self, chapter: u32) -> Option<PathBuf> {
        let path = self.dir.join(format!("hoofdstuk{chapter}.json"));
        path.is_file().then_some(path)
    }

    /// Practice exam `group`/`index` in `lang`, falling back to the
    /// language-less file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Directory` if the directory cannot be listed.
    pub fn resolve_variant(
        &self,
        group: u32,
        index: u32,
        lang: &str,
    ) -> Result<Option<PathBuf>, CatalogError> {
        let stem = format!("toets{group}_{index}");
        let lang = lang.to_ascii_lowercase();
        let mut names = self.file_names()?;
        names.sort();

        let mut fallback = None;
        for name in names {
            match match_variant(&name, &stem, &lang) {
                Some(VariantMatch::Language) => return Ok(Some(self.dir.join(name))),
                Some(VariantMatch::Fallback) if fallback.is_none() => {
                    fallback = Some(self.dir.join(name));
                }
                _ => {}
            }
        }
        Ok(fallback)
    }

    fn file_names(&self) -> Result<Vec<String>, CatalogError> {
        let read = std::fs::read_dir(&self.dir).map_err(|source| CatalogError::Directory {
            path: self.dir.clone(),
            source,
        })?;
        Ok(read
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect())
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

fn entry_with(book: &ScoreBook, path: &Path) -> CatalogEntry {
    let key = QuizKey::from_path(path);
    let last_pct = book.pct(key.as_str()).map(|pct| round_to(pct, 1));
    CatalogEntry {
        question_count: question_bank::count_in_path(path),
        path: path.to_path_buf(),
        last_pct,
        key,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VariantMatch {
    Language,
    Fallback,
}

/// Case-insensitive; whitespace around the separator and at the end is tolerated.
fn match_variant(name: &str, stem: &str, lang: &str) -> Option<VariantMatch> {
    let name = name.trim_end().to_ascii_lowercase();
    let rest = name.strip_prefix(stem)?.trim_start();
    if rest == ".json" {
        return Some(VariantMatch::Fallback);
    }
    let rest = rest.strip_prefix(['_', '.'])?.trim_start();
    (rest.strip_suffix(".json")? == lang).then_some(VariantMatch::Language)
}
