//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::model::SummaryError;
use storage::question_bank::LoadError;

/// Errors emitted by the session engine and quiz sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no active session")]
    Idle,
    #[error("quiz has no questions")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("option {index} is out of range for a question with {options} options")]
    OptionOutOfRange { index: usize, options: usize },
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("quiz directory {path} is not readable: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
