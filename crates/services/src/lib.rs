#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use catalog::{CatalogEntry, CatalogService};
pub use error::{CatalogError, SessionError};

pub use sessions::{
    ActiveQuestion, EngineState, FinishReport, Navigation, OptionVerdict, PlannedQuestion,
    QuizSession, ReviewItem, ReviewOption, SessionBuilder, SessionEngine, SessionPlan,
    SessionProgress, SessionState, SubmitOutcome,
};
