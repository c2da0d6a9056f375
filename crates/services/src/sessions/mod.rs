mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{PlannedQuestion, SessionBuilder, SessionPlan};
pub use progress::SessionProgress;
pub use service::{ActiveQuestion, Navigation, QuizSession, SessionState, SubmitOutcome};
pub use view::{OptionVerdict, ReviewItem, ReviewOption};
pub use workflow::{EngineState, FinishReport, SessionEngine};
