mod ids;
mod question;
mod quiz;
mod selection;
mod summary;

pub use ids::{QuestionId, QuizKey};
pub use question::{AnswerKey, Question};
pub use quiz::QuizDocument;
pub use selection::Selection;
pub use summary::{PASS_THRESHOLD_PCT, SessionSummary, SummaryError};
