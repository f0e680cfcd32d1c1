mod service;
mod view;

pub use crate::error::ExamServiceError;
pub use service::ExamService;
pub use view::{QuestionView, SessionSnapshot, SubmissionOutcome};
