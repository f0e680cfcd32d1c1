#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod sessions;

pub use exam_core::Clock;

pub use app_services::AppServices;
pub use config::ExamConfig;
pub use error::{AppServicesError, ConfigError, ExamServiceError};
pub use sessions::{ExamService, QuestionView, SessionSnapshot, SubmissionOutcome};
