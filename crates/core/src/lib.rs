#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod grading;
pub mod model;
pub mod time;

pub use engine::QuestionSessionEngine;
pub use error::ExamError;
pub use time::Clock;
