use thiserror::Error;

/// Errors surfaced by the question-session engine.
///
/// None of these are fatal to the process; callers render them as messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    /// The bank holds no question in any category.
    #[error("question bank is empty")]
    Load,

    /// The drawn category is empty (random) or the bank is exhausted (fixed).
    #[error("no question available")]
    NoQuestionAvailable,

    #[error("no current question to answer")]
    NoCurrentQuestion,

    #[error("answer is empty")]
    EmptyAnswer,
}
