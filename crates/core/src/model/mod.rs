mod bank;
mod category;
mod ids;
mod question;
mod session;

pub use bank::{BankOverview, QuestionBank};
pub use category::{ParseCategoryError, QuestionCategory};
pub use ids::{ParseSessionKeyError, SessionKey};
pub use question::{
    AnswerOption, JUDGMENT_FALSE_TEXT, JUDGMENT_TRUE_TEXT, OptionLabel, Question, QuestionError,
    judgment_options,
};
pub use session::{
    AnswerResult, ParsePolicyError, SelectionPolicy, SequenceCursor, SessionPhase, SessionState,
    SessionStats, accuracy_percent,
};
