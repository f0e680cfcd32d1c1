use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::grading::normalize_answer;
use crate::model::category::QuestionCategory;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("correct answer cannot be empty")]
    EmptyAnswer,

    #[error("answer letter {letter} is not an option of a {category} question")]
    AnswerOutOfRange {
        letter: char,
        category: QuestionCategory,
    },

    #[error("a {category} question has a single correct letter, got {answer}")]
    MultipleLettersForSingleAnswer {
        answer: String,
        category: QuestionCategory,
    },
}

//
// ─── OPTIONS ───────────────────────────────────────────────────────────────────
//

/// Option label: a single uppercase letter starting at `A`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionLabel(char);

impl OptionLabel {
    /// Labels in presentation order, enough for the widest category.
    pub const ALL: [OptionLabel; 5] = [
        OptionLabel('A'),
        OptionLabel('B'),
        OptionLabel('C'),
        OptionLabel('D'),
        OptionLabel('E'),
    ];

    /// Label at a zero-based option position.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parses a letter, accepting lowercase input.
    #[must_use]
    pub fn from_char(letter: char) -> Option<Self> {
        let upper = letter.to_ascii_uppercase();
        Self::ALL.iter().copied().find(|label| label.0 == upper)
    }

    #[must_use]
    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Debug for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionLabel({})", self.0)
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text shown for judgment option `A`.
pub const JUDGMENT_TRUE_TEXT: &str = "正确";
/// Text shown for judgment option `B`.
pub const JUDGMENT_FALSE_TEXT: &str = "错误";

/// One labelled choice as presented to the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: OptionLabel,
    pub text: String,
}

impl AnswerOption {
    #[must_use]
    pub fn new(label: OptionLabel, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }
}

/// The fixed true/false pair every judgment question presents.
#[must_use]
pub fn judgment_options() -> Vec<AnswerOption> {
    vec![
        AnswerOption::new(OptionLabel('A'), JUDGMENT_TRUE_TEXT),
        AnswerOption::new(OptionLabel('B'), JUDGMENT_FALSE_TEXT),
    ]
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated, immutable question record.
///
/// Questions carry no id; identity is the index within their category.
/// Judgment questions store no option texts, their options are synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    options: Vec<AnswerOption>,
    correct_answer: String,
}

impl Question {
    /// Validate raw fields into a question of the given category.
    ///
    /// `option_texts` are taken in label order; entries beyond the category's
    /// option count are ignored and missing ones render as empty text.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or answer is empty, or the answer
    /// names a letter outside the category's label set.
    pub fn new(
        category: QuestionCategory,
        prompt: impl Into<String>,
        option_texts: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let correct_answer = correct_answer.into();
        let normalized = normalize_answer(&correct_answer);
        if normalized.is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }

        let allowed = category.option_count();
        for letter in normalized.chars() {
            let in_range = OptionLabel::from_char(letter)
                .and_then(|label| OptionLabel::ALL.iter().position(|l| *l == label))
                .is_some_and(|idx| idx < allowed);
            if !in_range {
                return Err(QuestionError::AnswerOutOfRange { letter, category });
            }
        }

        if !category.is_multi_select() && normalized.chars().count() > 1 {
            return Err(QuestionError::MultipleLettersForSingleAnswer {
                answer: correct_answer,
                category,
            });
        }

        let options = match category {
            QuestionCategory::Judgment => Vec::new(),
            _ => {
                let mut texts = option_texts.into_iter();
                OptionLabel::ALL
                    .iter()
                    .take(allowed)
                    .map(|label| AnswerOption::new(*label, texts.next().unwrap_or_default()))
                    .collect()
            }
        };

        Ok(Self {
            prompt,
            options,
            correct_answer,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The answer key exactly as it was loaded.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Stored option texts; empty for judgment questions.
    #[must_use]
    pub fn stored_options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Options as presented for `category`: 4 for single choice, 5 for
    /// multiple choice and the fixed pair for judgment.
    #[must_use]
    pub fn presented_options(&self, category: QuestionCategory) -> Vec<AnswerOption> {
        match category {
            QuestionCategory::Judgment => judgment_options(),
            _ => self
                .options
                .iter()
                .take(category.option_count())
                .cloned()
                .collect(),
        }
    }
}
