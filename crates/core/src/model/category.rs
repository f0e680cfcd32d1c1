use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// The three fixed question kinds of a bank.
///
/// Declaration order is the fixed visiting order used by sequential sessions:
/// single choice, then multiple choice, then judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    /// One correct letter out of A-D.
    SingleChoice,
    /// One or more correct letters out of A-E, graded as a set.
    MultipleChoice,
    /// True/false, rendered as the fixed pair A = 正确, B = 错误.
    Judgment,
}

impl QuestionCategory {
    /// All categories in visiting order.
    pub const ALL: [QuestionCategory; 3] = [
        QuestionCategory::SingleChoice,
        QuestionCategory::MultipleChoice,
        QuestionCategory::Judgment,
    ];

    /// Stable snake_case tag used in files and on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionCategory::SingleChoice => "single_choice",
            QuestionCategory::MultipleChoice => "multiple_choice",
            QuestionCategory::Judgment => "judgment",
        }
    }

    /// Learner-facing name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            QuestionCategory::SingleChoice => "单选题",
            QuestionCategory::MultipleChoice => "多选题",
            QuestionCategory::Judgment => "判断题",
        }
    }

    /// Number of answer options a question of this category presents.
    #[must_use]
    pub fn option_count(self) -> usize {
        match self {
            QuestionCategory::SingleChoice => 4,
            QuestionCategory::MultipleChoice => 5,
            QuestionCategory::Judgment => 2,
        }
    }

    /// True when more than one option may be chosen.
    #[must_use]
    pub fn is_multi_select(self) -> bool {
        matches!(self, QuestionCategory::MultipleChoice)
    }

    /// Position in the visiting order.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            QuestionCategory::SingleChoice => 0,
            QuestionCategory::MultipleChoice => 1,
            QuestionCategory::Judgment => 2,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing a category tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown question category: {raw}")]
pub struct ParseCategoryError {
    raw: String,
}

impl FromStr for QuestionCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single_choice" => Ok(Self::SingleChoice),
            "multiple_choice" => Ok(Self::MultipleChoice),
            "judgment" => Ok(Self::Judgment),
            other => Err(ParseCategoryError {
                raw: other.to_string(),
            }),
        }
    }
}
