use serde::{Deserialize, Serialize};

use crate::model::category::QuestionCategory;
use crate::model::question::Question;

/// Immutable collection of questions partitioned by category.
///
/// Each category keeps the order its questions were loaded in; sequential
/// sessions walk that order front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: [Vec<Question>; 3],
}

impl QuestionBank {
    #[must_use]
    pub fn new(
        single_choice: Vec<Question>,
        multiple_choice: Vec<Question>,
        judgment: Vec<Question>,
    ) -> Self {
        Self {
            questions: [single_choice, multiple_choice, judgment],
        }
    }

    /// Questions of one category in load order.
    #[must_use]
    pub fn questions(&self, category: QuestionCategory) -> &[Question] {
        &self.questions[category.index()]
    }

    #[must_use]
    pub fn get(&self, category: QuestionCategory, index: usize) -> Option<&Question> {
        self.questions(category).get(index)
    }

    #[must_use]
    pub fn len(&self, category: QuestionCategory) -> usize {
        self.questions(category).len()
    }

    /// Number of questions across all categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.iter().map(Vec::len).sum()
    }

    /// True when no category holds a question.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    #[must_use]
    pub fn overview(&self) -> BankOverview {
        BankOverview {
            single_choice: self.len(QuestionCategory::SingleChoice),
            multiple_choice: self.len(QuestionCategory::MultipleChoice),
            judgment: self.len(QuestionCategory::Judgment),
            total: self.total(),
        }
    }
}

/// Per-category question counts, shown when a bank is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankOverview {
    pub single_choice: usize,
    pub multiple_choice: usize,
    pub judgment: usize,
    pub total: usize,
}
