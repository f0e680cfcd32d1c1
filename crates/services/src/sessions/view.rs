use serde::{Deserialize, Serialize};

use exam_core::engine::PresentedQuestion;
use exam_core::model::{
    AnswerOption, AnswerResult, QuestionCategory, SelectionPolicy, SessionPhase, SessionState,
    SessionStats,
};

/// Renderer-facing projection of the current question.
///
/// Carries no answer key, so it can go straight to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub category: QuestionCategory,
    /// Localized category label.
    pub category_name: String,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
    pub question_number: u32,
}

impl QuestionView {
    #[must_use]
    pub fn from_presented(presented: &PresentedQuestion) -> Self {
        Self {
            category: presented.category,
            category_name: presented.category.display_name().to_string(),
            prompt: presented.question.prompt().to_string(),
            options: presented.options.clone(),
            question_number: presented.number,
        }
    }

    /// View of the question `state` currently holds, if any.
    #[must_use]
    pub fn from_state(state: &SessionState) -> Option<Self> {
        let question = state.current_question()?;
        let category = state.current_question_type()?;
        Some(Self {
            category,
            category_name: category.display_name().to_string(),
            prompt: question.prompt().to_string(),
            options: question.presented_options(category),
            question_number: state.total_questions(),
        })
    }

    #[must_use]
    pub fn is_multi_select(&self) -> bool {
        self.category.is_multi_select()
    }
}

/// Result of one graded submission plus the stats after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub result: AnswerResult,
    pub stats: SessionStats,
}

/// Everything a renderer needs to draw one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub policy: SelectionPolicy,
    pub phase: SessionPhase,
    pub question: Option<QuestionView>,
    pub last_result: Option<AnswerResult>,
    pub stats: SessionStats,
}

impl SessionSnapshot {
    #[must_use]
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            policy: state.policy(),
            phase: state.phase(),
            question: QuestionView::from_state(state),
            last_result: state.last_result().cloned(),
            stats: state.stats(),
        }
    }
}
