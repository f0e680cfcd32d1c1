//! The question-session engine: selection, grading and statistics over a
//! read-only bank and caller-owned `SessionState` values.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ExamError;
use crate::grading;
use crate::model::{
    AnswerOption, AnswerResult, Question, QuestionBank, QuestionCategory, SelectionPolicy,
    SequenceCursor, SessionPhase, SessionState, SessionStats,
};

/// A question handed out by `select_next_question`, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentedQuestion {
    pub category: QuestionCategory,
    pub question: Question,
    /// Options sized per category; judgment gets the fixed true/false pair.
    pub options: Vec<AnswerOption>,
    /// 1-based running number, equal to `total_questions` after selection.
    pub number: u32,
}

/// Owns the bank and applies selection and grading to session states.
///
/// The engine keeps no per-learner data, so one instance can serve any number
/// of sessions as long as each `SessionState` is mutated by one caller at a time.
#[derive(Debug, Clone)]
pub struct QuestionSessionEngine {
    bank: Arc<QuestionBank>,
}

impl QuestionSessionEngine {
    /// Build an engine over a loaded bank.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Load` if no category holds a question. Individual
    /// empty categories are accepted.
    pub fn new(bank: QuestionBank) -> Result<Self, ExamError> {
        Self::from_shared(Arc::new(bank))
    }

    /// Build an engine over a bank that is already shared.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Load` if the bank is wholly empty.
    pub fn from_shared(bank: Arc<QuestionBank>) -> Result<Self, ExamError> {
        if bank.is_empty() {
            return Err(ExamError::Load);
        }
        Ok(Self { bank })
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Fresh state: zero counters, no current question, cursor at the start.
    #[must_use]
    pub fn start_session(&self, policy: SelectionPolicy) -> SessionState {
        SessionState::fresh(policy)
    }

    /// Advance `state` to its next question.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NoQuestionAvailable` when the randomly drawn category
    /// is empty, or when a fixed-sequence session has run out of questions. The
    /// latter is terminal until a new session is started.
    pub fn select_next_question<R: Rng + ?Sized>(
        &self,
        state: &mut SessionState,
        rng: &mut R,
    ) -> Result<PresentedQuestion, ExamError> {
        let (category, index) = match state.policy {
            SelectionPolicy::Random => self.draw_random(rng)?,
            SelectionPolicy::FixedSequence => self.take_sequential(state)?,
        };

        let question = self
            .bank
            .get(category, index)
            .cloned()
            .ok_or(ExamError::NoQuestionAvailable)?;

        state.total_questions = state.total_questions.saturating_add(1);
        state.current_question = Some(question.clone());
        state.current_question_type = Some(category);
        state.last_result = None;

        Ok(PresentedQuestion {
            category,
            options: question.presented_options(category),
            question,
            number: state.total_questions,
        })
    }

    /// `select_next_question` driven by the thread-local RNG.
    ///
    /// # Errors
    ///
    /// Same as `select_next_question`.
    pub fn select_next_question_with_default_rng(
        &self,
        state: &mut SessionState,
    ) -> Result<PresentedQuestion, ExamError> {
        self.select_next_question(state, &mut rand::rng())
    }

    /// Grade `raw_answer` against the current question.
    ///
    /// The current question stays in place, so submitting again grades and
    /// counts again; callers decide whether to allow that.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NoCurrentQuestion` if nothing was selected, and
    /// `ExamError::EmptyAnswer` (with no state change) for blank input.
    pub fn submit_answer(
        &self,
        state: &mut SessionState,
        raw_answer: &str,
    ) -> Result<AnswerResult, ExamError> {
        let (Some(question), Some(category)) =
            (state.current_question.as_ref(), state.current_question_type)
        else {
            return Err(ExamError::NoCurrentQuestion);
        };

        if raw_answer.trim().is_empty() {
            return Err(ExamError::EmptyAnswer);
        }

        let result = grading::grade(category, raw_answer, question.correct_answer());

        state.answered_questions = state.answered_questions.saturating_add(1);
        if result.is_correct {
            state.correct_answers = state.correct_answers.saturating_add(1);
        }
        state.last_result = Some(result.clone());

        Ok(result)
    }

    /// Counters and accuracy of `state`; never mutates.
    #[must_use]
    pub fn get_stats(&self, state: &SessionState) -> SessionStats {
        state.stats()
    }

    #[must_use]
    pub fn phase(&self, state: &SessionState) -> SessionPhase {
        state.phase()
    }

    fn draw_random<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(QuestionCategory, usize), ExamError> {
        let category = QuestionCategory::ALL[rng.random_range(0..QuestionCategory::ALL.len())];
        let len = self.bank.len(category);
        // An empty draw is reported as is; retrying is the caller's call.
        if len == 0 {
            return Err(ExamError::NoQuestionAvailable);
        }
        Ok((category, rng.random_range(0..len)))
    }

    fn take_sequential(
        &self,
        state: &mut SessionState,
    ) -> Result<(QuestionCategory, usize), ExamError> {
        let mut cursor = state.cursor.unwrap_or_default();

        let found = loop {
            let Some(category) = QuestionCategory::from_index(cursor.category_index) else {
                break None;
            };
            if cursor.item_index >= self.bank.len(category) {
                cursor = SequenceCursor {
                    category_index: cursor.category_index + 1,
                    item_index: 0,
                };
                continue;
            }
            let index = cursor.item_index;
            cursor.item_index += 1;
            break Some((category, index));
        };

        state.cursor = Some(cursor);
        match found {
            Some(hit) => Ok(hit),
            None => {
                state.exhausted = true;
                Err(ExamError::NoQuestionAvailable)
            }
        }
    }
}
