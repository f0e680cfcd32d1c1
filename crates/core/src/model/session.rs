use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::category::QuestionCategory;
use crate::model::question::Question;

//
// ─── SELECTION POLICY ──────────────────────────────────────────────────────────
//

/// Strategy used to pick the next question of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Uniform category, then uniform question, with replacement.
    #[default]
    Random,
    /// Every question once, category by category, in load order.
    FixedSequence,
}

impl SelectionPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionPolicy::Random => "random",
            SelectionPolicy::FixedSequence => "fixed",
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing a selection policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown selection policy {raw:?} (expected random or fixed)")]
pub struct ParsePolicyError {
    raw: String,
}

impl FromStr for SelectionPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "fixed" | "fixed_sequence" | "sequential" => Ok(Self::FixedSequence),
            _ => Err(ParsePolicyError { raw: s.to_string() }),
        }
    }
}

/// Position of the next unconsumed question for fixed-sequence sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SequenceCursor {
    pub category_index: usize,
    pub item_index: usize,
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Outcome of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub is_correct: bool,
    /// Upper-cased, whitespace-free form of what the learner sent.
    pub user_answer: String,
    /// Upper-cased, whitespace-free answer key.
    pub correct_answer: String,
}

/// Running counters plus derived accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_questions: u32,
    pub answered_questions: u32,
    pub correct_answers: u32,
    /// Percentage of answered questions graded correct, one decimal place.
    pub accuracy: f64,
}

impl SessionStats {
    #[must_use]
    pub fn from_counts(total_questions: u32, answered_questions: u32, correct_answers: u32) -> Self {
        Self {
            total_questions,
            answered_questions,
            correct_answers,
            accuracy: accuracy_percent(correct_answers, answered_questions),
        }
    }
}

/// `correct / answered * 100` rounded to one decimal, ties to even; 0 when nothing was answered.
#[must_use]
pub fn accuracy_percent(correct: u32, answered: u32) -> f64 {
    if answered == 0 {
        return 0.0;
    }
    let raw = f64::from(correct) / f64::from(answered) * 100.0;
    (raw * 10.0).round_ties_even() / 10.0
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Where a session stands, derived from its state on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Started, nothing selected yet.
    AwaitingSelection,
    /// A question is shown and has not been graded.
    AwaitingAnswer,
    /// The current question has been graded at least once.
    Answered,
    /// A fixed-sequence session ran out of questions.
    Exhausted,
}

/// Mutable state of one exam run.
///
/// Owned by the caller (a GUI window, a per-cookie store entry) and handed to
/// the engine on every call. Serializable so stores can keep it as a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) policy: SelectionPolicy,
    pub(crate) cursor: Option<SequenceCursor>,
    pub(crate) total_questions: u32,
    pub(crate) answered_questions: u32,
    pub(crate) correct_answers: u32,
    pub(crate) current_question: Option<Question>,
    pub(crate) current_question_type: Option<QuestionCategory>,
    pub(crate) last_result: Option<AnswerResult>,
    pub(crate) exhausted: bool,
}

impl SessionState {
    pub(crate) fn fresh(policy: SelectionPolicy) -> Self {
        let cursor = match policy {
            SelectionPolicy::Random => None,
            SelectionPolicy::FixedSequence => Some(SequenceCursor::default()),
        };
        Self {
            policy,
            cursor,
            total_questions: 0,
            answered_questions: 0,
            correct_answers: 0,
            current_question: None,
            current_question_type: None,
            last_result: None,
            exhausted: false,
        }
    }

    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Cursor of a fixed-sequence session; `None` for random sessions.
    #[must_use]
    pub fn cursor(&self) -> Option<SequenceCursor> {
        self.cursor
    }

    /// Questions presented so far.
    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    /// Submissions graded so far.
    #[must_use]
    pub fn answered_questions(&self) -> u32 {
        self.answered_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    #[must_use]
    pub fn current_question_type(&self) -> Option<QuestionCategory> {
        self.current_question_type
    }

    /// Grading outcome for the current question, if it was answered.
    #[must_use]
    pub fn last_result(&self) -> Option<&AnswerResult> {
        self.last_result.as_ref()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.exhausted {
            SessionPhase::Exhausted
        } else if self.current_question.is_none() {
            SessionPhase::AwaitingSelection
        } else if self.last_result.is_some() {
            SessionPhase::Answered
        } else {
            SessionPhase::AwaitingAnswer
        }
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats::from_counts(
            self.total_questions,
            self.answered_questions,
            self.correct_answers,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_rounds_to_one_decimal() {
        assert!((accuracy_percent(2, 3) - 66.7).abs() < f64::EPSILON);
        assert!((accuracy_percent(1, 3) - 33.3).abs() < f64::EPSILON);
        assert!((accuracy_percent(3, 3) - 100.0).abs() < f64::EPSILON);
        assert!(accuracy_percent(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn accuracy_halfway_cases_round_to_even() {
        assert!((accuracy_percent(1, 16) - 6.2).abs() < f64::EPSILON);
        assert!((accuracy_percent(5, 16) - 31.2).abs() < f64::EPSILON);
        assert!((accuracy_percent(2, 32) - 6.2).abs() < f64::EPSILON);
        assert!((accuracy_percent(3, 16) - 18.8).abs() < f64::EPSILON);
    }

    #[test]
    fn fresh_state_has_policy_specific_cursor() {
        let random = SessionState::fresh(SelectionPolicy::Random);
        assert_eq!(random.cursor(), None);
        assert_eq!(random.phase(), SessionPhase::AwaitingSelection);

        let fixed = SessionState::fresh(SelectionPolicy::FixedSequence);
        assert_eq!(fixed.cursor(), Some(SequenceCursor::default()));
        assert_eq!(fixed.stats(), SessionStats::default());
    }

    #[test]
    fn policy_parses_names() {
        let parse = |raw: &str| raw.parse::<SelectionPolicy>().unwrap();
        assert_eq!(parse("random"), SelectionPolicy::Random);
        assert_eq!(parse("Fixed"), SelectionPolicy::FixedSequence);
        assert_eq!(parse("sequential"), SelectionPolicy::FixedSequence);
        let err = "shuffle".parse::<SelectionPolicy>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown selection policy \"shuffle\" (expected random or fixed)"
        );
    }

    #[test]
    fn state_survives_json_roundtrip() {
        let state = SessionState::fresh(SelectionPolicy::FixedSequence);
        let json = serde_json::to_string(&state).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
