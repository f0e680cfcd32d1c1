//! Answer normalization and comparison against an answer key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{AnswerOption, AnswerResult, QuestionCategory};

/// Upper-case `raw` and drop every whitespace character.
#[must_use]
pub fn normalize_answer(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Distinct letters of an answer, ignoring order, case, whitespace and repeats.
#[must_use]
pub fn answer_letters(raw: &str) -> BTreeSet<char> {
    normalize_answer(raw).chars().collect()
}

/// Grade a submission.
///
/// Multiple choice compares letter sets; the other categories compare the
/// normalized strings exactly.
#[must_use]
pub fn is_correct(category: QuestionCategory, user_answer: &str, correct_answer: &str) -> bool {
    match category {
        QuestionCategory::MultipleChoice => {
            answer_letters(user_answer) == answer_letters(correct_answer)
        }
        QuestionCategory::SingleChoice | QuestionCategory::Judgment => {
            normalize_answer(user_answer) == normalize_answer(correct_answer)
        }
    }
}

/// Grade a submission and keep both normalized strings for display.
#[must_use]
pub fn grade(category: QuestionCategory, user_answer: &str, correct_answer: &str) -> AnswerResult {
    AnswerResult {
        is_correct: is_correct(category, user_answer, correct_answer),
        user_answer: normalize_answer(user_answer),
        correct_answer: normalize_answer(correct_answer),
    }
}

/// How an option is marked once its question has been graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionMark {
    /// Part of the answer key.
    Correct,
    /// Chosen by the learner but not in the key.
    WrongChoice,
    Neutral,
}

/// Mark every option against a graded result.
#[must_use]
pub fn option_marks(options: &[AnswerOption], result: &AnswerResult) -> Vec<(AnswerOption, OptionMark)> {
    let key = answer_letters(&result.correct_answer);
    let chosen = answer_letters(&result.user_answer);
    options
        .iter()
        .map(|option| {
            let letter = option.label.as_char();
            let mark = if key.contains(&letter) {
                OptionMark::Correct
            } else if chosen.contains(&letter) {
                OptionMark::WrongChoice
            } else {
                OptionMark::Neutral
            };
            (option.clone(), mark)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::judgment_options;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_answer(" a c\td "), "ACD");
        assert_eq!(normalize_answer("   "), "");
    }

    #[test]
    fn multiple_choice_ignores_order_and_duplicates() {
        for raw in ["ACD", "CAD", "ACDA", "d c a", "dca"] {
            assert!(
                is_correct(QuestionCategory::MultipleChoice, raw, "ACD"),
                "{raw} should match ACD"
            );
        }
        assert!(!is_correct(QuestionCategory::MultipleChoice, "AC", "ACD"));
        assert!(!is_correct(QuestionCategory::MultipleChoice, "ACDE", "ACD"));
    }

    #[test]
    fn single_and_judgment_compare_exactly() {
        assert!(is_correct(QuestionCategory::SingleChoice, "b", "B"));
        assert!(!is_correct(QuestionCategory::SingleChoice, "BB", "B"));
        assert!(is_correct(QuestionCategory::Judgment, " a", "A "));
        assert!(!is_correct(QuestionCategory::Judgment, "B", "A"));
    }

    #[test]
    fn grade_reports_normalized_strings() {
        let result = grade(QuestionCategory::MultipleChoice, "ca ", "ac");
        assert!(result.is_correct);
        assert_eq!(result.user_answer, "CA");
        assert_eq!(result.correct_answer, "AC");
    }

    #[test]
    fn marks_key_green_and_wrong_choice_red() {
        let result = grade(QuestionCategory::Judgment, "B", "A");
        let marks = option_marks(&judgment_options(), &result);
        assert_eq!(marks[0].1, OptionMark::Correct);
        assert_eq!(marks[1].1, OptionMark::WrongChoice);

        let result = grade(QuestionCategory::Judgment, "A", "A");
        let marks = option_marks(&judgment_options(), &result);
        assert_eq!(marks[1].1, OptionMark::Neutral);
    }
}
