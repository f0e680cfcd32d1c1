//! A small built-in bank used by the seed binary and by tests.

use exam_core::model::{QuestionBank, QuestionCategory};

use crate::json::QuestionRecord;

/// Sample rows for `category`.
#[must_use]
pub fn sample_records(category: QuestionCategory) -> Vec<QuestionRecord> {
    match category {
        QuestionCategory::SingleChoice => vec![
            QuestionRecord::new(
                "Which keyword declares an immutable binding in Rust?",
                &["let", "mut", "static mut", "var"],
                "A",
            ),
            QuestionRecord::new(
                "Which type owns a heap-allocated UTF-8 string?",
                &["&str", "String", "char", "[u8; 4]"],
                "B",
            ),
            QuestionRecord::new(
                "Which trait enables the `?` operator on a custom error conversion?",
                &["Into", "AsRef", "From", "Deref"],
                "C",
            ),
        ],
        QuestionCategory::MultipleChoice => vec![
            QuestionRecord::new(
                "Which of these are smart pointers in std?",
                &["Box", "Rc", "u32", "Arc", "bool"],
                "ABD",
            ),
            QuestionRecord::new(
                "Which collections live in std::collections?",
                &["HashMap", "Vec", "BTreeSet", "VecDeque", "Option"],
                "ACD",
            ),
        ],
        QuestionCategory::Judgment => vec![
            QuestionRecord::new("A `&mut T` may alias another live `&T`.", &[], "B"),
            QuestionRecord::new("`Option<T>` is an enum.", &[], "A"),
        ],
    }
}

/// The sample rows validated into a bank.
///
/// # Panics
///
/// Panics if a built-in sample row is invalid.
#[must_use]
pub fn sample_bank() -> QuestionBank {
    let load = |category| {
        sample_records(category)
            .into_iter()
            .map(|record| {
                record
                    .into_question(category)
                    .unwrap_or_else(|e| panic!("built-in {category} sample is invalid: {e}"))
            })
            .collect()
    };
    QuestionBank::new(
        load(QuestionCategory::SingleChoice),
        load(QuestionCategory::MultipleChoice),
        load(QuestionCategory::Judgment),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_bank_has_every_category() {
        let overview = sample_bank().overview();
        assert_eq!(overview.single_choice, 3);
        assert_eq!(overview.multiple_choice, 2);
        assert_eq!(overview.judgment, 2);
        assert_eq!(overview.total, 7);
    }
}
