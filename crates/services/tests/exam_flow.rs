use std::collections::HashMap;

use exam_core::ExamError;
use exam_core::model::{QuestionBank, QuestionCategory, SelectionPolicy, SessionKey};
use services::{AppServices, ExamConfig, ExamServiceError};
use storage::sample::{sample_bank, sample_records};
use storage::write_bank_file;

async fn seeded_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for category in QuestionCategory::ALL {
        write_bank_file(dir.path(), category, &sample_records(category))
            .await
            .unwrap();
    }
    dir
}

#[tokio::test]
async fn fixed_exam_walks_the_whole_bank_once() {
    let dir = seeded_dir().await;
    let config = ExamConfig::default()
        .with_bank_dir(dir.path())
        .with_policy(SelectionPolicy::FixedSequence);
    let services = AppServices::load(config).await.unwrap();
    let exam = services.exam();
    let key = SessionKey::generate();
    exam.start_exam(key).await.unwrap();

    let bank = sample_bank();
    let mut seen = Vec::new();
    loop {
        match exam.next_question(key).await {
            Ok(view) => {
                let idx = seen
                    .iter()
                    .filter(|(c, _)| *c == view.category)
                    .count();
                let key_answer = bank.get(view.category, idx).unwrap().correct_answer();
                assert_eq!(view.prompt, bank.get(view.category, idx).unwrap().prompt());
                exam.submit_answer(key, key_answer).await.unwrap();
                seen.push((view.category, view.question_number));
            }
            Err(ExamServiceError::Engine(ExamError::NoQuestionAvailable)) => break,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(seen.len(), bank.total());
    let categories: Vec<_> = seen.iter().map(|(c, _)| *c).collect();
    let mut sorted = categories.clone();
    sorted.sort_by_key(|c| c.index());
    assert_eq!(categories, sorted, "categories visited in bank order");

    let stats = exam.stats(key).await.unwrap();
    assert_eq!(stats.correct_answers, 7);
    assert!((stats.accuracy - 100.0).abs() < f64::EPSILON);

    // Exhaustion is sticky.
    assert!(exam.next_question(key).await.is_err());
}

#[tokio::test]
async fn random_exam_spreads_over_categories() {
    let config = ExamConfig::default().with_policy(SelectionPolicy::Random);
    let services = AppServices::from_bank(config, sample_bank()).unwrap();
    let exam = services.exam();
    let key = SessionKey::generate();
    exam.start_exam(key).await.unwrap();

    let mut counts: HashMap<QuestionCategory, u32> = HashMap::new();
    for _ in 0..600 {
        let view = exam.next_question(key).await.unwrap();
        *counts.entry(view.category).or_default() += 1;
    }
    for category in QuestionCategory::ALL {
        let n = counts.get(&category).copied().unwrap_or(0);
        assert!((120..=280).contains(&n), "{category}: {n}");
    }
    assert_eq!(exam.stats(key).await.unwrap().total_questions, 600);
}

#[tokio::test]
async fn random_exam_reports_empty_category_without_fallback() {
    let only_single = sample_bank()
        .questions(QuestionCategory::SingleChoice)
        .to_vec();
    let bank = QuestionBank::new(only_single, Vec::new(), Vec::new());
    let services = AppServices::from_bank(ExamConfig::default(), bank).unwrap();
    let exam = services.exam();
    let key = SessionKey::generate();
    exam.start_exam(key).await.unwrap();

    let mut empty_hits = 0;
    for _ in 0..60 {
        match exam.next_question(key).await {
            Ok(view) => assert_eq!(view.category, QuestionCategory::SingleChoice),
            Err(ExamServiceError::Engine(ExamError::NoQuestionAvailable)) => empty_hits += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert!(empty_hits > 0);
    let stats = exam.stats(key).await.unwrap();
    assert_eq!(stats.total_questions, 60 - empty_hits);
}
