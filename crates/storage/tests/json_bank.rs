use exam_core::model::QuestionCategory;
use storage::sample::{sample_bank, sample_records};
use storage::{BankSource, JsonBankSource, QuestionRecord, StorageError, write_bank_file};

async fn write_sample_bank(dir: &std::path::Path) {
    for category in QuestionCategory::ALL {
        write_bank_file(dir, category, &sample_records(category))
            .await
            .expect("write bank file");
    }
}

#[tokio::test]
async fn loads_bank_written_by_seed_helpers() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_bank(dir.path()).await;

    let bank = JsonBankSource::new(dir.path()).load_bank().await.unwrap();
    assert_eq!(bank, sample_bank());
    assert_eq!(
        bank.get(QuestionCategory::MultipleChoice, 0)
            .unwrap()
            .correct_answer(),
        "ABD"
    );
}

#[tokio::test]
async fn reports_every_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    write_bank_file(
        dir.path(),
        QuestionCategory::MultipleChoice,
        &sample_records(QuestionCategory::MultipleChoice),
    )
    .await
    .unwrap();

    let err = JsonBankSource::new(dir.path()).load_bank().await.unwrap_err();
    match err {
        StorageError::MissingBankFiles { files } => {
            assert_eq!(files, vec!["single_choice.json", "judgment.json"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_json_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_bank(dir.path()).await;
    std::fs::write(dir.path().join("judgment.json"), "{not json").unwrap();

    let err = JsonBankSource::new(dir.path()).load_bank().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)), "{err}");
}

#[tokio::test]
async fn invalid_record_names_category_and_index() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_bank(dir.path()).await;
    let records = vec![
        QuestionRecord::new("ok", &["a", "b", "c", "d"], "A"),
        QuestionRecord::new("bad", &["a", "b", "c", "d"], "E"),
    ];
    write_bank_file(dir.path(), QuestionCategory::SingleChoice, &records)
        .await
        .unwrap();

    let err = JsonBankSource::new(dir.path()).load_bank().await.unwrap_err();
    match err {
        StorageError::InvalidRecord {
            category, index, ..
        } => {
            assert_eq!(category, QuestionCategory::SingleChoice);
            assert_eq!(index, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn keeps_file_order_and_allows_empty_category() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_bank(dir.path()).await;
    std::fs::write(dir.path().join("multiple_choice.json"), "[]").unwrap();

    let bank = JsonBankSource::new(dir.path()).load_bank().await.unwrap();
    assert_eq!(bank.len(QuestionCategory::MultipleChoice), 0);
    let prompts: Vec<_> = bank
        .questions(QuestionCategory::SingleChoice)
        .iter()
        .map(|q| q.prompt().to_string())
        .collect();
    let expected: Vec<_> = sample_records(QuestionCategory::SingleChoice)
        .into_iter()
        .map(|r| r.prompt)
        .collect();
    assert_eq!(prompts, expected);
}
