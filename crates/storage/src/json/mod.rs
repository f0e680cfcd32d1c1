use std::path::{Path, PathBuf};

use async_trait::async_trait;
use exam_core::model::{Question, QuestionBank, QuestionCategory};
use tracing::{debug, info};

use crate::repository::{BankSource, StorageError};

mod mapping;

pub use mapping::QuestionRecord;

/// File name holding the questions of `category`.
#[must_use]
pub fn bank_file_name(category: QuestionCategory) -> &'static str {
    match category {
        QuestionCategory::SingleChoice => "single_choice.json",
        QuestionCategory::MultipleChoice => "multiple_choice.json",
        QuestionCategory::Judgment => "judgment.json",
    }
}

/// Reads a bank from one JSON array file per category in a directory.
#[derive(Debug, Clone)]
pub struct JsonBankSource {
    dir: PathBuf,
}

impl JsonBankSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for `category`.
    #[must_use]
    pub fn file_path(&self, category: QuestionCategory) -> PathBuf {
        self.dir.join(bank_file_name(category))
    }

    /// Names of the category files absent from the directory.
    pub async fn missing_files(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for category in QuestionCategory::ALL {
            let exists = tokio::fs::try_exists(self.file_path(category))
                .await
                .unwrap_or(false);
            if !exists {
                missing.push(bank_file_name(category).to_string());
            }
        }
        missing
    }

    async fn load_category(&self, category: QuestionCategory) -> Result<Vec<Question>, StorageError> {
        let path = self.file_path(category);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StorageError::Io {
                path: path.clone(),
                message: e.to_string(),
            })?;
        let records: Vec<QuestionRecord> = serde_json::from_str(&raw)
            .map_err(|e| StorageError::Serialization(format!("{}: {e}", path.display())))?;

        let questions = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .into_question(category)
                    .map_err(|source| StorageError::InvalidRecord {
                        category,
                        index,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(%category, count = questions.len(), path = %path.display(), "loaded bank file");
        Ok(questions)
    }
}

#[async_trait]
impl BankSource for JsonBankSource {
    async fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        let missing = self.missing_files().await;
        if !missing.is_empty() {
            return Err(StorageError::MissingBankFiles { files: missing });
        }

        let single = self.load_category(QuestionCategory::SingleChoice).await?;
        let multiple = self.load_category(QuestionCategory::MultipleChoice).await?;
        let judgment = self.load_category(QuestionCategory::Judgment).await?;
        let bank = QuestionBank::new(single, multiple, judgment);

        let overview = bank.overview();
        info!(
            dir = %self.dir.display(),
            single_choice = overview.single_choice,
            multiple_choice = overview.multiple_choice,
            judgment = overview.judgment,
            "question bank loaded"
        );
        Ok(bank)
    }
}

/// Write `records` as the bank file for `category` under `dir`.
///
/// # Errors
///
/// Returns `StorageError` if the records cannot be encoded or written.
pub async fn write_bank_file(
    dir: &Path,
    category: QuestionCategory,
    records: &[QuestionRecord],
) -> Result<PathBuf, StorageError> {
    let path = dir.join(bank_file_name(category));
    let body = serde_json::to_string_pretty(records)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    tokio::fs::write(&path, body)
        .await
        .map_err(|e| StorageError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
    Ok(path)
}
