use exam_core::model::{Question, QuestionCategory, QuestionError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row of a bank file.
///
/// Bank files are spreadsheet exports, so the canonical keys are the
/// exporter's column names. Shorter aliases are accepted for hand-written
/// banks. Cells may be strings, numbers or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "Unnamed: 1", alias = "prompt", default, deserialize_with = "lenient_text")]
    pub prompt: String,
    #[serde(rename = "Unnamed: 2", alias = "a", default, deserialize_with = "lenient_text")]
    pub option_a: String,
    #[serde(rename = "Unnamed: 3", alias = "b", default, deserialize_with = "lenient_text")]
    pub option_b: String,
    #[serde(rename = "Unnamed: 4", alias = "c", default, deserialize_with = "lenient_text")]
    pub option_c: String,
    #[serde(rename = "Unnamed: 5", alias = "d", default, deserialize_with = "lenient_text")]
    pub option_d: String,
    #[serde(rename = "Unnamed: 6", alias = "e", default, deserialize_with = "lenient_text")]
    pub option_e: String,
    #[serde(rename = "Unnamed: 7", alias = "answer", default, deserialize_with = "lenient_text")]
    pub answer: String,
}

impl QuestionRecord {
    /// Build a record from a prompt, option texts in label order and an answer key.
    #[must_use]
    pub fn new(prompt: &str, options: &[&str], answer: &str) -> Self {
        let option = |idx: usize| options.get(idx).map(|s| (*s).to_string()).unwrap_or_default();
        Self {
            prompt: prompt.to_string(),
            option_a: option(0),
            option_b: option(1),
            option_c: option(2),
            option_d: option(3),
            option_e: option(4),
            answer: answer.to_string(),
        }
    }

    /// Validate the record as a question of `category`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the record is not a valid question.
    pub fn into_question(self, category: QuestionCategory) -> Result<Question, QuestionError> {
        let options = vec![
            self.option_a,
            self.option_b,
            self.option_c,
            self.option_d,
            self.option_e,
        ];
        Question::new(category, self.prompt, options, self.answer)
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}
