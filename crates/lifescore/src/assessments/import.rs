use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::scoring::{Answer, AnswerValue};

#[derive(Debug)]
pub enum AnswerImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for AnswerImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerImportError::Io(err) => write!(f, "failed to read answers export: {}", err),
            AnswerImportError::Csv(err) => write!(f, "invalid answers CSV data: {}", err),
            AnswerImportError::Json(err) => write!(f, "invalid answers JSON data: {}", err),
        }
    }
}

impl std::error::Error for AnswerImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnswerImportError::Io(err) => Some(err),
            AnswerImportError::Csv(err) => Some(err),
            AnswerImportError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for AnswerImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for AnswerImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for AnswerImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Reads answers exported by the persistence layer.
pub struct AnswerImporter;

impl AnswerImporter {
    /// Load a `.json` array of answers or a `question_id,value` CSV, chosen by extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Answer>, AnswerImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_json = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_reader(file)
        } else {
            Self::from_csv_reader(file)
        }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Vec<Answer>, AnswerImportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Rows without a question id are dropped; numeric-looking values become numbers.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<Answer>, AnswerImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut answers = Vec::new();

        for record in csv_reader.deserialize::<AnswerRow>() {
            let row = record?;
            if row.question_id.is_empty() {
                continue;
            }
            answers.push(Answer {
                question_id: row.question_id,
                value: scalar_value(row.value),
            });
        }

        Ok(answers)
    }
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    question_id: String,
    #[serde(default)]
    value: String,
}

fn scalar_value(raw: String) -> AnswerValue {
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => AnswerValue::Number(number),
        _ => AnswerValue::Text(raw),
    }
}
