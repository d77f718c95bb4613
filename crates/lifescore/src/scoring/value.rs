use serde::{Deserialize, Serialize};

/// Raw answer value as captured by the questionnaire.
///
/// Persistence stores answers as strings or numbers; structured values are expected to be
/// reduced to a scalar before scoring and are otherwise treated as unparsable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
    Structured(serde_json::Value),
}

impl AnswerValue {
    /// Integer position used by the indexed rule variants. Fractions truncate toward zero.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            AnswerValue::Number(value) => truncate(*value),
            AnswerValue::Text(raw) => {
                let trimmed = raw.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(truncate))
            }
            AnswerValue::Structured(_) => None,
        }
    }

    /// Numeric reading used by the bounded rule variants.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) => Some(*value).filter(|value| value.is_finite()),
            AnswerValue::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
            AnswerValue::Structured(_) => None,
        }
    }
}

/// One questionnaire answer as handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
        }
    }
}

fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for AnswerValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
