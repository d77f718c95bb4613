use serde::{Deserialize, Serialize};
use std::fmt;

/// Score assigned when a category has no data or a rule cannot be evaluated.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Delimiter separating the category prefix from the rest of a question id.
const QUESTION_ID_DELIMITER: char = '_';

/// The four fixed life-categories every assessment is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeCategory {
    Financial,
    HealthFitness,
    Social,
    Romantic,
}

impl LifeCategory {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Financial,
            Self::HealthFitness,
            Self::Social,
            Self::Romantic,
        ]
    }

    /// Key used in category score payloads.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::HealthFitness => "health_fitness",
            Self::Social => "social",
            Self::Romantic => "romantic",
        }
    }

    /// Key used in percentile payloads. Health is reported as `health` there.
    pub const fn percentile_key(self) -> &'static str {
        match self {
            Self::HealthFitness => "health",
            other => other.key(),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Financial => "Financial",
            Self::HealthFitness => "Health & Fitness",
            Self::Social => "Social",
            Self::Romantic => "Romantic",
        }
    }

    /// Question id prefix owned by this category.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Financial => "fin",
            Self::HealthFitness => "health",
            Self::Social => "social",
            Self::Romantic => "rom",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|category| category.prefix() == prefix)
    }

    /// Resolve the category of a question id from its first `_`-delimited token.
    pub fn from_question_id(question_id: &str) -> Option<Self> {
        let prefix = question_id
            .split(QUESTION_ID_DELIMITER)
            .next()
            .unwrap_or_default();
        Self::from_prefix(prefix)
    }
}

impl fmt::Display for LifeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
