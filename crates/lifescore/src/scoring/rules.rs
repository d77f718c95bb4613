use super::category::LifeCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Inclusive range a bounded rule clamps raw values into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleBounds {
    pub min: f64,
    pub max: f64,
}

impl RuleBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp without panicking on inverted bounds; `max` wins when they cross.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// Declarative scoring rule attached to a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoringRule {
    /// Answer index selects one of (typically ten) target scores.
    LinearMap {
        #[serde(default)]
        values: Vec<f64>,
    },
    /// Logarithmic position of the value within its bounds.
    LogTransform {
        bounds: RuleBounds,
        #[serde(default)]
        reverse: bool,
    },
    Percentage {
        bounds: RuleBounds,
    },
    /// Indexed like `linear_map` but neutral when the index cannot be resolved.
    OptimalRange {
        #[serde(default)]
        values: Vec<f64>,
    },
    Ratio,
    /// Any rule type this engine does not know how to evaluate.
    #[serde(other)]
    Unscored,
}

impl ScoringRule {
    pub const fn kind(&self) -> &'static str {
        match self {
            ScoringRule::LinearMap { .. } => "linear_map",
            ScoringRule::LogTransform { .. } => "log_transform",
            ScoringRule::Percentage { .. } => "percentage",
            ScoringRule::OptimalRange { .. } => "optimal_range",
            ScoringRule::Ratio => "ratio",
            ScoringRule::Unscored => "unscored",
        }
    }
}

/// Rules for the questions of a single category, keyed by question id.
pub type CategoryRules = BTreeMap<String, ScoringRule>;

/// Errors raised while loading a rule table asset.
#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("failed to read rule table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rule table JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable `category -> question id -> rule` lookup consumed by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    categories: BTreeMap<LifeCategory, CategoryRules>,
}

impl RuleTable {
    pub fn new(categories: BTreeMap<LifeCategory, CategoryRules>) -> Self {
        Self { categories }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RuleTableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RuleTableError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn category(&self, category: LifeCategory) -> Option<&CategoryRules> {
        self.categories.get(&category)
    }

    /// Rule for a question id, resolved through its category prefix.
    pub fn rule_for(&self, question_id: &str) -> Option<&ScoringRule> {
        let category = LifeCategory::from_question_id(question_id)?;
        self.category(category)?.get(question_id)
    }

    pub fn insert(&mut self, question_id: impl Into<String>, rule: ScoringRule) -> bool {
        let question_id = question_id.into();
        match LifeCategory::from_question_id(&question_id) {
            Some(category) => {
                self.categories
                    .entry(category)
                    .or_default()
                    .insert(question_id, rule);
                true
            }
            None => false,
        }
    }

    pub fn question_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// Built-in questionnaire used when no rule asset is configured.
    pub fn standard() -> Self {
        let mut table = Self::default();

        table.insert("fin_income", log_transform(0.0, 500_000.0, false));
        table.insert("fin_savings", log_transform(0.0, 1_000_000.0, false));
        table.insert("fin_debt", log_transform(0.0, 250_000.0, true));
        table.insert("fin_emergency_fund", percentage(0.0, 12.0));
        table.insert("fin_budget_confidence", linear_map(LIKERT_ASCENDING));
        table.insert("fin_debt_to_income", ScoringRule::Ratio);

        table.insert("health_exercise_days", percentage(0.0, 7.0));
        table.insert(
            "health_sleep_hours",
            optimal_range(&[
                0.0, 5.0, 10.0, 15.0, 25.0, 40.0, 65.0, 90.0, 100.0, 100.0, 80.0, 60.0, 45.0,
            ]),
        );
        table.insert("health_energy", linear_map(LIKERT_ASCENDING));
        table.insert("health_screen_time", linear_map(LIKERT_DESCENDING));
        table.insert("health_bmi", ScoringRule::Ratio);

        table.insert(
            "social_close_friends",
            optimal_range(&[0.0, 30.0, 55.0, 75.0, 90.0, 100.0, 100.0, 95.0, 90.0]),
        );
        table.insert("social_weekly_interactions", percentage(0.0, 20.0));
        table.insert("social_belonging", linear_map(LIKERT_ASCENDING));
        table.insert("social_loneliness", linear_map(LIKERT_DESCENDING));

        table.insert("rom_satisfaction", linear_map(LIKERT_ASCENDING));
        table.insert("rom_dates_per_month", percentage(0.0, 8.0));
        table.insert("rom_conflict_frequency", linear_map(LIKERT_DESCENDING));
        table.insert("rom_relationship_months", log_transform(0.0, 600.0, false));

        table
    }
}

const LIKERT_ASCENDING: [f64; 10] = [0.0, 11.0, 22.0, 33.0, 44.0, 56.0, 67.0, 78.0, 89.0, 100.0];
const LIKERT_DESCENDING: [f64; 10] = [100.0, 89.0, 78.0, 67.0, 56.0, 44.0, 33.0, 22.0, 11.0, 0.0];

fn linear_map(values: [f64; 10]) -> ScoringRule {
    ScoringRule::LinearMap {
        values: values.to_vec(),
    }
}

fn optimal_range(values: &[f64]) -> ScoringRule {
    ScoringRule::OptimalRange {
        values: values.to_vec(),
    }
}

fn log_transform(min: f64, max: f64, reverse: bool) -> ScoringRule {
    ScoringRule::LogTransform {
        bounds: RuleBounds::new(min, max),
        reverse,
    }
}

fn percentage(min: f64, max: f64) -> ScoringRule {
    ScoringRule::Percentage {
        bounds: RuleBounds::new(min, max),
    }
}
