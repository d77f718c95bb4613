//! Scoring and percentile-normalization engine.
//!
//! Answers are scored one at a time against a declarative rule table, averaged per
//! life-category, and ranked against a cohort's assumed normal distribution. Every function in
//! this module is pure: identical inputs always produce identical outputs, so stored answers can
//! be replayed at any time (for example after a rule-table fix).

mod aggregate;
mod category;
mod cohort;
mod item;
mod percentile;
mod rules;
mod value;

#[cfg(test)]
mod tests;

pub use aggregate::{compute_scores, AssessmentScores, CategoryScores, ItemScore};
pub use category::{LifeCategory, NEUTRAL_SCORE};
pub use cohort::{
    AgeBand, CohortCatalog, CohortCatalogError, CohortDistribution, CohortError, CohortKey,
    CohortParameters,
};
pub use item::{score_item, score_rule};
pub use percentile::{
    compute_percentiles, normal_cdf, percentile_for, Percentiles, MAX_PERCENTILE, MIN_PERCENTILE,
};
pub use rules::{CategoryRules, RuleBounds, RuleTable, RuleTableError, ScoringRule};
pub use value::{Answer, AnswerValue};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stateless evaluator bound to an immutable rule table.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    rules: Arc<RuleTable>,
}

impl AssessmentEngine {
    pub fn new(rules: RuleTable) -> Self {
        Self::shared(Arc::new(rules))
    }

    pub fn shared(rules: Arc<RuleTable>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn score_item(&self, question_id: &str, raw_value: &AnswerValue) -> Option<f64> {
        score_item(&self.rules, question_id, raw_value)
    }

    pub fn compute_scores(&self, answers: &[Answer]) -> AssessmentScores {
        compute_scores(answers, &self.rules)
    }

    /// Score answers and rank them against the cohort, keeping the per-answer audit trail.
    pub fn evaluate(&self, answers: &[Answer], cohort: &CohortParameters) -> AssessmentOutcome {
        let scored = aggregate::tally_answers(answers, &self.rules);
        let percentiles = compute_percentiles(&scored.scores, cohort);

        AssessmentOutcome {
            scores: scored.scores,
            percentiles,
            components: scored.components,
            skipped: scored.skipped,
        }
    }
}

impl Default for AssessmentEngine {
    fn default() -> Self {
        Self::new(RuleTable::standard())
    }
}

/// Scores, percentiles, and the answers that contributed to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    pub scores: AssessmentScores,
    pub percentiles: Percentiles,
    pub components: Vec<ItemScore>,
    /// Question ids excluded because no category or rule matched.
    pub skipped: Vec<String>,
}
