use super::category::NEUTRAL_SCORE;
use super::rules::{RuleBounds, RuleTable, ScoringRule};
use super::value::AnswerValue;

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 100.0;

/// Default for `linear_map` when the index resolves to no entry.
const LINEAR_MAP_FALLBACK: f64 = 0.0;

/// Score a single answer against the rule table.
///
/// Returns `None` when the question id has no category or its category has no rule for it;
/// such answers are excluded from aggregation.
pub fn score_item(rules: &RuleTable, question_id: &str, raw_value: &AnswerValue) -> Option<f64> {
    rules
        .rule_for(question_id)
        .map(|rule| score_rule(rule, raw_value))
}

/// Evaluate one rule against one raw value.
pub fn score_rule(rule: &ScoringRule, raw_value: &AnswerValue) -> f64 {
    match rule {
        ScoringRule::LinearMap { values } => {
            indexed(values, raw_value.as_index().unwrap_or(0), LINEAR_MAP_FALLBACK)
        }
        ScoringRule::LogTransform { bounds, reverse } => {
            log_position(bounds, numeric_or_min(bounds, raw_value), *reverse)
        }
        ScoringRule::Percentage { bounds } => {
            percentage(bounds, numeric_or_min(bounds, raw_value))
        }
        ScoringRule::OptimalRange { values } => {
            indexed(values, raw_value.as_index().unwrap_or(0), NEUTRAL_SCORE)
        }
        ScoringRule::Ratio | ScoringRule::Unscored => NEUTRAL_SCORE,
    }
}

fn numeric_or_min(bounds: &RuleBounds, raw_value: &AnswerValue) -> f64 {
    raw_value.as_number().unwrap_or(bounds.min)
}

/// Look up `values[min(index, len - 1)]`; negative indices and empty lists use `fallback`.
fn indexed(values: &[f64], index: i64, fallback: f64) -> f64 {
    let Some(last) = values.len().checked_sub(1) else {
        return fallback;
    };
    if index < 0 {
        return fallback;
    }

    let position = usize::try_from(index).unwrap_or(usize::MAX).min(last);
    values
        .get(position)
        .copied()
        .filter(|value| value.is_finite())
        .unwrap_or(fallback)
}

fn log_position(bounds: &RuleBounds, raw: f64, reverse: bool) -> f64 {
    let value = bounds.clamp(raw);
    let floor = (bounds.min.max(1.0) + 1.0).ln();
    let span = (bounds.max + 1.0).ln() - floor;
    if !(span.is_finite() && span > 0.0) {
        return NEUTRAL_SCORE;
    }

    let mut score = MAX_SCORE * ((value + 1.0).ln() - floor) / span;
    if reverse {
        score = MAX_SCORE - score;
    }

    if score.is_finite() {
        score.clamp(MIN_SCORE, MAX_SCORE)
    } else {
        NEUTRAL_SCORE
    }
}

fn percentage(bounds: &RuleBounds, raw: f64) -> f64 {
    let value = bounds.clamp(raw);
    let score = MAX_SCORE * value / bounds.max;
    if score.is_finite() {
        score
    } else {
        NEUTRAL_SCORE
    }
}
