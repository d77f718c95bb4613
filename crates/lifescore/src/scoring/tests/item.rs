use super::common::*;
use crate::scoring::{score_item, score_rule, AnswerValue, RuleBounds, RuleTable, ScoringRule};
use serde_json::json;

fn log_rule(min: f64, max: f64, reverse: bool) -> ScoringRule {
    ScoringRule::LogTransform {
        bounds: RuleBounds::new(min, max),
        reverse,
    }
}

#[test]
fn linear_map_clamps_index_to_last_entry() {
    let rule = ScoringRule::LinearMap {
        values: vec![10.0, 20.0, 30.0],
    };

    assert_eq!(score_rule(&rule, &AnswerValue::from(7)), 30.0);
    assert_eq!(score_rule(&rule, &AnswerValue::from("1")), 20.0);
}

#[test]
fn linear_map_treats_unparsable_values_as_index_zero() {
    let rule = ScoringRule::LinearMap {
        values: vec![10.0, 20.0, 30.0],
    };

    assert_eq!(score_rule(&rule, &AnswerValue::from("sometimes")), 10.0);
    assert_eq!(
        score_rule(&rule, &AnswerValue::Structured(json!({ "choice": 2 }))),
        10.0
    );
}

#[test]
fn linear_map_defaults_to_zero_when_entry_is_absent() {
    let empty = ScoringRule::LinearMap { values: Vec::new() };
    let populated = ScoringRule::LinearMap {
        values: vec![10.0, 20.0],
    };

    assert_eq!(score_rule(&empty, &AnswerValue::from(3)), 0.0);
    assert_eq!(score_rule(&populated, &AnswerValue::from(-2)), 0.0);
}

#[test]
fn optimal_range_is_neutral_when_entry_is_absent() {
    let empty = ScoringRule::OptimalRange { values: Vec::new() };
    let populated = ScoringRule::OptimalRange {
        values: vec![20.0, 60.0, 100.0],
    };

    assert_eq!(score_rule(&empty, &AnswerValue::from(1)), 50.0);
    assert_eq!(score_rule(&populated, &AnswerValue::from(-1)), 50.0);
    assert_eq!(score_rule(&populated, &AnswerValue::from(12)), 100.0);
    assert_eq!(score_rule(&populated, &AnswerValue::from("n/a")), 20.0);
}

#[test]
fn log_transform_maps_bounds_to_scale_endpoints() {
    let forward = log_rule(0.0, 20_000.0, false);
    let reverse = log_rule(0.0, 20_000.0, true);

    assert_eq!(score_rule(&forward, &AnswerValue::from(0)), 0.0);
    assert_close(score_rule(&forward, &AnswerValue::from(20_000)), 100.0, 1e-9);
    assert_close(score_rule(&reverse, &AnswerValue::from(0)), 100.0, 1e-9);
    assert_close(score_rule(&reverse, &AnswerValue::from(20_000)), 0.0, 1e-9);
}

#[test]
fn log_transform_clamps_values_outside_bounds() {
    let rule = log_rule(0.0, 20_000.0, false);

    assert_eq!(score_rule(&rule, &AnswerValue::from(-500)), 0.0);
    assert_close(score_rule(&rule, &AnswerValue::from(1_000_000)), 100.0, 1e-9);
}

#[test]
fn log_transform_compresses_large_values() {
    let rule = log_rule(0.0, 99.0, false);

    let score = score_rule(&rule, &AnswerValue::from(9));
    assert_close(score, 41.14, 0.01);

    let with_lower_bound = log_rule(5.0, 99.0, false);
    assert_eq!(score_rule(&with_lower_bound, &AnswerValue::from(5)), 0.0);
}

#[test]
fn log_transform_is_neutral_for_degenerate_bounds() {
    let rule = log_rule(0.0, 1.0, false);
    assert_eq!(score_rule(&rule, &AnswerValue::from(1)), 50.0);
}

#[test]
fn percentage_scales_against_upper_bound() {
    let rule = ScoringRule::Percentage {
        bounds: RuleBounds::new(0.0, 20_000.0),
    };

    assert_eq!(score_rule(&rule, &AnswerValue::from(10_000)), 50.0);
    assert_eq!(score_rule(&rule, &AnswerValue::from("5000")), 25.0);
    assert_eq!(score_rule(&rule, &AnswerValue::from(90_000)), 100.0);
    assert_eq!(score_rule(&rule, &AnswerValue::from("lots")), 0.0);
}

#[test]
fn percentage_with_zero_upper_bound_is_neutral() {
    let rule = ScoringRule::Percentage {
        bounds: RuleBounds::new(0.0, 0.0),
    };
    assert_eq!(score_rule(&rule, &AnswerValue::from(0)), 50.0);
}

#[test]
fn ratio_and_unknown_types_are_neutral() {
    for value in [AnswerValue::from(0), AnswerValue::from("999"), AnswerValue::from("x")] {
        assert_eq!(score_rule(&ScoringRule::Ratio, &value), 50.0);
        assert_eq!(score_rule(&ScoringRule::Unscored, &value), 50.0);
    }
}

#[test]
fn score_item_excludes_unknown_categories_and_missing_rules() {
    let table = rule_table();

    assert_eq!(score_item(&table, "xyz_mood", &AnswerValue::from(5)), None);
    assert_eq!(score_item(&table, "fin_unlisted", &AnswerValue::from(5)), None);
    assert_eq!(
        score_item(&table, "fin_savings", &AnswerValue::from(10_000)),
        Some(50.0)
    );
}

#[test]
fn standard_rules_stay_within_score_scale() {
    let table = RuleTable::standard();
    let inputs = [
        AnswerValue::from(-1_000_000_000),
        AnswerValue::from(-1),
        AnswerValue::from(0),
        AnswerValue::from(0.5),
        AnswerValue::from(3),
        AnswerValue::from(9),
        AnswerValue::from(1_000_000_000),
        AnswerValue::from("often"),
        AnswerValue::Structured(json!([1, 2])),
    ];

    for category in crate::scoring::LifeCategory::ordered() {
        let rules = table.category(category).expect("category rules");
        for (question_id, rule) in rules {
            for input in &inputs {
                let score = score_rule(rule, input);
                assert!(
                    (0.0..=100.0).contains(&score),
                    "{question_id} scored {score} for {input:?}"
                );
            }
        }
    }
}

#[test]
fn scoring_is_deterministic() {
    let table = rule_table();
    let value = AnswerValue::from("12345");

    let first = score_item(&table, "fin_income", &value);
    let second = score_item(&table, "fin_income", &value);

    assert!(first.is_some());
    assert_eq!(first, second);
}
