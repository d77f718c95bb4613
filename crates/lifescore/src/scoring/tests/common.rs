use crate::scoring::{
    Answer, AnswerValue, AssessmentEngine, CohortDistribution, CohortParameters, RuleBounds,
    RuleTable, ScoringRule,
};

pub(super) const LIKERT: [f64; 10] = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0];

pub(super) fn rule_table() -> RuleTable {
    let mut table = RuleTable::default();
    table.insert(
        "fin_savings",
        ScoringRule::Percentage {
            bounds: RuleBounds::new(0.0, 20_000.0),
        },
    );
    table.insert(
        "fin_income",
        ScoringRule::LogTransform {
            bounds: RuleBounds::new(0.0, 20_000.0),
            reverse: false,
        },
    );
    table.insert("fin_debt_to_income", ScoringRule::Ratio);
    table.insert(
        "health_energy",
        ScoringRule::LinearMap {
            values: LIKERT.to_vec(),
        },
    );
    table.insert(
        "social_friends",
        ScoringRule::OptimalRange {
            values: vec![20.0, 60.0, 100.0],
        },
    );
    table.insert(
        "rom_satisfaction",
        ScoringRule::LinearMap {
            values: LIKERT.to_vec(),
        },
    );
    table
}

pub(super) fn engine() -> AssessmentEngine {
    AssessmentEngine::new(rule_table())
}

pub(super) fn answer(question_id: &str, value: impl Into<AnswerValue>) -> Answer {
    Answer::new(question_id, value)
}

pub(super) fn cohort(mean: f64, stddev: f64) -> CohortParameters {
    CohortParameters::uniform(CohortDistribution::new(mean, stddev).expect("valid cohort"))
}

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}
