use crate::infra::{load_cohort_catalog, load_rule_table};
use chrono::{DateTime, Utc};
use clap::Args;
use lifescore::assessments::{AnswerImporter, RespondentProfile};
use lifescore::config::{AppConfig, ScoringConfig};
use lifescore::error::AppError;
use lifescore::scoring::{Answer, AssessmentEngine, AssessmentOutcome, CohortKey, LifeCategory};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Answers export to score (CSV with question_id,value columns, or a JSON array)
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Rule table asset overriding LIFESCORE_RULES_PATH
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Cohort statistics asset overriding LIFESCORE_COHORTS_PATH
    #[arg(long)]
    pub(crate) cohorts: Option<PathBuf>,
    /// Respondent age used to pick the cohort
    #[arg(long)]
    pub(crate) age: Option<u8>,
    /// Respondent gender used to pick the cohort
    #[arg(long)]
    pub(crate) gender: Option<String>,
    /// Respondent region used to pick the cohort
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreReport {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) cohort: Option<CohortKey>,
    #[serde(flatten)]
    pub(crate) outcome: AssessmentOutcome,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        answers,
        rules,
        cohorts,
        age,
        gender,
        region,
        json,
    } = args;

    let mut scoring = AppConfig::load()?.scoring;
    if rules.is_some() {
        scoring.rules_path = rules;
    }
    if cohorts.is_some() {
        scoring.cohorts_path = cohorts;
    }

    let respondent = match (age, gender, region) {
        (Some(age), Some(gender), Some(region)) => Some(RespondentProfile {
            age,
            gender,
            region,
        }),
        _ => None,
    };

    let answers = AnswerImporter::from_path(&answers)?;
    let report = score_answers(&answers, &scoring, respondent.as_ref())?;

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_report(&report);
    }

    Ok(())
}

pub(crate) fn score_answers(
    answers: &[Answer],
    scoring: &ScoringConfig,
    respondent: Option<&RespondentProfile>,
) -> Result<ScoreReport, AppError> {
    let engine = AssessmentEngine::new(load_rule_table(scoring)?);
    let catalog = load_cohort_catalog(scoring)?;

    let cohort = respondent.map(RespondentProfile::cohort_key);
    let outcome = engine.evaluate(answers, catalog.resolve(cohort.as_ref()));

    Ok(ScoreReport {
        generated_at: Utc::now(),
        cohort,
        outcome,
    })
}

fn render_report(report: &ScoreReport) {
    let ScoreReport {
        generated_at,
        cohort,
        outcome,
    } = report;

    println!("Life assessment report ({})", generated_at.format("%Y-%m-%d %H:%M UTC"));
    match cohort {
        Some(key) => println!(
            "Cohort: {} / {} / {}",
            key.age_band.label(),
            key.gender,
            key.region
        ),
        None => println!("Cohort: general population"),
    }

    println!(
        "\nOverall: {:.1} (percentile {:.1})",
        outcome.scores.overall, outcome.percentiles.overall
    );
    for category in LifeCategory::ordered() {
        let answered = outcome
            .components
            .iter()
            .filter(|component| component.category == category)
            .count();
        println!(
            "- {}: {:.1} (percentile {:.1}, {} answers)",
            category.label(),
            outcome.scores.categories.get(category),
            outcome.percentiles.for_category(category),
            answered
        );
    }

    if !outcome.components.is_empty() {
        println!("\nScored answers:");
        for component in &outcome.components {
            println!(
                "  - {} [{}]: {:.1}",
                component.question_id, component.rule, component.score
            );
        }
    }

    if !outcome.skipped.is_empty() {
        println!("\nSkipped (no scoring rule): {}", outcome.skipped.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifescore::scoring::NEUTRAL_SCORE;

    fn answers() -> Vec<Answer> {
        vec![
            Answer::new("fin_emergency_fund", 6),
            Answer::new("health_exercise_days", "7"),
            Answer::new("pet_name", "Biscuit"),
        ]
    }

    #[test]
    fn scores_answers_against_the_fallback_cohort() {
        let report =
            score_answers(&answers(), &ScoringConfig::default(), None).expect("report builds");

        assert!(report.cohort.is_none());
        assert_eq!(report.outcome.scores.categories.financial, 50.0);
        assert_eq!(report.outcome.scores.categories.health_fitness, 100.0);
        assert_eq!(report.outcome.scores.categories.social, NEUTRAL_SCORE);
        assert_eq!(report.outcome.skipped, vec!["pet_name".to_string()]);
    }

    #[test]
    fn respondent_profile_selects_a_normalized_cohort_key() {
        let respondent = RespondentProfile {
            age: 29,
            gender: " Female ".to_string(),
            region: "US".to_string(),
        };

        let report = score_answers(&answers(), &ScoringConfig::default(), Some(&respondent))
            .expect("report builds");

        let key = report.cohort.expect("cohort key");
        assert_eq!(key.age_band.label(), "25-34");
        assert_eq!(key.gender, "female");
        assert_eq!(key.region, "us");
    }

    #[test]
    fn json_report_flattens_the_outcome() {
        let report =
            score_answers(&answers(), &ScoringConfig::default(), None).expect("report builds");
        let value = serde_json::to_value(&report).expect("serializes");

        assert!(value.get("generated_at").is_some());
        assert!(value["scores"]["categories"]["health_fitness"].is_number());
        assert!(value["percentiles"]["health"].is_number());
    }
}
