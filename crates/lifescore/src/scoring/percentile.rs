use super::aggregate::AssessmentScores;
use super::category::LifeCategory;
use super::cohort::{CohortDistribution, CohortParameters};
use serde::{Deserialize, Serialize};

/// Reported percentiles never reach the absolute extremes.
pub const MIN_PERCENTILE: f64 = 0.1;
pub const MAX_PERCENTILE: f64 = 99.9;

// Abramowitz & Stegun 7.1.26, max absolute error ~1.5e-7.
const ERF_A1: f64 = 0.254829592;
const ERF_A2: f64 = -0.284496736;
const ERF_A3: f64 = 1.421413741;
const ERF_A4: f64 = -1.453152027;
const ERF_A5: f64 = 1.061405429;
const ERF_P: f64 = 0.3275911;

/// Cohort-relative percentiles. Health is keyed `health` here, unlike the score payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub overall: f64,
    pub financial: f64,
    pub health: f64,
    pub social: f64,
    pub romantic: f64,
}

impl Percentiles {
    pub fn for_category(&self, category: LifeCategory) -> f64 {
        match category {
            LifeCategory::Financial => self.financial,
            LifeCategory::HealthFitness => self.health,
            LifeCategory::Social => self.social,
            LifeCategory::Romantic => self.romantic,
        }
    }
}

/// Map every score onto its cohort distribution.
pub fn compute_percentiles(scores: &AssessmentScores, cohort: &CohortParameters) -> Percentiles {
    let category = |category: LifeCategory| {
        percentile_for(
            scores.categories.get(category),
            cohort.for_category(category),
        )
    };

    Percentiles {
        overall: percentile_for(scores.overall, &cohort.overall),
        financial: category(LifeCategory::Financial),
        health: category(LifeCategory::HealthFitness),
        social: category(LifeCategory::Social),
        romantic: category(LifeCategory::Romantic),
    }
}

/// Probability (0.1..=99.9) that a cohort member scores at or below `score`.
pub fn percentile_for(score: f64, distribution: &CohortDistribution) -> f64 {
    let percentile = 100.0 * normal_cdf(distribution.z_score(score));
    percentile.clamp(MIN_PERCENTILE, MAX_PERCENTILE)
}

/// Standard normal CDF.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + ERF_P * x);
    let poly = ((((ERF_A5 * t + ERF_A4) * t + ERF_A3) * t + ERF_A2) * t + ERF_A1) * t;
    let y = 1.0 - poly * (-x * x).exp();

    sign * y
}
