use super::category::{LifeCategory, NEUTRAL_SCORE};
use super::item::score_rule;
use super::rules::RuleTable;
use super::value::Answer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Mean sub-score per life-category. Categories without answers hold `NEUTRAL_SCORE`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub financial: f64,
    pub health_fitness: f64,
    pub social: f64,
    pub romantic: f64,
}

impl CategoryScores {
    pub fn get(&self, category: LifeCategory) -> f64 {
        match category {
            LifeCategory::Financial => self.financial,
            LifeCategory::HealthFitness => self.health_fitness,
            LifeCategory::Social => self.social,
            LifeCategory::Romantic => self.romantic,
        }
    }

    /// Unweighted mean of all four categories.
    pub fn mean(&self) -> f64 {
        let total: f64 = LifeCategory::ordered()
            .into_iter()
            .map(|category| self.get(category))
            .sum();
        total / LifeCategory::ordered().len() as f64
    }
}

impl Default for CategoryScores {
    fn default() -> Self {
        Self {
            financial: NEUTRAL_SCORE,
            health_fitness: NEUTRAL_SCORE,
            social: NEUTRAL_SCORE,
            romantic: NEUTRAL_SCORE,
        }
    }
}

/// Category scores plus the overall score derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessmentScores {
    pub categories: CategoryScores,
    pub overall: f64,
}

impl AssessmentScores {
    pub fn from_categories(categories: CategoryScores) -> Self {
        Self {
            overall: categories.mean(),
            categories,
        }
    }
}

impl Default for AssessmentScores {
    fn default() -> Self {
        Self::from_categories(CategoryScores::default())
    }
}

/// Audit entry for one scored answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemScore {
    pub question_id: String,
    pub category: LifeCategory,
    pub rule: String,
    pub score: f64,
}

/// Running sum and count for one category.
#[derive(Debug, Default, Clone, Copy)]
struct CategoryTally {
    sum: f64,
    count: usize,
}

impl CategoryTally {
    fn average(self) -> f64 {
        if self.count == 0 {
            NEUTRAL_SCORE
        } else {
            self.sum / self.count as f64
        }
    }
}

pub(crate) struct ScoredAnswers {
    pub scores: AssessmentScores,
    pub components: Vec<ItemScore>,
    pub skipped: Vec<String>,
}

/// Score and aggregate answers into category and overall scores.
pub fn compute_scores(answers: &[Answer], rules: &RuleTable) -> AssessmentScores {
    tally_answers(answers, rules).scores
}

pub(crate) fn tally_answers(answers: &[Answer], rules: &RuleTable) -> ScoredAnswers {
    let mut tallies = [CategoryTally::default(); 4];
    let mut components = Vec::with_capacity(answers.len());
    let mut skipped = Vec::new();

    for answer in answers {
        let resolved = LifeCategory::from_question_id(&answer.question_id)
            .zip(rules.rule_for(&answer.question_id));

        let Some((category, rule)) = resolved else {
            debug!(question_id = %answer.question_id, "answer has no scoring rule; skipping");
            skipped.push(answer.question_id.clone());
            continue;
        };

        let score = score_rule(rule, &answer.value);
        let tally = &mut tallies[slot(category)];
        tally.sum += score;
        tally.count += 1;

        components.push(ItemScore {
            question_id: answer.question_id.clone(),
            category,
            rule: rule.kind().to_string(),
            score,
        });
    }

    let categories = CategoryScores {
        financial: tallies[slot(LifeCategory::Financial)].average(),
        health_fitness: tallies[slot(LifeCategory::HealthFitness)].average(),
        social: tallies[slot(LifeCategory::Social)].average(),
        romantic: tallies[slot(LifeCategory::Romantic)].average(),
    };

    ScoredAnswers {
        scores: AssessmentScores::from_categories(categories),
        components,
        skipped,
    }
}

const fn slot(category: LifeCategory) -> usize {
    match category {
        LifeCategory::Financial => 0,
        LifeCategory::HealthFitness => 1,
        LifeCategory::Social => 2,
        LifeCategory::Romantic => 3,
    }
}
