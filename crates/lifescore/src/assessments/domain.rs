use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{
    AgeBand, Answer, AssessmentOutcome, AssessmentScores, CohortKey, Percentiles,
};

/// Identifier wrapper for stored assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Demographics used only to pick the cohort a respondent is ranked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentProfile {
    pub age: u8,
    pub gender: String,
    pub region: String,
}

impl RespondentProfile {
    pub fn cohort_key(&self) -> CohortKey {
        CohortKey::new(AgeBand::from_age(self.age), &self.gender, &self.region)
    }
}

/// Completed questionnaire handed over for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    #[serde(default)]
    pub respondent: Option<RespondentProfile>,
    pub answers: Vec<Answer>,
}

/// Stored submission with its latest scoring outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub submission: AssessmentSubmission,
    pub outcome: AssessmentOutcome,
    pub scored_at: DateTime<Utc>,
    /// Incremented each time a rescore changes the outcome.
    pub revision: u32,
}

impl AssessmentRecord {
    pub fn view(&self) -> AssessmentView {
        AssessmentView {
            assessment_id: self.id.clone(),
            scores: self.outcome.scores,
            percentiles: self.outcome.percentiles,
            scored_questions: self.outcome.components.len(),
            skipped_questions: self.outcome.skipped.len(),
            scored_at: self.scored_at,
            revision: self.revision,
        }
    }
}

/// Public projection of an assessment returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentView {
    pub assessment_id: AssessmentId,
    #[serde(flatten)]
    pub scores: AssessmentScores,
    pub percentiles: Percentiles,
    pub scored_questions: usize,
    pub skipped_questions: usize,
    pub scored_at: DateTime<Utc>,
    pub revision: u32,
}
