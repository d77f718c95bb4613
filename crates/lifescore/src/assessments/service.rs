use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{AssessmentId, AssessmentRecord, AssessmentSubmission};
use super::repository::{AssessmentRepository, RepositoryError};
use crate::scoring::{AssessmentEngine, AssessmentOutcome, CohortCatalog, CohortParameters};

/// Service composing the scoring engine, cohort catalog, and repository.
pub struct AssessmentService<R> {
    repository: Arc<R>,
    engine: Arc<AssessmentEngine>,
    cohorts: Arc<CohortCatalog>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        engine: Arc<AssessmentEngine>,
        cohorts: Arc<CohortCatalog>,
    ) -> Self {
        Self {
            repository,
            engine,
            cohorts,
        }
    }

    pub fn engine(&self) -> &AssessmentEngine {
        &self.engine
    }

    fn cohort_for(&self, submission: &AssessmentSubmission) -> &CohortParameters {
        let key = submission
            .respondent
            .as_ref()
            .map(|respondent| respondent.cohort_key());
        self.cohorts.resolve(key.as_ref())
    }

    /// Score a submission without persisting anything.
    pub fn preview(
        &self,
        submission: &AssessmentSubmission,
    ) -> Result<AssessmentOutcome, AssessmentServiceError> {
        if submission.answers.is_empty() {
            return Err(AssessmentServiceError::EmptySubmission);
        }
        let cohort = self.cohort_for(submission);
        Ok(self.engine.evaluate(&submission.answers, cohort))
    }

    /// Score a new submission and persist the resulting record.
    pub fn submit(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let outcome = self.preview(&submission)?;
        let record = AssessmentRecord {
            id: next_assessment_id(),
            submission,
            outcome,
            scored_at: Utc::now(),
            revision: 1,
        };

        let stored = self.repository.insert(record)?;
        info!(
            assessment_id = %stored.id.0,
            overall = stored.outcome.scores.overall,
            scored = stored.outcome.components.len(),
            skipped = stored.outcome.skipped.len(),
            "assessment scored"
        );
        Ok(stored)
    }

    /// Replay the stored answers through the current engine.
    ///
    /// The revision only advances when the outcome actually changes, so repeated rescoring
    /// against the same rules is a no-op.
    pub fn rescore(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let mut record = self.get(assessment_id)?;
        let cohort = self.cohort_for(&record.submission);
        let outcome = self.engine.evaluate(&record.submission.answers, cohort);

        if outcome == record.outcome {
            info!(assessment_id = %record.id.0, "rescore produced identical outcome");
            return Ok(record);
        }

        let previous = record.outcome.scores.overall;
        record.outcome = outcome;
        record.scored_at = Utc::now();
        record.revision += 1;
        self.repository.update(record.clone())?;

        info!(
            assessment_id = %record.id.0,
            previous_overall = previous,
            overall = record.outcome.scores.overall,
            revision = record.revision,
            "assessment rescored"
        );
        Ok(record)
    }

    /// Fetch a stored assessment.
    pub fn get(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(assessment_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("submission contains no answers")]
    EmptySubmission,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
