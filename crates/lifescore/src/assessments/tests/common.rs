use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessments::domain::{
    AssessmentId, AssessmentRecord, AssessmentSubmission, RespondentProfile,
};
use crate::assessments::repository::{AssessmentRepository, RepositoryError};
use crate::assessments::{assessment_router, AssessmentService};
use crate::scoring::{
    AgeBand, Answer, AssessmentEngine, CohortCatalog, CohortDistribution, CohortKey,
    CohortParameters, RuleBounds, RuleTable, ScoringRule,
};

pub(super) fn rule_table() -> RuleTable {
    let mut table = RuleTable::default();
    table.insert(
        "fin_savings",
        ScoringRule::Percentage {
            bounds: RuleBounds::new(0.0, 20_000.0),
        },
    );
    table.insert(
        "health_energy",
        ScoringRule::LinearMap {
            values: vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0],
        },
    );
    table
}

pub(super) fn cohort_catalog() -> CohortCatalog {
    let mut catalog = CohortCatalog::new(CohortParameters::placeholder());
    let strict = CohortDistribution::new(70.0, 10.0).expect("valid cohort");
    catalog.insert(
        CohortKey::new(AgeBand::From25To34, "female", "us"),
        CohortParameters::uniform(strict),
    );
    catalog
}

pub(super) fn submission() -> AssessmentSubmission {
    AssessmentSubmission {
        respondent: Some(RespondentProfile {
            age: 29,
            gender: "Female".to_string(),
            region: "US".to_string(),
        }),
        answers: vec![
            Answer::new("fin_savings", 10_000),
            Answer::new("health_energy", "9"),
            Answer::new("xyz_mood", 4),
        ],
    }
}

pub(super) fn anonymous_submission() -> AssessmentSubmission {
    AssessmentSubmission {
        respondent: None,
        answers: vec![Answer::new("fin_savings", 10_000)],
    }
}

pub(super) fn empty_submission() -> AssessmentSubmission {
    AssessmentSubmission {
        respondent: None,
        answers: Vec::new(),
    }
}

pub(super) fn service_with(
    repository: Arc<MemoryRepository>,
    rules: RuleTable,
) -> AssessmentService<MemoryRepository> {
    AssessmentService::new(
        repository,
        Arc::new(AssessmentEngine::new(rules)),
        Arc::new(cohort_catalog()),
    )
}

pub(super) fn build_service() -> (AssessmentService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = service_with(repository.clone(), rule_table());
    (service, repository)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<AssessmentId, AssessmentRecord>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().take(limit).cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: AssessmentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: AssessmentService<MemoryRepository>) -> axum::Router {
    assessment_router(Arc::new(service))
}
