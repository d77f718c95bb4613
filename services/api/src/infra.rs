use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use lifescore::assessments::{
    AssessmentId, AssessmentRecord, AssessmentRepository, RepositoryError,
};
use lifescore::config::ScoringConfig;
use lifescore::error::AppError;
use lifescore::scoring::{CohortCatalog, RuleTable};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.scored_at.cmp(&b.scored_at));
        records.truncate(limit);
        Ok(records)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("repository mutex poisoned".to_string())
}

/// Rule table from the configured asset, or the built-in questionnaire.
pub(crate) fn load_rule_table(config: &ScoringConfig) -> Result<RuleTable, AppError> {
    match &config.rules_path {
        Some(path) => {
            let table = RuleTable::from_path(path)?;
            info!(path = %path.display(), questions = table.question_count(), "loaded rule table");
            Ok(table)
        }
        None => Ok(RuleTable::standard()),
    }
}

/// Cohort statistics from the configured asset, or the static placeholders.
pub(crate) fn load_cohort_catalog(config: &ScoringConfig) -> Result<CohortCatalog, AppError> {
    match &config.cohorts_path {
        Some(path) => {
            let catalog = CohortCatalog::from_path(path)?;
            info!(path = %path.display(), cohorts = catalog.len(), "loaded cohort statistics");
            Ok(catalog)
        }
        None => Ok(CohortCatalog::default()),
    }
}
