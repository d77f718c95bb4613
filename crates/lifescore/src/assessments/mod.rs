//! Caller-side workflow around the scoring engine: intake, persistence, and replay.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentId, AssessmentRecord, AssessmentSubmission, AssessmentView, RespondentProfile,
};
pub use import::{AnswerImportError, AnswerImporter};
pub use repository::{AssessmentRepository, RepositoryError};
pub use router::assessment_router;
pub use service::{AssessmentService, AssessmentServiceError};
