//! Questionnaire scoring and cohort percentile normalization.
//!
//! The [`scoring`] module holds the pure engine; [`assessments`] wraps it with intake,
//! persistence, and replay for the HTTP service.

pub mod assessments;
pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
