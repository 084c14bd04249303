//! # regrade
//!
//! Quiz answer evaluation, scoring, and an idempotent backfill that brings
//! stored quiz responses up to date after questions or grading rules change.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Environment-driven configuration.
pub mod config;
/// Per-question evaluation, per-response checking and scoring.
pub mod grade;
/// Quiz and response records.
pub mod quiz;
/// Batch reconciliation of stored responses.
pub mod reconcile;
/// Entry points for the submission flow and operator backfills.
pub mod service;
/// Repository interfaces and adapters.
pub mod store;

pub use grade::{GradingError, MalformedQuestion, Regraded, Score, regrade};
pub use quiz::{Answer, CheckedAnswer, QuizDefinition, StudentResponse};
pub use reconcile::{MalformedPolicy, ReconciliationJob, ReconciliationReport};
pub use service::Grader;
pub use store::{JsonStore, MemoryStore, ResponseFilter};
