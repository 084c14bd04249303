#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};

use crate::grade::MalformedQuestion;

/// Placeholder id for failures that happened before a response could be read.
pub const UNKNOWN_RESPONSE: &str = "<unknown>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
/// Why one response could not be reconciled.
pub enum FailureReason {
    /// The response references a quiz that does not exist.
    QuizNotFound {
        /// The missing quiz.
        quiz_id: String,
    },
    /// The quiz has questions that cannot be graded, under strict grading.
    MalformedQuestion {
        /// The offending questions.
        questions: Vec<MalformedQuestion>,
    },
    /// Reading the response or its quiz failed.
    Load {
        /// Error message from the repository.
        message: String,
    },
    /// Writing the regraded response failed.
    Persistence {
        /// Error message from the repository.
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A per-response failure entry.
pub struct ReconcileFailure {
    /// The response that failed.
    pub response_id: String,
    /// What went wrong.
    pub reason:      FailureReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A question graded incorrect because it is malformed.
pub struct ReconcileWarning {
    /// The response being graded.
    pub response_id: String,
    /// The question and what is wrong with it.
    pub question:    MalformedQuestion,
}

/// What happened to one response.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// New grading state was written (or would have been, in a dry run).
    Migrated,
    /// The stored state was already current.
    Skipped,
    /// The response could not be reconciled.
    Failed(FailureReason),
}

/// Result of reconciling one response.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    /// The response.
    pub response_id: String,
    /// What happened to it.
    pub status:      Status,
    /// Malformed questions met while grading it.
    pub warnings:    Vec<MalformedQuestion>,
}

impl RecordOutcome {
    /// An outcome without warnings.
    pub fn new(response_id: impl Into<String>, status: Status) -> Self {
        Self {
            response_id: response_id.into(),
            status,
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Totals of a backfill run. Partial when `cancelled` is set.
pub struct ReconciliationReport {
    /// Responses whose derived state was rewritten.
    pub migrated:  usize,
    /// Responses that were already current or vanished mid-run.
    pub skipped:   usize,
    /// Responses that could not be reconciled.
    pub errors:    Vec<ReconcileFailure>,
    /// Malformed questions graded incorrect along the way.
    pub warnings:  Vec<ReconcileWarning>,
    /// Whether the run stopped early on request.
    pub cancelled: bool,
    /// Whether writes were suppressed.
    pub dry_run:   bool,
}

impl ReconciliationReport {
    /// An empty report.
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Number of responses visited.
    pub fn processed(&self) -> usize {
        self.migrated + self.skipped + self.errors.len()
    }

    /// Folds one record outcome into the totals.
    pub fn record(&mut self, outcome: RecordOutcome) {
        let RecordOutcome {
            response_id,
            status,
            warnings,
        } = outcome;

        self.warnings
            .extend(warnings.into_iter().map(|question| ReconcileWarning {
                response_id: response_id.clone(),
                question,
            }));

        match status {
            Status::Migrated => self.migrated += 1,
            Status::Skipped => self.skipped += 1,
            Status::Failed(reason) => self.errors.push(ReconcileFailure {
                response_id,
                reason,
            }),
        }
    }
}
