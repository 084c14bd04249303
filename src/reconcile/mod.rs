#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Recomputes derived grading state for stored responses and writes back only
//! what changed.

/// Cooperative cancellation.
pub mod cancel;
/// Backfill reports.
pub mod report;

use std::{
    future,
    sync::atomic::{AtomicBool, Ordering},
};

use bon::Builder;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

pub use self::{
    cancel::CancellationFlag,
    report::{
        FailureReason, ReconcileFailure, ReconcileWarning, ReconciliationReport, RecordOutcome,
        Status, UNKNOWN_RESPONSE,
    },
};
use crate::{
    grade::regrade,
    quiz::StudentResponse,
    store::{QuizRepository, RepositoryError, ResponseFilter, ResponseRepository},
};

/// In-flight recomputations when none is configured.
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// What to do with a response whose quiz has questions that cannot be graded.
pub enum MalformedPolicy {
    /// Grade those questions incorrect, keep going and report warnings.
    #[default]
    Lenient,
    /// Leave the response untouched and report it as an error.
    Strict,
}

impl MalformedPolicy {
    /// Parses `lenient`/`strict`, case-insensitively; anything else is
    /// `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

#[derive(Builder)]
/// A batch backfill over stored responses.
///
/// Each response is loaded with its quiz, regraded, compared to what is
/// stored and saved only when different. Re-running a finished or interrupted
/// job is safe: records that are already current are skipped.
pub struct ReconciliationJob<Q, R> {
    /// Where quizzes are read from.
    pub(crate) quizzes:     Q,
    /// Where responses are read from and written to.
    pub(crate) responses:   R,
    /// Maximum number of responses in flight.
    #[builder(default = DEFAULT_CONCURRENCY)]
    pub(crate) concurrency: usize,
    /// Handling of malformed questions.
    #[builder(default)]
    pub(crate) malformed:   MalformedPolicy,
    /// Compute and report, but never save.
    #[builder(default)]
    pub(crate) dry_run:     bool,
    /// Stop signal checked before each record starts.
    #[builder(default)]
    pub(crate) cancel:      CancellationFlag,
}

impl<Q, R> ReconciliationJob<Q, R>
where
    Q: QuizRepository,
    R: ResponseRepository,
{
    /// Returns a handle that stops this job when cancelled.
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Reconciles every response selected by `filter`.
    ///
    /// Never fails: per-response problems are collected in the report. When
    /// cancelled, the records already started are finished and the partial
    /// totals are returned.
    pub async fn run(&self, filter: &ResponseFilter) -> ReconciliationReport {
        let concurrency = self.concurrency.max(1);
        let stopped_early = AtomicBool::new(false);
        tracing::info!(
            concurrency,
            dry_run = self.dry_run,
            filter = ?filter,
            "starting backfill"
        );

        let mut report = self
            .responses
            .find(filter)
            .take_while(|_| {
                let proceed = !self.cancel.is_cancelled();
                if !proceed {
                    stopped_early.store(true, Ordering::Relaxed);
                }
                future::ready(proceed)
            })
            .map(|loaded| self.reconcile_loaded(loaded))
            .buffer_unordered(concurrency)
            .fold(ReconciliationReport::new(self.dry_run), |mut report, outcome| {
                report.record(outcome);
                future::ready(report)
            })
            .await;

        report.cancelled = stopped_early.load(Ordering::Relaxed);
        tracing::info!(
            migrated = report.migrated,
            skipped = report.skipped,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            cancelled = report.cancelled,
            "backfill finished"
        );
        report
    }

    /// Handles one item of the response listing.
    async fn reconcile_loaded(
        &self,
        loaded: Result<StudentResponse, RepositoryError>,
    ) -> RecordOutcome {
        match loaded {
            Ok(response) => self.reconcile_record(response).await,
            Err(RepositoryError::NotFound(response_id)) => {
                tracing::debug!(%response_id, "response vanished before it was read, skipping");
                RecordOutcome::new(response_id, Status::Skipped)
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not read a response");
                RecordOutcome::new(
                    UNKNOWN_RESPONSE,
                    Status::Failed(FailureReason::Load {
                        message: err.to_string(),
                    }),
                )
            }
        }
    }

    /// Load, recompute, compare, persist.
    async fn reconcile_record(&self, mut response: StudentResponse) -> RecordOutcome {
        let response_id = response.id.clone();

        let quiz = match self.quizzes.get_by_id(&response.quiz_id).await {
            Ok(Some(quiz)) => quiz,
            Ok(None) => {
                tracing::warn!(%response_id, quiz_id = %response.quiz_id, "quiz not found");
                return RecordOutcome::new(
                    response_id,
                    Status::Failed(FailureReason::QuizNotFound {
                        quiz_id: response.quiz_id,
                    }),
                );
            }
            Err(err) => {
                tracing::warn!(%response_id, quiz_id = %response.quiz_id, error = %err, "could not load quiz");
                return RecordOutcome::new(
                    response_id,
                    Status::Failed(FailureReason::Load {
                        message: err.to_string(),
                    }),
                );
            }
        };

        let regraded = regrade(&quiz, &response);
        for malformed in &regraded.warnings {
            tracing::warn!(%response_id, quiz_id = %quiz.id, "{malformed}");
        }

        if !regraded.warnings.is_empty() && self.malformed == MalformedPolicy::Strict {
            return RecordOutcome::new(
                response_id,
                Status::Failed(FailureReason::MalformedQuestion {
                    questions: regraded.warnings,
                }),
            );
        }

        let status = if regraded.is_current(&response) {
            tracing::debug!(%response_id, "already current");
            Status::Skipped
        } else if self.dry_run {
            tracing::debug!(%response_id, score = %regraded.score, "would regrade");
            Status::Migrated
        } else {
            regraded.apply_to(&mut response);
            match self.responses.save(&response).await {
                Ok(()) => {
                    tracing::debug!(%response_id, score = %regraded.score, "regraded");
                    Status::Migrated
                }
                Err(err) => {
                    tracing::warn!(%response_id, error = %err, "could not save regraded response");
                    Status::Failed(FailureReason::Persistence {
                        message: err.to_string(),
                    })
                }
            }
        };

        RecordOutcome {
            response_id,
            status,
            warnings: regraded.warnings,
        }
    }
}
