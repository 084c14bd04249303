#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Entry points offered to the HTTP and CLI layers.

use crate::{
    grade::{GradingError, regrade},
    quiz::CheckedAnswer,
    reconcile::{MalformedPolicy, ReconciliationJob, ReconciliationReport},
    store::{QuizRepository, ResponseFilter, ResponseRepository},
};

/// Grades single responses on demand and runs backfills over many, sharing one
/// pair of repositories.
pub struct Grader<Q, R> {
    /// The backfill this grader drives.
    job: ReconciliationJob<Q, R>,
}

impl<Q, R> Grader<Q, R>
where
    Q: QuizRepository,
    R: ResponseRepository,
{
    /// Wraps a configured job.
    pub fn new(job: ReconciliationJob<Q, R>) -> Self {
        Self { job }
    }

    /// The underlying backfill job.
    pub fn job(&self) -> &ReconciliationJob<Q, R> {
        &self.job
    }

    /// Regrades one response of `quiz_id` and returns its checked answers.
    ///
    /// Used by the submission flow, which cannot skip a bad record, so a
    /// missing quiz or response is an error. The response is saved only if its
    /// derived state changed. Malformed questions are graded incorrect unless
    /// the job is strict, in which case the first one is returned as an error.
    pub async fn recompute_one(
        &self,
        quiz_id: &str,
        response_id: &str,
    ) -> Result<Vec<CheckedAnswer>, GradingError> {
        let mut response = self
            .job
            .responses
            .get_by_id(response_id)
            .await
            .map_err(|source| GradingError::Load {
                id: response_id.to_string(),
                source,
            })?
            .ok_or_else(|| GradingError::ResponseNotFound(response_id.to_string()))?;

        if response.quiz_id != quiz_id {
            return Err(GradingError::QuizMismatch {
                response_id: response_id.to_string(),
                expected:    quiz_id.to_string(),
                actual:      response.quiz_id,
            });
        }

        let quiz = self
            .job
            .quizzes
            .get_by_id(quiz_id)
            .await
            .map_err(|source| GradingError::Load {
                id: quiz_id.to_string(),
                source,
            })?
            .ok_or_else(|| GradingError::QuizNotFound(quiz_id.to_string()))?;

        let regraded = regrade(&quiz, &response);
        for malformed in &regraded.warnings {
            tracing::warn!(%response_id, %quiz_id, "{malformed}");
        }
        if self.job.malformed == MalformedPolicy::Strict
            && let Some(first) = regraded.warnings.first()
        {
            return Err(first.clone().into());
        }

        if regraded.is_current(&response) {
            tracing::debug!(%response_id, "already current");
        } else if !self.job.dry_run {
            regraded.apply_to(&mut response);
            self.job
                .responses
                .save(&response)
                .await
                .map_err(|source| GradingError::Persistence {
                    response_id: response_id.to_string(),
                    source,
                })?;
            tracing::info!(%response_id, %quiz_id, score = %regraded.score, "response regraded");
        }

        Ok(regraded.checked)
    }

    /// Runs the backfill over every response selected by `filter`. Never
    /// fails; see [`ReconciliationJob::run`].
    pub async fn run_backfill(&self, filter: &ResponseFilter) -> ReconciliationReport {
        self.job.run(filter).await
    }
}
