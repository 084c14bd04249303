#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Pure grading: per-question evaluation, per-response checking and scoring.

/// Checks every question of a quiz against one response.
pub mod check;
/// Error types for grading.
pub mod error;
/// Per-question correctness.
pub mod evaluate;
/// Response-level score aggregation.
pub mod score;

pub use check::{CheckOutcome, check, check_answers};
pub use error::{GradingError, MalformedQuestion, MalformedReason};
pub use evaluate::{AnswerKey, Evaluation, evaluate};
pub use score::{Score, aggregate, percentage};

use crate::quiz::{CheckedAnswer, QuizDefinition, StudentResponse};

/// Freshly derived grading state for one response.
#[derive(Debug, Clone, PartialEq)]
pub struct Regraded {
    /// Verdicts in quiz order.
    pub checked:  Vec<CheckedAnswer>,
    /// Score derived from `checked`.
    pub score:    Score,
    /// Questions that were graded incorrect because they are malformed.
    pub warnings: Vec<MalformedQuestion>,
}

impl Regraded {
    /// Whether `response` already stores exactly this state.
    pub fn is_current(&self, response: &StudentResponse) -> bool {
        response.checked_answers == self.checked
            && response.score == Some(self.score.score)
            && response.total == Some(self.score.total)
    }

    /// Writes the derived fields onto `response`, leaving raw answers alone.
    pub fn apply_to(&self, response: &mut StudentResponse) {
        response.checked_answers = self.checked.clone();
        response.score = Some(self.score.score);
        response.total = Some(self.score.total);
    }
}

/// Recomputes all derived grading state of `response` from `quiz`.
///
/// The caller pins `quiz`: every question of the response is graded against
/// this one snapshot.
pub fn regrade(quiz: &QuizDefinition, response: &StudentResponse) -> Regraded {
    let CheckOutcome { checked, warnings } = check(quiz, response);
    let score = aggregate(&checked, quiz);
    Regraded {
        checked,
        score,
        warnings,
    }
}
