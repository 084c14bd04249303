#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};

use crate::store::RepositoryError;

/// Why a stored question cannot be graded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MalformedReason {
    /// The `type` tag is not one we grade.
    #[error("unknown question type `{tag}`")]
    UnknownType {
        /// The tag as stored.
        tag: String,
    },
    /// A multiple-select question without any correct index.
    #[error("multiple-select question has no correct indices")]
    MissingCorrectIndices,
    /// A correct index that points past the end of the choices.
    #[error("correct index {index} is outside the {choices} available choices")]
    IndexOutOfRange {
        /// The offending index.
        index:   usize,
        /// Number of choices on the question.
        choices: usize,
    },
    /// A true/false question without an expected value.
    #[error("true/false question has no correct value")]
    MissingCorrectValue,
    /// An identification question without an expected text.
    #[error("identification question has no correct text")]
    MissingCorrectText,
    /// A later question reusing the id of an earlier one. Answers only ever
    /// reach the first question with an id.
    #[error("question id is already used by an earlier question")]
    DuplicateQuestionId,
}

/// A question lacks what its type needs to be graded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("question `{question_id}` is malformed: {reason}")]
pub struct MalformedQuestion {
    /// The question that could not be graded.
    pub question_id: String,
    /// What is wrong with it.
    pub reason:      MalformedReason,
}

impl MalformedQuestion {
    /// Creates an error for `question_id`.
    pub fn new(question_id: impl Into<String>, reason: MalformedReason) -> Self {
        Self {
            question_id: question_id.into(),
            reason,
        }
    }
}

/// Errors surfaced by the live grading path.
#[derive(thiserror::Error, Debug)]
pub enum GradingError {
    /// The referenced quiz does not exist.
    #[error("quiz `{0}` was not found")]
    QuizNotFound(String),
    /// The requested response does not exist.
    #[error("response `{0}` was not found")]
    ResponseNotFound(String),
    /// The response exists but was submitted for another quiz.
    #[error("response `{response_id}` belongs to quiz `{actual}`, not `{expected}`")]
    QuizMismatch {
        /// The response that was requested.
        response_id: String,
        /// The quiz the caller asked for.
        expected:    String,
        /// The quiz the response references.
        actual:      String,
    },
    /// A question could not be graded and the caller asked for strict grading.
    #[error(transparent)]
    MalformedQuestion(#[from] MalformedQuestion),
    /// Reading a quiz or response failed.
    #[error("could not load `{id}`: {source}")]
    Load {
        /// The quiz or response being loaded.
        id:     String,
        /// The underlying repository error.
        #[source]
        source: RepositoryError,
    },
    /// Writing the regraded response failed.
    #[error("could not persist response `{response_id}`: {source}")]
    Persistence {
        /// The response being written.
        response_id: String,
        /// The underlying repository error.
        #[source]
        source:      RepositoryError,
    },
}
