#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Quiz definitions and their questions.
pub mod definition;
/// Student responses: raw answers and derived grading fields.
pub mod response;

pub use definition::{
    DEFAULT_POINTS, Question, QuestionKind, QuizDefinition, QuizIssue, ScoringPolicy,
};
pub use response::{
    Answer, AnswerValue, CheckedAnswer, CorrectAnswer, Selection, StudentResponse,
};
