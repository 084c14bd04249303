#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grade::score::percentage;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
/// One selected item of a submission: a choice position or a literal string.
pub enum Selection {
    /// A position in the question's choices.
    Index(usize),
    /// Text; a choice text for multiple-select, the whole answer otherwise.
    Text(String),
}

impl From<usize> for Selection {
    fn from(index: usize) -> Self {
        Selection::Index(index)
    }
}

impl From<&str> for Selection {
    fn from(text: &str) -> Self {
        Selection::Text(text.to_string())
    }
}

impl From<String> for Selection {
    fn from(text: String) -> Self {
        Selection::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// A raw submitted value: a single selection or a list of them.
pub enum AnswerValue {
    /// A scalar submission.
    One(Selection),
    /// A list submission, as sent for multiple-select questions.
    Many(Vec<Selection>),
    /// Anything else a client stored (booleans, negative numbers, objects).
    /// Kept verbatim and never correct.
    Other(serde_json::Value),
}

impl AnswerValue {
    /// Returns the submitted selections; a scalar is a one-element slice.
    /// `None` for a value that is not made of selections.
    pub fn selections(&self) -> Option<&[Selection]> {
        match self {
            AnswerValue::One(selection) => Some(std::slice::from_ref(selection)),
            AnswerValue::Many(selections) => Some(selections),
            AnswerValue::Other(_) => None,
        }
    }

    /// Returns the text of a scalar text submission.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::One(Selection::Text(text)) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(text: &str) -> Self {
        AnswerValue::One(text.into())
    }
}

impl From<String> for AnswerValue {
    fn from(text: String) -> Self {
        AnswerValue::One(text.into())
    }
}

impl From<usize> for AnswerValue {
    fn from(index: usize) -> Self {
        AnswerValue::One(index.into())
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(texts: Vec<&str>) -> Self {
        AnswerValue::Many(texts.into_iter().map(Selection::from).collect())
    }
}

impl From<Vec<usize>> for AnswerValue {
    fn from(indices: Vec<usize>) -> Self {
        AnswerValue::Many(indices.into_iter().map(Selection::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A raw answer to one question.
pub struct Answer {
    /// The question this answers.
    pub question_id: String,
    /// The submitted value, `None` when the client stored `null` or nothing.
    #[serde(default)]
    pub value:       Option<AnswerValue>,
}

impl Answer {
    /// Creates an answer for `question_id`.
    pub fn new(question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        Self {
            question_id: question_id.into(),
            value:       Some(value.into()),
        }
    }

    /// An answer entry that carries no value.
    pub fn blank(question_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            value:       None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// The correct answer as shown to students. The JSON shape is what result
/// screens read: an array of choice texts, or a plain string.
pub enum CorrectAnswer {
    /// Choice texts of a multiple-select question.
    Choices(Vec<String>),
    /// Expected value of a true/false or identification question.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// The derived verdict for one question of a response.
pub struct CheckedAnswer {
    /// The question this verdict is for. Empty on records graded before
    /// answers were keyed by question.
    #[serde(default)]
    pub question_id:     String,
    /// Whether the submission was correct.
    pub correct:         bool,
    /// The raw submission, `null` when nothing was submitted.
    #[serde(default)]
    pub student_answer:  Option<AnswerValue>,
    /// The correct answer resolved against the quiz at grading time.
    #[serde(default)]
    pub correct_answer:  Option<CorrectAnswer>,
    /// Canonical correct choice positions of a multiple-select question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_indices: Option<Vec<usize>>,
}

impl CheckedAnswer {
    /// Resolves the canonical correct indices against `choices`, for display
    /// against the current quiz instead of the text captured at grading time.
    /// Falls back to the stored text when no indices were recorded.
    pub fn resolve_correct_answer(&self, choices: &[String]) -> Option<CorrectAnswer> {
        match &self.correct_indices {
            Some(indices) => Some(CorrectAnswer::Choices(
                indices
                    .iter()
                    .filter_map(|&i| choices.get(i).cloned())
                    .collect(),
            )),
            None => self.correct_answer.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A student's submission together with its derived grading fields.
pub struct StudentResponse {
    /// Response identifier.
    pub id:              String,
    /// Quiz this response was submitted for.
    pub quiz_id:         String,
    /// Submitting student.
    pub student_id:      String,
    /// Raw answers as submitted. Never rewritten by grading.
    #[serde(default)]
    pub answers:         Vec<Answer>,
    /// Derived per-question verdicts, in quiz question order.
    #[serde(default)]
    pub checked_answers: Vec<CheckedAnswer>,
    /// Derived score.
    #[serde(default)]
    pub score:           Option<f64>,
    /// Derived maximum score.
    #[serde(default)]
    pub total:           Option<f64>,
    /// Submission time.
    pub submitted_at:    DateTime<Utc>,
}

impl StudentResponse {
    /// Creates an ungraded response holding only the raw answers.
    pub fn submitted(
        id: impl Into<String>,
        quiz_id: impl Into<String>,
        student_id: impl Into<String>,
        answers: Vec<Answer>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            quiz_id: quiz_id.into(),
            student_id: student_id.into(),
            answers,
            checked_answers: Vec::new(),
            score: None,
            total: None,
            submitted_at,
        }
    }

    /// Whether any derived grading state has been stored.
    pub fn is_graded(&self) -> bool {
        !self.checked_answers.is_empty() || self.score.is_some()
    }

    /// Rounded percentage of the stored score, if graded.
    pub fn percentage(&self) -> Option<u32> {
        Some(percentage(self.score?, self.total?))
    }
}
