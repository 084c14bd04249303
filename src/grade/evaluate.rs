#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::BTreeSet;

use super::error::{MalformedQuestion, MalformedReason};
use crate::quiz::{AnswerValue, CorrectAnswer, Question, QuestionKind, Selection};

/// The validated answer key of a question, borrowed from the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey<'a> {
    /// Exact set of correct choice positions.
    MultipleSelect {
        /// Current choice texts.
        choices: &'a [String],
        /// Correct positions; never empty, always within `choices`.
        correct: BTreeSet<usize>,
    },
    /// Expected true/false value.
    TrueFalse(&'a str),
    /// Expected identification text.
    Identification(&'a str),
}

impl<'a> TryFrom<&'a Question> for AnswerKey<'a> {
    type Error = MalformedQuestion;

    fn try_from(question: &'a Question) -> Result<Self, Self::Error> {
        let malformed = |reason: MalformedReason| MalformedQuestion::new(&question.id, reason);

        match &question.kind {
            QuestionKind::MultipleSelect => {
                let indices = question
                    .correct_indices
                    .as_deref()
                    .filter(|indices| !indices.is_empty())
                    .ok_or_else(|| malformed(MalformedReason::MissingCorrectIndices))?;

                let choices = question.choices.len();
                if let Some(&index) = indices.iter().find(|&&index| index >= choices) {
                    return Err(malformed(MalformedReason::IndexOutOfRange { index, choices }));
                }

                Ok(AnswerKey::MultipleSelect {
                    choices: &question.choices,
                    correct: indices.iter().copied().collect(),
                })
            }
            QuestionKind::TrueFalse => question
                .correct_value
                .as_deref()
                .map(AnswerKey::TrueFalse)
                .ok_or_else(|| malformed(MalformedReason::MissingCorrectValue)),
            QuestionKind::Identification => question
                .correct_text
                .as_deref()
                .map(AnswerKey::Identification)
                .ok_or_else(|| malformed(MalformedReason::MissingCorrectText)),
            QuestionKind::Unknown(tag) => {
                Err(malformed(MalformedReason::UnknownType { tag: tag.clone() }))
            }
        }
    }
}

/// The verdict for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether the submission was correct.
    pub correct:         bool,
    /// The correct answer as displayed.
    pub correct_answer:  CorrectAnswer,
    /// Canonical correct positions, for multiple-select only.
    pub correct_indices: Option<Vec<usize>>,
}

impl AnswerKey<'_> {
    /// Grades `submitted` against this key. A missing submission is simply
    /// incorrect.
    pub fn evaluate(&self, submitted: Option<&AnswerValue>) -> Evaluation {
        match self {
            AnswerKey::MultipleSelect { choices, correct } => {
                let selected = submitted.and_then(|value| selected_indices(choices, value));
                Evaluation {
                    correct:         selected.as_ref() == Some(correct),
                    correct_answer:  CorrectAnswer::Choices(
                        correct
                            .iter()
                            .filter_map(|&i| choices.get(i).cloned())
                            .collect(),
                    ),
                    correct_indices: Some(correct.iter().copied().collect()),
                }
            }
            AnswerKey::TrueFalse(expected) | AnswerKey::Identification(expected) => Evaluation {
                // Exact, case-sensitive match; no trimming.
                correct:         submitted.and_then(AnswerValue::as_text) == Some(*expected),
                correct_answer:  CorrectAnswer::Text(expected.to_string()),
                correct_indices: None,
            },
        }
    }
}

/// Resolves every selection to a choice position. Indices are taken as-is,
/// text is matched against the current choice texts. Returns `None` as soon as
/// one selection does not resolve, or when the value holds no selections at
/// all, which makes the answer incorrect.
fn selected_indices(choices: &[String], value: &AnswerValue) -> Option<BTreeSet<usize>> {
    value
        .selections()?
        .iter()
        .map(|selection| match selection {
            Selection::Index(index) => (*index < choices.len()).then_some(*index),
            Selection::Text(text) => choices.iter().position(|choice| choice == text),
        })
        .collect()
}

/// Grades one question against a submission.
///
/// Never fails because of the submission; fails only when the question itself
/// cannot be graded.
pub fn evaluate(
    question: &Question,
    submitted: Option<&AnswerValue>,
) -> Result<Evaluation, MalformedQuestion> {
    AnswerKey::try_from(question).map(|key| key.evaluate(submitted))
}
