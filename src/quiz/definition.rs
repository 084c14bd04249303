#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use bon::Builder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::grade::{AnswerKey, MalformedQuestion};

/// Points a question is worth when its record carries none.
pub const DEFAULT_POINTS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// The `type` tag of a stored question.
pub enum QuestionKind {
    /// One or more choices are correct; graded by exact set equality.
    #[serde(alias = "multiple")]
    MultipleSelect,
    /// Graded against a `"true"`/`"false"` string.
    #[serde(alias = "truefalse")]
    TrueFalse,
    /// Free-text short answer.
    Identification,
    /// Any tag we do not know how to grade, kept verbatim.
    #[serde(untagged)]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A question as faculty authored it. Fields that only apply to some kinds are
/// optional here and validated when the question is evaluated.
pub struct Question {
    /// Identifier, unique within the owning quiz.
    pub id:              String,
    /// The question kind.
    #[serde(rename = "type")]
    pub kind:            QuestionKind,
    /// Points awarded for a correct answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points:          Option<f64>,
    /// Choice texts of a multiple-select question.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices:         Vec<String>,
    /// Positions in `choices` that make up the correct selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_indices: Option<Vec<usize>>,
    /// Expected value of a true/false question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_value:   Option<String>,
    /// Expected text of an identification question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_text:    Option<String>,
}

impl Question {
    /// Returns a question of `kind` with every optional field unset.
    fn bare(id: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            points: None,
            choices: Vec::new(),
            correct_indices: None,
            correct_value: None,
            correct_text: None,
        }
    }

    /// Creates a multiple-select question.
    pub fn multiple_select<I, S>(
        id: impl Into<String>,
        choices: I,
        correct_indices: Vec<usize>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            correct_indices: Some(correct_indices),
            ..Self::bare(id, QuestionKind::MultipleSelect)
        }
    }

    /// Creates a true/false question expecting `correct_value`.
    pub fn true_false(id: impl Into<String>, correct_value: impl Into<String>) -> Self {
        Self {
            correct_value: Some(correct_value.into()),
            ..Self::bare(id, QuestionKind::TrueFalse)
        }
    }

    /// Creates an identification question expecting `correct_text`.
    pub fn identification(id: impl Into<String>, correct_text: impl Into<String>) -> Self {
        Self {
            correct_text: Some(correct_text.into()),
            ..Self::bare(id, QuestionKind::Identification)
        }
    }

    /// Creates a question of `kind` without any answer key, mostly useful to
    /// model records that were stored incomplete.
    pub fn untyped(id: impl Into<String>, kind: QuestionKind) -> Self {
        Self::bare(id, kind)
    }

    /// Sets the points awarded for this question.
    pub fn with_points(mut self, points: f64) -> Self {
        self.points = Some(points);
        self
    }

    /// Points this question is worth, defaulting to [`DEFAULT_POINTS`].
    pub fn points_or_default(&self) -> f64 {
        self.points.unwrap_or(DEFAULT_POINTS)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// How a quiz turns correct answers into a score.
pub enum ScoringPolicy {
    /// Each question contributes its own points, [`DEFAULT_POINTS`] when it
    /// has none. The quiz-level `totalPoints` is ignored under this policy.
    #[default]
    PerQuestion,
    /// Every question weighs the same; the score is scaled to the quiz-level
    /// `totalPoints`, or to the number of questions when that is unset.
    CountBased,
}

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
/// A quiz as used for grading. Question order is authoritative.
pub struct QuizDefinition {
    /// Quiz identifier.
    pub id:           String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title:        Option<String>,
    /// The questions, in presentation order.
    #[builder(default)]
    pub questions:    Vec<Question>,
    /// Quiz-level point total, used only by [`ScoringPolicy::CountBased`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_points: Option<f64>,
    /// Scoring policy.
    #[serde(default)]
    #[builder(default)]
    pub scoring:      ScoringPolicy,
}

/// A structural problem found by [`QuizDefinition::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuizIssue {
    /// Two questions share an id; answers can only ever reach the first.
    #[error("question id `{0}` is used more than once")]
    DuplicateQuestionId(String),
    /// A question cannot be graded as stored.
    #[error(transparent)]
    Malformed(#[from] MalformedQuestion),
}

impl QuizDefinition {
    /// Looks up a question by id.
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Lists every issue that would make grading this quiz lossy. Grading
    /// still proceeds on an invalid quiz; this is for authoring tools and
    /// operators.
    pub fn validate(&self) -> Vec<QuizIssue> {
        let duplicates = self
            .questions
            .iter()
            .map(|q| q.id.as_str())
            .duplicates()
            .map(|id| QuizIssue::DuplicateQuestionId(id.to_string()));
        let malformed = self
            .questions
            .iter()
            .filter_map(|q| AnswerKey::try_from(q).err())
            .map(QuizIssue::from);

        duplicates.chain(malformed).collect()
    }
}
