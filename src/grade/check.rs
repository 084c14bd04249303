#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::{HashMap, HashSet};

use super::{
    error::{MalformedQuestion, MalformedReason},
    evaluate::{Evaluation, evaluate},
};
use crate::quiz::{
    Answer, AnswerValue, CheckedAnswer, CorrectAnswer, Question, QuestionKind, QuizDefinition,
    StudentResponse,
};

/// Checked answers for one response, plus the questions that could not be
/// graded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckOutcome {
    /// One verdict per quiz question, in quiz order.
    pub checked:  Vec<CheckedAnswer>,
    /// Malformed questions, each also present in `checked` as incorrect.
    pub warnings: Vec<MalformedQuestion>,
}

/// Checks `response` against `quiz`. See [`check_answers`].
pub fn check(quiz: &QuizDefinition, response: &StudentResponse) -> CheckOutcome {
    check_answers(quiz, &response.answers)
}

/// Checks raw answers against every question of `quiz`.
///
/// Answers are matched to questions by `questionId`; when an id was answered
/// twice the first answer counts. Questions without an answer (or with a
/// `null` value) are incorrect and answers without a question are ignored, so
/// the output always has exactly one entry per question. When two questions
/// share an id, the later ones are graded as malformed.
pub fn check_answers(quiz: &QuizDefinition, answers: &[Answer]) -> CheckOutcome {
    let mut submitted: HashMap<&str, Option<&AnswerValue>> = HashMap::with_capacity(answers.len());
    for answer in answers {
        submitted
            .entry(answer.question_id.as_str())
            .or_insert(answer.value.as_ref());
    }

    let mut outcome = CheckOutcome {
        checked:  Vec::with_capacity(quiz.questions.len()),
        warnings: Vec::new(),
    };
    let mut seen = HashSet::with_capacity(quiz.questions.len());

    for question in &quiz.questions {
        if !seen.insert(question.id.as_str()) {
            outcome.warnings.push(MalformedQuestion::new(
                &question.id,
                MalformedReason::DuplicateQuestionId,
            ));
            outcome.checked.push(CheckedAnswer {
                question_id:     question.id.clone(),
                correct:         false,
                student_answer:  None,
                correct_answer:  fallback_correct_answer(question),
                correct_indices: None,
            });
            continue;
        }

        let student_answer = submitted.get(question.id.as_str()).copied().flatten();
        let Evaluation {
            correct,
            correct_answer,
            correct_indices,
        } = match evaluate(question, student_answer) {
            Ok(evaluation) => evaluation,
            Err(malformed) => {
                outcome.warnings.push(malformed);
                outcome.checked.push(CheckedAnswer {
                    question_id:     question.id.clone(),
                    correct:         false,
                    student_answer:  student_answer.cloned(),
                    correct_answer:  fallback_correct_answer(question),
                    correct_indices: None,
                });
                continue;
            }
        };

        outcome.checked.push(CheckedAnswer {
            question_id: question.id.clone(),
            correct,
            student_answer: student_answer.cloned(),
            correct_answer: Some(correct_answer),
            correct_indices,
        });
    }

    outcome
}

/// Best-effort correct answer of a question that cannot be graded: the texts
/// of whichever stored indices still resolve, or the raw expected value.
fn fallback_correct_answer(question: &Question) -> Option<CorrectAnswer> {
    match &question.kind {
        QuestionKind::MultipleSelect => Some(CorrectAnswer::Choices(
            question
                .correct_indices
                .iter()
                .flatten()
                .filter_map(|&i| question.choices.get(i).cloned())
                .collect(),
        )),
        QuestionKind::TrueFalse => question.correct_value.clone().map(CorrectAnswer::Text),
        QuestionKind::Identification => question.correct_text.clone().map(CorrectAnswer::Text),
        QuestionKind::Unknown(_) => None,
    }
}
