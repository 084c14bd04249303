#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::HashMap, fmt::Display};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::quiz::{CheckedAnswer, QuizDefinition, ScoringPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// A response-level score.
pub struct Score {
    /// Points earned.
    pub score:      f64,
    /// Points available.
    pub total:      f64,
    /// `score / total` as a rounded percentage.
    pub percentage: u32,
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}/{:.2} ({}%)", self.score, self.total, self.percentage)
    }
}

/// Rounded percentage of `score` over `total`. A quiz with nothing to earn is
/// complete, so a zero total yields 100.
pub fn percentage(score: f64, total: f64) -> u32 {
    if total == 0.0 {
        return 100;
    }
    (score / total * 100.0).round() as u32
}

/// Reduces checked answers to a score under the quiz's scoring policy.
///
/// Verdicts are matched to questions by `questionId`, so `checked` does not
/// have to be in quiz order. Each verdict is used once: when ids repeat, the
/// n-th question with an id takes the n-th verdict with that id.
pub fn aggregate(checked: &[CheckedAnswer], quiz: &QuizDefinition) -> Score {
    let mut verdicts: HashMap<&str, std::vec::IntoIter<bool>> = checked
        .iter()
        .map(|c| (c.question_id.as_str(), c.correct))
        .into_group_map()
        .into_iter()
        .map(|(id, flags)| (id, flags.into_iter()))
        .collect();
    let correct: Vec<bool> = quiz
        .questions
        .iter()
        .map(|q| {
            verdicts
                .get_mut(q.id.as_str())
                .and_then(Iterator::next)
                .unwrap_or(false)
        })
        .collect();

    let (score, total) = match quiz.scoring {
        ScoringPolicy::PerQuestion => quiz.questions.iter().zip(&correct).fold(
            (0.0, 0.0),
            |(score, total), (question, &right)| {
                let points = question.points_or_default();
                if right {
                    (score + points, total + points)
                } else {
                    (score, total + points)
                }
            },
        ),
        ScoringPolicy::CountBased if quiz.questions.is_empty() => (0.0, 0.0),
        ScoringPolicy::CountBased => {
            let count = quiz.questions.len() as f64;
            let total = quiz.total_points.unwrap_or(count);
            let right = correct.iter().filter(|&&right| right).count() as f64;
            (right * total / count, total)
        }
    };

    Score {
        score,
        total,
        percentage: percentage(score, total),
    }
}
