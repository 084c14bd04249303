
use quiz_support::{full_marks_answers, mixed_quiz, response};
use regrade::{
    grade::{MalformedReason, check, check_answers},
    quiz::{Answer, AnswerValue, CorrectAnswer, Question, QuestionKind, QuizDefinition},
};

#[test]
fn recomputation_is_byte_identical() {
    let quiz = mixed_quiz("quiz-1", vec![1, 3]);
    let submission = response(
        "r1",
        "quiz-1",
        vec![
            Answer::new("q-capital", "Cebu"),
            Answer::new("q-letters", vec!["D", "B"]),
        ],
    );

    let first = serde_json::to_vec(&check(&quiz, &submission).checked).expect("serialize");
    let second = serde_json::to_vec(&check(&quiz, &submission).checked).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn answers_are_aligned_by_question_id_not_position() {
    let quiz = mixed_quiz("quiz-1", vec![1, 3]);
    let mut answers = full_marks_answers();
    answers.reverse();

    let outcome = check_answers(&quiz, &answers);

    let ids: Vec<_> = outcome
        .checked
        .iter()
        .map(|c| c.question_id.as_str())
        .collect();
    assert_eq!(ids, ["q-letters", "q-sky", "q-capital"]);
    assert!(outcome.checked.iter().all(|c| c.correct));
    assert!(outcome.warnings.is_empty());
}

#[test]
fn missing_answers_still_produce_every_verdict() {
    let quiz = mixed_quiz("quiz-1", vec![1, 3]);

    let outcome = check_answers(&quiz, &[Answer::new("q-sky", "true")]);

    assert_eq!(outcome.checked.len(), quiz.questions.len());
    assert!(!outcome.checked[0].correct);
    assert_eq!(outcome.checked[0].student_answer, None);
    assert!(outcome.checked[1].correct);
    assert!(!outcome.checked[2].correct);
}

#[test]
fn stray_and_duplicate_answers_are_handled() {
    let quiz = mixed_quiz("quiz-1", vec![1, 3]);
    let answers = vec![
        Answer::new("q-sky", "true"),
        Answer::new("q-sky", "false"),
        Answer::new("deleted-question", "whatever"),
    ];

    let outcome = check_answers(&quiz, &answers);

    assert_eq!(outcome.checked.len(), 3);
    assert!(outcome.checked[1].correct, "first answer for an id wins");
    assert!(
        outcome
            .checked
            .iter()
            .all(|c| c.question_id != "deleted-question")
    );
}

#[test]
fn checked_answers_record_submission_and_key() {
    let quiz = mixed_quiz("quiz-1", vec![1, 3]);
    let outcome = check_answers(&quiz, &[Answer::new("q-letters", vec!["B"])]);
    let letters = &outcome.checked[0];

    assert_eq!(letters.student_answer, Some(AnswerValue::from(vec!["B"])));
    assert_eq!(
        letters.correct_answer,
        Some(CorrectAnswer::Choices(vec!["B".into(), "D".into()]))
    );
    assert_eq!(letters.correct_indices, Some(vec![1, 3]));
}

#[test]
fn malformed_questions_are_graded_wrong_with_a_warning() {
    let quiz = QuizDefinition::builder()
        .id("quiz-2")
        .questions(vec![
            Question::multiple_select("broken", ["A", "B"], vec![0, 7]),
            Question::untyped("essay", QuestionKind::Unknown("essay".into())),
            Question::true_false("fine", "false"),
        ])
        .build();
    let answers = vec![
        Answer::new("broken", vec!["A"]),
        Answer::new("essay", "long text"),
        Answer::new("fine", "false"),
    ];

    let outcome = check_answers(&quiz, &answers);

    assert_eq!(outcome.checked.len(), 3);
    assert!(!outcome.checked[0].correct);
    assert_eq!(
        outcome.checked[0].correct_answer,
        Some(CorrectAnswer::Choices(vec!["A".into()]))
    );
    assert!(!outcome.checked[1].correct);
    assert_eq!(outcome.checked[1].correct_answer, None);
    assert!(outcome.checked[2].correct);

    let reasons: Vec<_> = outcome.warnings.iter().map(|w| w.reason.clone()).collect();
    assert_eq!(
        reasons,
        vec![
            MalformedReason::IndexOutOfRange {
                index:   7,
                choices: 2,
            },
            MalformedReason::UnknownType {
                tag: "essay".into(),
            },
        ]
    );
}

#[test]
fn empty_quiz_checks_to_nothing() {
    let quiz = QuizDefinition::builder().id("empty").build();
    let outcome = check_answers(&quiz, &[Answer::new("q", "x")]);
    assert!(outcome.checked.is_empty());
}

#[test]
fn repeated_question_ids_only_grade_the_first() {
    let quiz = QuizDefinition::builder()
        .id("quiz-dup")
        .questions(vec![
            Question::identification("dup", "x").with_points(5.0),
            Question::identification("dup", "x").with_points(5.0),
        ])
        .build();

    let outcome = check_answers(&quiz, &[Answer::new("dup", "x")]);

    let flags: Vec<_> = outcome.checked.iter().map(|c| c.correct).collect();
    assert_eq!(flags, [true, false]);
    assert_eq!(outcome.checked[1].student_answer, None);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(
        outcome.warnings[0].reason,
        MalformedReason::DuplicateQuestionId
    );
}

#[test]
fn blank_and_unrecognised_values_are_incorrect() {
    let quiz = mixed_quiz("quiz-1", vec![1, 3]);
    let answers = vec![
        Answer::blank("q-letters"),
        Answer::new("q-sky", AnswerValue::Other(serde_json::json!(true))),
        Answer::new("q-capital", AnswerValue::Other(serde_json::json!(-1))),
    ];

    let outcome = check_answers(&quiz, &answers);

    assert!(outcome.checked.iter().all(|c| !c.correct));
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.checked[0].student_answer, None);
    assert_eq!(
        outcome.checked[1].student_answer,
        Some(AnswerValue::Other(serde_json::json!(true)))
    );
}
