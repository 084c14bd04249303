use regrade::{
    grade::{MalformedReason, evaluate},
    quiz::{AnswerValue, CorrectAnswer, Question, QuestionKind},
};

fn letters() -> Question {
    Question::multiple_select("q1", ["A", "B", "C", "D"], vec![1, 3])
}

#[test]
fn multiple_select_requires_the_exact_set() {
    let question = letters();

    let exact = evaluate(&question, Some(&vec!["B", "D"].into())).expect("evaluate");
    let subset = evaluate(&question, Some(&vec!["B"].into())).expect("evaluate");
    let superset = evaluate(&question, Some(&vec!["B", "D", "A"].into())).expect("evaluate");

    assert!(exact.correct);
    assert!(!subset.correct);
    assert!(!superset.correct);
}

#[test]
fn multiple_select_ignores_selection_order_and_repeats() {
    let question = letters();

    assert!(
        evaluate(&question, Some(&vec!["D", "B"].into()))
            .expect("evaluate")
            .correct
    );
    assert!(
        evaluate(&question, Some(&vec!["D", "B", "D"].into()))
            .expect("evaluate")
            .correct
    );
}

#[test]
fn multiple_select_accepts_indices() {
    let question = letters();

    assert!(
        evaluate(&question, Some(&vec![3usize, 1].into()))
            .expect("evaluate")
            .correct
    );
    assert!(
        !evaluate(&question, Some(&vec![1usize, 9].into()))
            .expect("evaluate")
            .correct
    );
}

#[test]
fn lone_selection_is_a_one_element_set() {
    let question = Question::multiple_select("q1", ["3", "4", "5", "6"], vec![1]);

    assert!(evaluate(&question, Some(&"4".into())).expect("evaluate").correct);
    assert!(evaluate(&question, Some(&1usize.into())).expect("evaluate").correct);
    assert!(!evaluate(&question, Some(&"5".into())).expect("evaluate").correct);
}

#[test]
fn multiple_select_rejects_unknown_choice_text() {
    let question = letters();
    let verdict = evaluate(&question, Some(&vec!["B", "Z"].into())).expect("evaluate");
    assert!(!verdict.correct);
}

#[test]
fn multiple_select_reports_choice_texts_and_indices() {
    let verdict = evaluate(&letters(), None).expect("evaluate");

    assert_eq!(
        verdict.correct_answer,
        CorrectAnswer::Choices(vec!["B".to_string(), "D".to_string()])
    );
    assert_eq!(verdict.correct_indices, Some(vec![1, 3]));
}

#[test]
fn true_false_is_exact_and_case_sensitive() {
    let question = Question::true_false("q2", "true");

    assert!(evaluate(&question, Some(&"true".into())).expect("evaluate").correct);
    assert!(!evaluate(&question, Some(&"True".into())).expect("evaluate").correct);
    assert!(!evaluate(&question, Some(&" true".into())).expect("evaluate").correct);
    assert!(
        !evaluate(&question, Some(&vec!["true"].into()))
            .expect("evaluate")
            .correct
    );

    let verdict = evaluate(&question, None).expect("evaluate");
    assert_eq!(verdict.correct_answer, CorrectAnswer::Text("true".to_string()));
    assert_eq!(verdict.correct_indices, None);
}

#[test]
fn identification_is_exact() {
    let question = Question::identification("q3", "Manila");

    assert!(evaluate(&question, Some(&"Manila".into())).expect("evaluate").correct);
    assert!(!evaluate(&question, Some(&"manila".into())).expect("evaluate").correct);
    assert!(!evaluate(&question, Some(&"Manila ".into())).expect("evaluate").correct);
}

#[test]
fn missing_submission_is_incorrect_for_every_kind() {
    for question in [
        letters(),
        Question::true_false("q2", "false"),
        Question::identification("q3", "Manila"),
    ] {
        let verdict = evaluate(&question, None).expect("missing answers never fail");
        assert!(!verdict.correct, "{} should be incorrect", question.id);
    }
}

#[test]
fn empty_selection_is_incorrect() {
    let verdict = evaluate(&letters(), Some(&AnswerValue::Many(Vec::new()))).expect("evaluate");
    assert!(!verdict.correct);
}

#[test]
fn malformed_questions_are_reported() {
    let cases = [
        (
            Question::multiple_select("no-key", ["A", "B"], Vec::<usize>::new()),
            MalformedReason::MissingCorrectIndices,
        ),
        (
            Question::untyped("no-key-at-all", QuestionKind::MultipleSelect),
            MalformedReason::MissingCorrectIndices,
        ),
        (
            Question::multiple_select("out-of-range", ["A", "B"], vec![0, 2]),
            MalformedReason::IndexOutOfRange {
                index:   2,
                choices: 2,
            },
        ),
        (
            Question::untyped("tf", QuestionKind::TrueFalse),
            MalformedReason::MissingCorrectValue,
        ),
        (
            Question::untyped("id", QuestionKind::Identification),
            MalformedReason::MissingCorrectText,
        ),
        (
            Question::untyped("essay", QuestionKind::Unknown("essay".to_string())),
            MalformedReason::UnknownType {
                tag: "essay".to_string(),
            },
        ),
    ];

    for (question, reason) in cases {
        let err = evaluate(&question, Some(&"A".into())).expect_err("malformed");
        assert_eq!(err.question_id, question.id);
        assert_eq!(err.reason, reason);
    }
}

#[test]
fn unrecognised_values_are_incorrect_for_every_kind() {
    let odd = [
        AnswerValue::Other(serde_json::json!(true)),
        AnswerValue::Other(serde_json::json!(-1)),
        AnswerValue::Other(serde_json::json!({ "text": "Manila" })),
    ];

    for question in [
        letters(),
        Question::true_false("q2", "true"),
        Question::identification("q3", "Manila"),
    ] {
        for value in &odd {
            let verdict = evaluate(&question, Some(value)).expect("evaluate");
            assert!(!verdict.correct, "{} with {value:?}", question.id);
        }
    }
}
