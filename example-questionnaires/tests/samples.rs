//! Tests running the sample questionnaires through sessions

use assert_matches::assert_matches;
use example_questionnaires::{
    BIRD_RATINGS, BIRD_WATCHING, ONBOARDING, WORD_ORDER, bird_ratings, bird_watching, onboarding,
    word_order,
};
use questionnaire::{
    AnswerValue, Choice, ErrorKind, MatrixCell, MemoryStore, OptionId, QuestionId,
    QuestionnaireId, QuestionnaireSession, RespondentId, SessionConfig, SessionStart,
    SubmissionError,
};

fn session(store: &MemoryStore, id: QuestionnaireId) -> QuestionnaireSession {
    let start =
        QuestionnaireSession::start(store, id, RespondentId::new(1), SessionConfig::default())
            .unwrap();
    assert_matches!(start, SessionStart::Answerable(session) => session)
}

#[test]
fn test_bird_watching_fixture_loads() {
    let questionnaire = bird_watching().unwrap();

    assert_eq!(questionnaire.id(), BIRD_WATCHING);
    assert_eq!(questionnaire.step_count(), 2);
    assert_eq!(questionnaire.answerable().count(), 5);
    assert_eq!(questionnaire.display_number(QuestionId::new(5)), Some(4));
    assert!(questionnaire.tos().is_some());
}

#[test]
fn test_bird_watching_follow_up() {
    let store = MemoryStore::new().with_questionnaire(bird_watching().unwrap());
    let mut session = session(&store, BIRD_WATCHING);

    session.set_value(1, AnswerValue::options([11u64])).unwrap();
    let visible: Vec<_> = session.visible_questions().iter().map(|q| q.id().get()).collect();
    assert_eq!(visible, vec![1, 3]);

    session.set_value(1, AnswerValue::options([10u64])).unwrap();
    session
        .set_value(2, vec![Choice::with_custom_body(23u64, "a CACATUA!")])
        .unwrap();
    session.continue_step().unwrap();

    // Matched through the free-text field. No parrot or crow, so no matrix.
    let visible: Vec<_> = session.visible_questions().iter().map(|q| q.id().get()).collect();
    assert_eq!(visible, vec![5]);

    session.set_value(5, "Near the pond").unwrap();
    session.accept_tos(true);
    let submission = session.submit(&store).unwrap();
    assert_eq!(submission.answers.len(), 3);
}

#[test]
fn test_bird_watching_limits() {
    let store = MemoryStore::new().with_questionnaire(bird_watching().unwrap());
    let mut session = session(&store, BIRD_WATCHING);

    session.set_value(1, AnswerValue::options([10u64])).unwrap();
    session
        .set_value(2, AnswerValue::options([20u64, 21, 22, 23]))
        .unwrap();

    assert_eq!(
        session.warnings(QuestionId::new(2)),
        vec![ErrorKind::TooManyChoices]
    );
    let err = session.continue_step().unwrap_err();
    assert_eq!(
        err.validation_errors().unwrap().for_question(QuestionId::new(2)),
        vec![ErrorKind::TooManyChoices, ErrorKind::MissingCustomText]
    );
}

#[test]
fn test_word_order() {
    let store = MemoryStore::new().with_questionnaire(word_order().unwrap());
    let mut session = session(&store, WORD_ORDER);

    let order = [12u64, 14, 11, 13, 10].map(OptionId::new).to_vec();
    session.set_value(1, AnswerValue::Sorting(order)).unwrap();
    let submission = session.submit(&store).unwrap();

    let sentence: Vec<_> = submission.answers[0]
        .choices
        .iter()
        .map(|choice| choice.body.as_str())
        .collect();
    assert_eq!(sentence.join(" "), "We all like dark chocolate");
}

#[test]
fn test_bird_ratings() {
    let store = MemoryStore::new().with_questionnaire(bird_ratings().unwrap());
    let mut session = session(&store, BIRD_RATINGS);

    session
        .set_value(1, vec![MatrixCell::new(100, 10), MatrixCell::new(100, 11)])
        .unwrap();
    session
        .set_value(
            2,
            vec![
                MatrixCell::new(100, 20),
                MatrixCell::new(100, 21),
                MatrixCell::new(101, 22),
            ],
        )
        .unwrap();

    let err = session.submit(&store).unwrap_err();
    let errors = err.validation_errors().unwrap();
    assert_eq!(
        errors.for_question(QuestionId::new(1)),
        vec![ErrorKind::TooManyChoices, ErrorKind::IncompleteMatrix]
    );
    assert!(errors.for_question(QuestionId::new(2)).is_empty());

    session
        .set_value(1, vec![MatrixCell::new(100, 10), MatrixCell::new(101, 11)])
        .unwrap();
    let submission = session.submit(&store).unwrap();
    let rows: Vec<_> = submission.answers[1]
        .choices
        .iter()
        .map(|choice| choice.row.map(|row| row.get()))
        .collect();
    assert_eq!(rows, vec![Some(100), Some(100), Some(101)]);
}

#[test]
fn test_onboarding_optional_conditions() {
    let store = MemoryStore::new().with_questionnaire(onboarding().unwrap());
    let mut session = session(&store, ONBOARDING);
    let join = QuestionId::new(6);
    let more = QuestionId::new(8);

    // Either optional condition shows the question.
    assert!(session.is_visible(join));
    session.set_value(4, AnswerValue::options([41u64])).unwrap();
    assert!(session.is_visible(join));
    session.set_value(4, AnswerValue::options([40u64])).unwrap();
    assert!(!session.is_visible(join));

    // Both required conditions must hold.
    assert!(!session.is_visible(more));
    session.set_value(2, "Birdie").unwrap();
    assert!(session.is_visible(more));
}

#[test]
fn test_onboarding_steps() {
    let store = MemoryStore::new().with_questionnaire(onboarding().unwrap());
    let mut session = session(&store, ONBOARDING);

    assert_eq!(session.step_indicator(), Some((1, 3)));
    assert!(!session.requests_tos());

    session.set_value(1, "Ada").unwrap();
    session.continue_step().unwrap();
    session.set_value(4, AnswerValue::options([40u64])).unwrap();
    let err = session.continue_step().unwrap_err();
    assert_eq!(
        err.validation_errors().unwrap().questions(),
        vec![QuestionId::new(5)]
    );

    session.set_value(5, "Town birders").unwrap();
    session.continue_step().unwrap();
    assert!(session.requests_tos());
    assert_eq!(session.step_indicator(), Some((3, 3)));

    let err = session.submit(&store).unwrap_err();
    assert_matches!(&err, SubmissionError::Invalid(errors) if errors.tos_agreement_missing());

    session.accept_tos(true);
    session.submit(&store).unwrap();
}

#[test]
fn test_onboarding_name_too_long() {
    let store = MemoryStore::new().with_questionnaire(onboarding().unwrap());
    let mut session = session(&store, ONBOARDING);

    session.set_value(1, "x".repeat(41)).unwrap();
    assert_eq!(session.characters_left(QuestionId::new(1)), Some(0));
    let err = session.continue_step().unwrap_err();
    assert_eq!(
        err.validation_errors().unwrap().for_question(QuestionId::new(1)),
        vec![ErrorKind::TooLong]
    );

    let config = SessionConfig::from_json_str(r#"{"enforce_max_characters": false}"#).unwrap();
    let mut session =
        QuestionnaireSession::new(onboarding().unwrap(), RespondentId::new(2), config);
    session.set_value(1, "x".repeat(41)).unwrap();
    assert_eq!(session.continue_step().unwrap(), 1);
}
