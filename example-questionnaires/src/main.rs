//! Scripted walkthrough of the bird watching questionnaire.
//!
//! Run with `RUST_LOG=debug` to see every answer change and step transition.
//! An optional first argument names a JSON session config file.

use anyhow::{Context, bail};
use example_questionnaires::{BIRD_WATCHING, bird_watching};
use questionnaire::{
    AnswerValue, Choice, MatrixCell, MemoryStore, QuestionnaireSession, RespondentId,
    SessionConfig, SessionStart, SubmissionError,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {path}"))?;
            SessionConfig::from_json_str(&json)?
        }
        None => SessionConfig::default(),
    };

    let store = MemoryStore::new();
    store.insert(bird_watching()?)?;
    store.publish(BIRD_WATCHING, true)?;
    tracing::info!(
        questionnaire = %BIRD_WATCHING,
        require_tos = config.require_tos_agreement,
        "Starting walkthrough"
    );

    let alice = RespondentId::new(1);
    let mut session = match QuestionnaireSession::start(&store, BIRD_WATCHING, alice, config)? {
        SessionStart::Answerable(session) => session,
        SessionStart::AlreadyAnswered => bail!("You have already answered this form"),
        SessionStart::NoQuestions => bail!("This questionnaire has no questions"),
    };
    println!("{}", session.questionnaire().title());

    session.set_value(1, AnswerValue::options([10u64]))?;
    session.set_value(
        2,
        vec![
            Choice::new(20u64),
            Choice::with_custom_body(23u64, "Cacatua"),
        ],
    )?;
    print_step(&session);
    session.continue_step()?;

    print_step(&session);
    session.set_value(5, "In the botanical garden")?;
    if let Some(left) = session.characters_left(5.into()) {
        println!("  {left} characters left");
    }
    session.set_value(6, vec![MatrixCell::new(100, 61)])?;

    // The terms are still missing.
    if let Err(err) = session.submit(&store) {
        report(&err);
    }
    session.accept_tos(true);
    let submission = session.submit(&store)?;
    println!("{}", serde_json::to_string_pretty(&submission)?);

    match QuestionnaireSession::start(&store, BIRD_WATCHING, alice, config)? {
        SessionStart::AlreadyAnswered => println!("Alice cannot answer twice"),
        _ => bail!("Alice was allowed to answer twice"),
    }

    let bob = RespondentId::new(2);
    let mut session = QuestionnaireSession::start(&store, BIRD_WATCHING, bob, config)?
        .into_session()
        .context("Bob should be able to answer")?;
    session.set_value(1, AnswerValue::options([10u64]))?;
    session.set_value(2, AnswerValue::options([20u64, 21, 22, 23]))?;
    for warning in session.warnings(2.into()) {
        println!("  warning: {}", warning.i18n_key());
    }
    if let Err(err) = session.continue_step() {
        let step = session.step_indicator().map_or(0, |(step, _)| step);
        println!("Bob stays on step {step}: {err}");
    }

    println!(
        "{} submission(s) stored",
        store.submissions(BIRD_WATCHING)?.len()
    );
    Ok(())
}

fn print_step(session: &QuestionnaireSession) {
    let Some((step, of)) = session.step_indicator() else {
        return;
    };
    println!("Step {step} of {of}");

    let questionnaire = session.questionnaire();
    for question in session.visible_questions() {
        let number = questionnaire.display_number(question.id()).unwrap_or_default();
        let mandatory = if question.is_mandatory() { " *" } else { "" };
        println!("  {number}. {}{mandatory}", question.body());
    }
    if let Some(tos) = questionnaire.tos().filter(|_| session.requests_tos()) {
        println!("  [ ] {tos}");
    }
}

fn report(err: &SubmissionError) {
    println!("{err}");
    if let Some(errors) = err.validation_errors() {
        for error in errors.iter() {
            println!("  {}: {}", error.question, error.kind.i18n_key());
        }
        if errors.tos_agreement_missing() {
            println!("  terms: must be accepted");
        }
    }
}
