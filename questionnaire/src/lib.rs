//! # questionnaire
//!
//! Conditional-display questionnaires answered in steps, with batch answer
//! validation. Storage-agnostic.
//!
//! A questionnaire is an ordered list of questions. Separators split it into
//! steps, and display conditions hide questions depending on earlier answers.
//! A hidden question is never validated and never stored, and its value
//! counts as unanswered for the questions that depend on it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use questionnaire::{
//!     AnswerOption, Choice, DisplayCondition, MemoryStore, Question, QuestionKind,
//!     QuestionnaireDefinition, QuestionnaireSession, RespondentId, SessionConfig, SessionStart,
//! };
//!
//! let questionnaire = QuestionnaireDefinition::new(1, "Birds", vec![
//!     Question::new(1, 0, "Which birds have you seen?", QuestionKind::MultipleOption)
//!         .mandatory()
//!         .with_options(vec![
//!             AnswerOption::new(10, "Parrot"),
//!             AnswerOption::free_text(11, "Other"),
//!         ]),
//!     Question::new(2, 1, "Tell us about the cockatoo", QuestionKind::LongAnswer)
//!         .with_condition(DisplayCondition::matching(1, "cacatua")),
//! ])
//! .build()?;
//!
//! let store = MemoryStore::new().with_questionnaire(questionnaire);
//! let start = QuestionnaireSession::start(&store, 1.into(), RespondentId::new(7), SessionConfig::default())?;
//! let mut session = start.into_session().expect("answerable");
//!
//! session.set_value(1, vec![Choice::with_custom_body(11u64, "Cacatua")])?;
//! assert!(session.is_visible(2.into()));
//! session.submit(&store)?;
//! ```
//!
//! ## Stores
//!
//! Persistence layers implement `QuestionnaireStore`. `MemoryStore` keeps
//! everything in memory for tests and demos.
//!
//! ## Logging
//!
//! Answer changes, step transitions, rejected submissions and persistence are
//! reported through `tracing`. No subscriber is installed by this crate.

// Re-export all types from questionnaire-types
pub use questionnaire_types::*;

mod config;
pub use config::{ConfigError, SessionConfig};

mod display;
pub use display::{Visibility, combine, condition_fulfilled, is_visible};

mod validation;
pub use validation::{ErrorKind, ValidationError, ValidationErrors, Validator, check_value};

mod error;
pub use error::{SessionError, StaleQuestionnaire, SubmissionError, ValueError};

mod submission;
pub use submission::build_submission;

mod session;
pub use session::{QuestionnaireSession, SessionStart, SessionState};

// In-memory store for testing sessions without a database
mod store;
pub use store::{MemoryStore, MemoryStoreError};
