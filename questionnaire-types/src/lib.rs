//! Core types for the questionnaire crate.
//!
//! This crate provides the foundational types for defining questionnaires:
//! - `Questionnaire` and `QuestionnaireDefinition` - Ordered questions with checked invariants
//! - `Question`, `QuestionKind`, `AnswerOption`, `MatrixRow` - Individual questions
//! - `DisplayCondition` - Visibility rules based on earlier answers
//! - `Answers` and `AnswerValue` - In-progress values keyed by question
//! - `Submission` - The persisted shape of a finished questionnaire
//! - `QuestionnaireStore` - The contract of the persistence layer

mod ids;
pub use ids::{OptionId, QuestionId, QuestionnaireId, RespondentId, RowId};

mod answer_value;
pub use answer_value::{AnswerValue, Choice, MatrixCell};

mod answers;
pub use answers::{AnswerError, Answers};

mod display_condition;
pub use display_condition::{ConditionType, DisplayCondition};

mod question;
pub use question::{AnswerOption, MatrixRow, Question, QuestionKind};

mod questionnaire;
pub use questionnaire::{Questionnaire, QuestionnaireDefinition};

mod submission;
pub use submission::{SaveOutcome, StoredAnswer, StoredChoice, Submission};

mod error;
pub use error::DefinitionError;

mod traits;
pub use traits::QuestionnaireStore;
