use questionnaire_types::{OptionId, QuestionId, QuestionKind, RowId};

use crate::ValidationErrors;

/// Why a value cannot answer a question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("a {value} answer does not fit a {} question", .kind.name())]
    WrongShape {
        kind: QuestionKind,
        value: &'static str,
    },

    #[error("{0} is not one of its options")]
    UnknownOption(OptionId),

    #[error("{0} is not one of its rows")]
    UnknownRow(RowId),
}

/// The questionnaire no longer matches the answers given to it.
///
/// Fatal to the submission: nothing is written and the form has to be
/// rendered again from the current questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StaleQuestionnaire {
    #[error("{0} no longer exists")]
    UnknownQuestion(QuestionId),

    #[error("{question} no longer accepts its answer: {problem}")]
    Answer {
        question: QuestionId,
        problem: ValueError,
    },

    #[error("Answers were given against revision {answered}, but the questionnaire is at revision {current}")]
    Revision { answered: u64, current: u64 },
}

/// Error type for navigating a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("The current step has errors: {0}")]
    Invalid(ValidationErrors),

    #[error("Already on the first step")]
    NoPreviousStep,

    #[error("Already on the last step")]
    NoNextStep,

    #[error("Only the last step can be submitted")]
    NotOnLastStep,

    #[error("The questionnaire has been submitted")]
    Completed,

    #[error("{0} is not part of this questionnaire")]
    UnknownQuestion(QuestionId),

    #[error("Separator {0} takes no answer")]
    NotAnswerable(QuestionId),

    /// Nothing was stored.
    #[error("Invalid value for {question}: {problem}")]
    InvalidValue {
        question: QuestionId,
        problem: ValueError,
    },
}

impl SessionError {
    /// The step errors, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Error type for submitting a questionnaire.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// Some answers are invalid. Nothing was written.
    #[error("There was a problem answering: {0}")]
    Invalid(ValidationErrors),

    /// The questionnaire changed while it was being answered. Nothing was written.
    #[error("The questionnaire changed while answering: {0}")]
    Stale(#[from] StaleQuestionnaire),

    /// The respondent already submitted this questionnaire.
    #[error("You have already answered this form")]
    AlreadyAnswered,

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Persistence failure.
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl SubmissionError {
    /// Create a store error from any error type.
    pub fn store(err: impl Into<anyhow::Error>) -> Self {
        Self::Store(err.into())
    }

    /// The field errors, if the submission was rejected by validation.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    /// Check if the form has to be rendered again from scratch.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_messages() {
        let err = StaleQuestionnaire::Answer {
            question: QuestionId::new(3),
            problem: ValueError::WrongShape {
                kind: QuestionKind::MatrixSingle,
                value: "Text",
            },
        };
        assert_eq!(
            err.to_string(),
            "question#3 no longer accepts its answer: a Text answer does not fit a matrix_single question"
        );
    }

    #[test]
    fn invalid_value_message() {
        let err = SessionError::InvalidValue {
            question: QuestionId::new(1),
            problem: ValueError::UnknownOption(OptionId::new(99)),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for question#1: option#99 is not one of its options"
        );
    }

    #[test]
    fn submission_error_kinds() {
        let err = SubmissionError::from(StaleQuestionnaire::Revision {
            answered: 1,
            current: 2,
        });
        assert!(err.is_stale());
        assert!(err.validation_errors().is_none());

        let err = SubmissionError::store(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "Store error: disk full");

        let err = SubmissionError::from(SessionError::NotOnLastStep);
        assert_eq!(err.to_string(), "Only the last step can be submitted");
    }
}
