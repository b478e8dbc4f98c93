use crate::{ConditionType, OptionId, QuestionId, QuestionKind, RowId};

/// Error type for building a questionnaire from its questions.
///
/// These are authoring mistakes; a questionnaire that fails to build is never
/// shown to respondents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("Position {position} is used by both {first} and {second}")]
    DuplicatePosition {
        position: u32,
        first: QuestionId,
        second: QuestionId,
    },

    #[error("{0} appears more than once")]
    DuplicateQuestion(QuestionId),

    #[error("{option} appears more than once")]
    DuplicateOption { question: QuestionId, option: OptionId },

    #[error("{row} appears more than once in {question}")]
    DuplicateRow { question: QuestionId, row: RowId },

    #[error("{question} has a display condition on unknown {condition_question}")]
    UnknownConditionQuestion {
        question: QuestionId,
        condition_question: QuestionId,
    },

    #[error("{question} has a display condition on {condition_question}, which does not come before it")]
    ForwardReference {
        question: QuestionId,
        condition_question: QuestionId,
    },

    #[error("{question} has a display condition on separator {condition_question}")]
    ConditionOnSeparator {
        question: QuestionId,
        condition_question: QuestionId,
    },

    #[error("Separator {0} cannot have display conditions")]
    ConditionalSeparator(QuestionId),

    #[error(
        "{question} has a {condition_type:?} condition on {condition_question}, which as a {} question never changes its outcome",
        .kind.name()
    )]
    UnsupportedCondition {
        question: QuestionId,
        condition_question: QuestionId,
        condition_type: ConditionType,
        kind: QuestionKind,
    },

    #[error("{question} has a {condition_type:?} condition without a target option")]
    MissingConditionOption {
        question: QuestionId,
        condition_type: ConditionType,
    },

    #[error("{question} has a match condition without a value")]
    MissingConditionValue { question: QuestionId },

    #[error("{question} has a condition on {option}, which is not an option of {condition_question}")]
    ForeignConditionOption {
        question: QuestionId,
        condition_question: QuestionId,
        option: OptionId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_questions() {
        let err = DefinitionError::ForwardReference {
            question: QuestionId::new(1),
            condition_question: QuestionId::new(2),
        };
        assert_eq!(
            err.to_string(),
            "question#1 has a display condition on question#2, which does not come before it"
        );
    }
}
