use serde::{Deserialize, Serialize};

use crate::{OptionId, QuestionId, QuestionKind};

/// A rule controlling whether a question is shown, based on the current
/// answer to an earlier question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCondition {
    /// The earlier question whose answer is inspected.
    pub condition_question: QuestionId,

    pub condition_type: ConditionType,

    /// Target option for `equal` / `not_equal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_option: Option<OptionId>,

    /// Text searched for by `match`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_value: Option<String>,

    /// Mandatory conditions are AND-combined; the others are OR-combined.
    #[serde(default)]
    pub mandatory: bool,
}

impl DisplayCondition {
    fn new(condition_question: impl Into<QuestionId>, condition_type: ConditionType) -> Self {
        Self {
            condition_question: condition_question.into(),
            condition_type,
            answer_option: None,
            condition_value: None,
            mandatory: false,
        }
    }

    pub fn answered(condition_question: impl Into<QuestionId>) -> Self {
        Self::new(condition_question, ConditionType::Answered)
    }

    pub fn not_answered(condition_question: impl Into<QuestionId>) -> Self {
        Self::new(condition_question, ConditionType::NotAnswered)
    }

    pub fn equal(condition_question: impl Into<QuestionId>, option: impl Into<OptionId>) -> Self {
        Self {
            answer_option: Some(option.into()),
            ..Self::new(condition_question, ConditionType::Equal)
        }
    }

    pub fn not_equal(
        condition_question: impl Into<QuestionId>,
        option: impl Into<OptionId>,
    ) -> Self {
        Self {
            answer_option: Some(option.into()),
            ..Self::new(condition_question, ConditionType::NotEqual)
        }
    }

    pub fn matching(condition_question: impl Into<QuestionId>, value: impl Into<String>) -> Self {
        Self {
            condition_value: Some(value.into()),
            ..Self::new(condition_question, ConditionType::Match)
        }
    }

    /// Mark this condition as mandatory.
    pub fn required(mut self) -> Self {
        self.mandatory = true;
        self
    }
}

/// How a display condition inspects the condition question's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    Answered,
    NotAnswered,
    Equal,
    NotEqual,
    Match,
}

impl ConditionType {
    /// Whether this type compares against a target option.
    pub fn needs_option(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }

    /// Whether this type can tell answers of `kind` apart.
    ///
    /// A sorting answer ranks every option, so `equal` would always hold once
    /// answered. Rankings and matrix cells carry no text to `match`.
    pub fn applies_to(self, kind: QuestionKind) -> bool {
        match self {
            Self::Answered | Self::NotAnswered => true,
            Self::Equal | Self::NotEqual => kind != QuestionKind::Sorting,
            Self::Match => kind.is_text() || kind.is_choice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_fill_targets() {
        let equal = DisplayCondition::equal(1, 5).required();
        assert_eq!(equal.condition_type, ConditionType::Equal);
        assert_eq!(equal.answer_option, Some(OptionId::new(5)));
        assert!(equal.mandatory);

        let matching = DisplayCondition::matching(1, "hey");
        assert_eq!(matching.condition_value.as_deref(), Some("hey"));
        assert!(!matching.mandatory);
    }

    #[test]
    fn condition_type_uses_snake_case() {
        let parsed: ConditionType = serde_json::from_str("\"not_answered\"").unwrap();
        assert_eq!(parsed, ConditionType::NotAnswered);
    }
}
