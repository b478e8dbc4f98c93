//! Display-condition evaluation.
//!
//! Visibility is a pure function of a question's conditions and the current
//! answers. Nothing here mutates state, so it is recomputed on every change.

use std::collections::HashSet;

use questionnaire_types::{
    AnswerValue, Answers, ConditionType, DisplayCondition, Question, QuestionId, Questionnaire,
};

/// Check a single condition against the condition question's current value.
pub fn condition_fulfilled(
    condition: &DisplayCondition,
    condition_question: &Question,
    value: Option<&AnswerValue>,
) -> bool {
    let answered = value.is_some_and(|value| !value.is_empty());

    match condition.condition_type {
        ConditionType::Answered => answered,
        ConditionType::NotAnswered => !answered,
        ConditionType::Equal => {
            answered && selects_target(condition, value.map(AnswerValue::selected_options))
        }
        ConditionType::NotEqual => {
            answered && !selects_target(condition, value.map(AnswerValue::selected_options))
        }
        ConditionType::Match => match (value, condition.condition_value.as_deref()) {
            (Some(value), Some(needle)) => matches_text(condition_question, value, needle),
            _ => false,
        },
    }
}

fn selects_target(
    condition: &DisplayCondition,
    selected: Option<Vec<questionnaire_types::OptionId>>,
) -> bool {
    match (condition.answer_option, selected) {
        (Some(target), Some(selected)) => selected.contains(&target),
        _ => false,
    }
}

/// Case-insensitive substring search in the answer text, the bodies of
/// selected options, or the custom text of selected free-text options.
fn matches_text(condition_question: &Question, value: &AnswerValue, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    match value {
        AnswerValue::Text(text) => contains(text),
        AnswerValue::Choices(choices) => choices.iter().any(|choice| {
            let Some(option) = condition_question.option(choice.option) else {
                return false;
            };
            contains(&option.body)
                || (option.free_text && choice.custom_body.as_deref().is_some_and(contains))
        }),
        AnswerValue::Sorting(_) | AnswerValue::Matrix(_) => false,
    }
}

/// Combine condition results.
///
/// All mandatory conditions must hold, and when there are non-mandatory
/// conditions at least one of them must hold too. No conditions means visible.
pub fn combine(results: impl IntoIterator<Item = (bool, bool)>) -> bool {
    let mut has_optional = false;
    let mut optional_fulfilled = false;

    for (mandatory, fulfilled) in results {
        if mandatory {
            if !fulfilled {
                return false;
            }
        } else {
            has_optional = true;
            optional_fulfilled |= fulfilled;
        }
    }

    !has_optional || optional_fulfilled
}

/// Check if a question is visible given the raw answers.
///
/// Condition questions are looked up in `questionnaire`; a condition on a
/// question that is not part of it never holds.
pub fn is_visible(question: &Question, questionnaire: &Questionnaire, answers: &Answers) -> bool {
    evaluate(question, questionnaire, |id| answers.get(id))
}

fn evaluate<'a>(
    question: &Question,
    questionnaire: &Questionnaire,
    value_of: impl Fn(QuestionId) -> Option<&'a AnswerValue>,
) -> bool {
    combine(question.display_conditions().iter().map(|condition| {
        let fulfilled = questionnaire
            .question(condition.condition_question)
            .is_some_and(|condition_question| {
                condition_fulfilled(
                    condition,
                    condition_question,
                    value_of(condition.condition_question),
                )
            });
        (condition.mandatory, fulfilled)
    }))
}

/// Visibility of every question of a questionnaire.
///
/// Computed in position order. A hidden question's value is treated as
/// absent by the questions depending on it, because it will not be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    hidden: HashSet<QuestionId>,
}

impl Visibility {
    pub fn compute(questionnaire: &Questionnaire, answers: &Answers) -> Self {
        let mut hidden = HashSet::new();

        for question in questionnaire.answerable() {
            let visible = evaluate(question, questionnaire, |id| {
                if hidden.contains(&id) {
                    None
                } else {
                    answers.get(id)
                }
            });
            if !visible {
                hidden.insert(question.id());
            }
        }

        Self { hidden }
    }

    pub fn is_visible(&self, question: QuestionId) -> bool {
        !self.hidden.contains(&question)
    }

    /// Hidden questions, in no particular order.
    pub fn hidden(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.hidden.iter().copied()
    }
}
