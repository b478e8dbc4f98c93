use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{DefinitionError, Question, QuestionId, QuestionnaireId};

/// The authored form of a questionnaire, before its invariants are checked.
///
/// This is what an editor or a persistence layer produces. Turn it into a
/// [`Questionnaire`] with [`QuestionnaireDefinition::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireDefinition {
    pub id: QuestionnaireId,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Terms the respondent must agree to before the final submit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tos: Option<String>,

    /// Bumped on every destructive edit of the questions.
    #[serde(default)]
    pub revision: u64,

    pub questions: Vec<Question>,
}

impl QuestionnaireDefinition {
    pub fn new(
        id: impl Into<QuestionnaireId>,
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            tos: None,
            revision: 0,
            questions,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tos(mut self, tos: impl Into<String>) -> Self {
        self.tos = Some(tos.into());
        self
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    /// Check every construction-time invariant and build the questionnaire.
    pub fn build(self) -> Result<Questionnaire, DefinitionError> {
        Questionnaire::try_from(self)
    }
}

/// A questionnaire whose questions are ordered by position and whose display
/// conditions only reference earlier questions.
///
/// Visibility can therefore be computed in a single pass in position order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "QuestionnaireDefinition",
    into = "QuestionnaireDefinition"
)]
pub struct Questionnaire {
    definition: QuestionnaireDefinition,

    /// Answerable questions of each step, in position order.
    steps: Vec<Vec<QuestionId>>,

    /// Index into `definition.questions` by id.
    index: HashMap<QuestionId, usize>,
}

impl TryFrom<QuestionnaireDefinition> for Questionnaire {
    type Error = DefinitionError;

    fn try_from(mut definition: QuestionnaireDefinition) -> Result<Self, Self::Error> {
        check_unique_ids(&definition.questions)?;
        definition.questions.sort_by_key(Question::position);
        check_unique_positions(&definition.questions)?;

        let index: HashMap<QuestionId, usize> = definition
            .questions
            .iter()
            .enumerate()
            .map(|(idx, question)| (question.id(), idx))
            .collect();

        for question in &definition.questions {
            check_options_and_rows(question)?;
            check_conditions(question, &definition.questions, &index)?;
        }

        let steps = split_steps(&definition.questions);

        Ok(Self {
            definition,
            steps,
            index,
        })
    }
}

impl From<Questionnaire> for QuestionnaireDefinition {
    fn from(questionnaire: Questionnaire) -> Self {
        questionnaire.definition
    }
}

impl Questionnaire {
    pub fn id(&self) -> QuestionnaireId {
        self.definition.id
    }

    pub fn title(&self) -> &str {
        &self.definition.title
    }

    pub fn description(&self) -> Option<&str> {
        self.definition.description.as_deref()
    }

    pub fn tos(&self) -> Option<&str> {
        self.definition.tos.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.definition.revision
    }

    /// All questions, separators included, in position order.
    pub fn questions(&self) -> &[Question] {
        &self.definition.questions
    }

    /// Questions that collect an answer, in position order.
    pub fn answerable(&self) -> impl Iterator<Item = &Question> {
        self.definition
            .questions
            .iter()
            .filter(|question| !question.is_separator())
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.index.get(&id).map(|&idx| &self.definition.questions[idx])
    }

    /// Check if there is nothing to answer.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps, as divided by separators. Empty steps are dropped.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Answerable questions of a step, in position order.
    pub fn step(&self, step: usize) -> &[QuestionId] {
        self.steps.get(step).map(Vec::as_slice).unwrap_or_default()
    }

    /// The step a question is shown in.
    pub fn step_of(&self, question: QuestionId) -> Option<usize> {
        self.steps.iter().position(|ids| ids.contains(&question))
    }

    /// The number shown next to a question, starting at one.
    ///
    /// Separators are not numbered.
    pub fn display_number(&self, question: QuestionId) -> Option<usize> {
        self.answerable()
            .position(|candidate| candidate.id() == question)
            .map(|idx| idx + 1)
    }

    /// The authored definition, e.g. to edit and rebuild it.
    pub fn definition(&self) -> &QuestionnaireDefinition {
        &self.definition
    }

    pub fn into_definition(self) -> QuestionnaireDefinition {
        self.definition
    }
}

fn check_unique_ids(questions: &[Question]) -> Result<(), DefinitionError> {
    let mut seen = HashSet::new();
    for question in questions {
        if !seen.insert(question.id()) {
            return Err(DefinitionError::DuplicateQuestion(question.id()));
        }
    }
    Ok(())
}

/// Expects questions sorted by position.
fn check_unique_positions(questions: &[Question]) -> Result<(), DefinitionError> {
    for pair in questions.windows(2) {
        if pair[0].position() == pair[1].position() {
            return Err(DefinitionError::DuplicatePosition {
                position: pair[0].position(),
                first: pair[0].id(),
                second: pair[1].id(),
            });
        }
    }
    Ok(())
}

fn check_options_and_rows(question: &Question) -> Result<(), DefinitionError> {
    let mut options = HashSet::new();
    for option in question.options() {
        if !options.insert(option.id) {
            return Err(DefinitionError::DuplicateOption {
                question: question.id(),
                option: option.id,
            });
        }
    }

    let mut rows = HashSet::new();
    for row in question.rows() {
        if !rows.insert(row.id) {
            return Err(DefinitionError::DuplicateRow {
                question: question.id(),
                row: row.id,
            });
        }
    }
    Ok(())
}

fn check_conditions(
    question: &Question,
    questions: &[Question],
    index: &HashMap<QuestionId, usize>,
) -> Result<(), DefinitionError> {
    if question.is_separator() && !question.display_conditions().is_empty() {
        return Err(DefinitionError::ConditionalSeparator(question.id()));
    }

    for condition in question.display_conditions() {
        let Some(&idx) = index.get(&condition.condition_question) else {
            return Err(DefinitionError::UnknownConditionQuestion {
                question: question.id(),
                condition_question: condition.condition_question,
            });
        };
        let condition_question = &questions[idx];

        if condition_question.position() >= question.position() {
            return Err(DefinitionError::ForwardReference {
                question: question.id(),
                condition_question: condition_question.id(),
            });
        }

        if condition_question.is_separator() {
            return Err(DefinitionError::ConditionOnSeparator {
                question: question.id(),
                condition_question: condition_question.id(),
            });
        }

        if !condition.condition_type.applies_to(condition_question.kind()) {
            return Err(DefinitionError::UnsupportedCondition {
                question: question.id(),
                condition_question: condition_question.id(),
                condition_type: condition.condition_type,
                kind: condition_question.kind(),
            });
        }

        if condition.condition_type.needs_option() {
            let Some(option) = condition.answer_option else {
                return Err(DefinitionError::MissingConditionOption {
                    question: question.id(),
                    condition_type: condition.condition_type,
                });
            };
            if condition_question.option(option).is_none() {
                return Err(DefinitionError::ForeignConditionOption {
                    question: question.id(),
                    condition_question: condition_question.id(),
                    option,
                });
            }
        }

        if condition.condition_type == crate::ConditionType::Match
            && condition
                .condition_value
                .as_deref()
                .is_none_or(|value| value.trim().is_empty())
        {
            return Err(DefinitionError::MissingConditionValue {
                question: question.id(),
            });
        }
    }
    Ok(())
}

/// Expects questions sorted by position.
fn split_steps(questions: &[Question]) -> Vec<Vec<QuestionId>> {
    let mut steps = Vec::new();
    let mut current = Vec::new();
    for question in questions {
        if question.is_separator() {
            if !current.is_empty() {
                steps.push(std::mem::take(&mut current));
            }
        } else {
            current.push(question.id());
        }
    }
    if !current.is_empty() {
        steps.push(current);
    }
    steps
}
