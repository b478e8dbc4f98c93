//! Answer validation.
//!
//! Errors are collected as a batch so a respondent sees every problem at once.
//! Hidden questions are excluded from every check.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use questionnaire_types::{
    AnswerValue, Answers, Choice, MatrixCell, OptionId, Question, QuestionId, QuestionKind,
    Questionnaire, RowId,
};

use crate::{SessionConfig, StaleQuestionnaire, ValueError, Visibility};

/// What is wrong with an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Mandatory question left empty.
    Blank,

    /// More selections than allowed (per row for matrix questions).
    TooManyChoices,

    /// Mandatory matrix question with a row left unanswered.
    IncompleteMatrix,

    /// Sorting answer that does not rank every option exactly once.
    IncompleteSorting,

    /// Free-text option selected without its text.
    MissingCustomText,

    /// Text longer than the question's `max_characters`.
    TooLong,
}

impl ErrorKind {
    /// Key for the caller's translation layer.
    pub fn i18n_key(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::TooManyChoices => "too_many_choices",
            Self::IncompleteMatrix | Self::IncompleteSorting => "incomplete",
            Self::MissingCustomText => "missing_custom_text",
            Self::TooLong => "too_long",
        }
    }
}

/// An error attached to one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ValidationError {
    pub question: QuestionId,
    pub kind: ErrorKind,
}

/// Every problem found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
    tos_agreement_missing: bool,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, question: QuestionId, kind: ErrorKind) {
        let error = ValidationError { question, kind };
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    pub fn set_tos_agreement_missing(&mut self) {
        self.tos_agreement_missing = true;
    }

    /// Check if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && !self.tos_agreement_missing
    }

    /// Number of problems, the terms agreement included.
    pub fn len(&self) -> usize {
        self.errors.len() + usize::from(self.tos_agreement_missing)
    }

    /// Question errors, in the order they were found.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Error kinds of one question.
    pub fn for_question(&self, question: QuestionId) -> Vec<ErrorKind> {
        self.errors
            .iter()
            .filter(|error| error.question == question)
            .map(|error| error.kind)
            .collect()
    }

    /// Questions with at least one error.
    pub fn questions(&self) -> Vec<QuestionId> {
        let mut seen = HashSet::new();
        self.errors
            .iter()
            .map(|error| error.question)
            .filter(|question| seen.insert(*question))
            .collect()
    }

    pub fn tos_agreement_missing(&self) -> bool {
        self.tos_agreement_missing
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.len())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates answers against one questionnaire.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    questionnaire: &'a Questionnaire,
    config: SessionConfig,
}

impl<'a> Validator<'a> {
    pub fn new(questionnaire: &'a Questionnaire, config: SessionConfig) -> Self {
        Self {
            questionnaire,
            config,
        }
    }

    /// Check that every answer refers to a question, option and row that
    /// still exist, with a value shaped for the question's kind.
    pub fn check_consistency(&self, answers: &Answers) -> Result<(), StaleQuestionnaire> {
        let mut ids: Vec<_> = answers.iter().map(|(id, _)| *id).collect();
        ids.sort();

        for id in ids {
            let Some(value) = answers.get(id) else {
                continue;
            };
            let question = self
                .questionnaire
                .question(id)
                .ok_or(StaleQuestionnaire::UnknownQuestion(id))?;
            check_value(question, value)
                .map_err(|problem| StaleQuestionnaire::Answer { question: id, problem })?;
        }
        Ok(())
    }

    /// Errors of one question, regardless of its visibility.
    pub fn check_question(
        &self,
        question: &Question,
        value: Option<&AnswerValue>,
    ) -> Vec<ErrorKind> {
        let mut kinds = Vec::new();
        let value = value.filter(|value| !value.is_empty());

        let Some(value) = value else {
            if question.is_mandatory() && !question.is_separator() {
                kinds.push(ErrorKind::Blank);
            }
            return kinds;
        };

        match value {
            AnswerValue::Text(text) => {
                let max = question.max_characters() as usize;
                if self.config.enforce_max_characters && max > 0 && text.chars().count() > max {
                    kinds.push(ErrorKind::TooLong);
                }
            }
            AnswerValue::Choices(choices) => {
                let limit = match question.kind() {
                    QuestionKind::SingleOption => Some(1),
                    _ => question.max_choices().map(|max| max as usize),
                };
                if limit.is_some_and(|limit| distinct(choices.iter().map(|c| c.option)) > limit) {
                    kinds.push(ErrorKind::TooManyChoices);
                }
                if choices.iter().any(|choice| lacks_custom_text(question, choice)) {
                    kinds.push(ErrorKind::MissingCustomText);
                }
            }
            AnswerValue::Sorting(order) => {
                let complete = order.len() == question.options().len()
                    && distinct(order.iter().copied()) == order.len();
                if !complete {
                    kinds.push(ErrorKind::IncompleteSorting);
                }
            }
            AnswerValue::Matrix(cells) => {
                let limit = match question.kind() {
                    QuestionKind::MatrixSingle => Some(1),
                    _ => question.max_choices().map(|max| max as usize),
                };
                let per_row = |row: RowId| {
                    distinct(cells.iter().filter(|c| c.row == row).map(|c| c.option))
                };
                let over_limit = |limit: usize| {
                    question.rows().iter().any(|row| per_row(row.id) > limit)
                };

                if limit.is_some_and(over_limit) {
                    kinds.push(ErrorKind::TooManyChoices);
                }
                if question.is_mandatory() && !covers_all_rows(question, cells) {
                    kinds.push(ErrorKind::IncompleteMatrix);
                }
            }
        }
        kinds
    }

    /// Validate the visible questions of one step. Terms are not checked.
    pub fn validate_step(
        &self,
        step: usize,
        answers: &Answers,
        visibility: &Visibility,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for &id in self.questionnaire.step(step) {
            self.collect(id, answers, visibility, &mut errors);
        }
        errors.into_result()
    }

    /// Validate every visible question and the terms agreement.
    pub fn validate_all(
        &self,
        answers: &Answers,
        visibility: &Visibility,
        tos_accepted: bool,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for question in self.questionnaire.answerable() {
            self.collect(question.id(), answers, visibility, &mut errors);
        }
        if self.requires_tos() && !tos_accepted {
            errors.set_tos_agreement_missing();
        }
        errors.into_result()
    }

    /// Whether the final submit needs the terms agreement.
    pub fn requires_tos(&self) -> bool {
        self.config.require_tos_agreement && self.questionnaire.tos().is_some()
    }

    fn collect(
        &self,
        id: QuestionId,
        answers: &Answers,
        visibility: &Visibility,
        errors: &mut ValidationErrors,
    ) {
        if !visibility.is_visible(id) {
            return;
        }
        if let Some(question) = self.questionnaire.question(id) {
            for kind in self.check_question(question, answers.get(id)) {
                errors.push(id, kind);
            }
        }
    }
}

fn distinct(ids: impl Iterator<Item = OptionId>) -> usize {
    ids.collect::<HashSet<_>>().len()
}

fn lacks_custom_text(question: &Question, choice: &Choice) -> bool {
    let free_text = question
        .option(choice.option)
        .is_some_and(|option| option.free_text);
    free_text
        && choice
            .custom_body
            .as_deref()
            .is_none_or(|body| body.trim().is_empty())
}

fn covers_all_rows(question: &Question, cells: &[MatrixCell]) -> bool {
    question
        .rows()
        .iter()
        .all(|row| cells.iter().any(|cell| cell.row == row.id))
}

/// Check that `value` is shaped for the question's kind and only names its
/// own options and rows.
pub fn check_value(question: &Question, value: &AnswerValue) -> Result<(), ValueError> {
    let shape_ok = match (question.kind(), value) {
        (kind, AnswerValue::Text(_)) => kind.is_text(),
        (kind, AnswerValue::Choices(_)) => kind.is_choice(),
        (kind, AnswerValue::Sorting(_)) => kind == QuestionKind::Sorting,
        (kind, AnswerValue::Matrix(_)) => kind.is_matrix(),
    };
    if !shape_ok {
        return Err(ValueError::WrongShape {
            kind: question.kind(),
            value: value.type_name(),
        });
    }

    for option in value.selected_options() {
        if question.option(option).is_none() {
            return Err(ValueError::UnknownOption(option));
        }
    }

    if let AnswerValue::Matrix(cells) = value {
        for cell in cells {
            if question.row_index(cell.row).is_none() {
                return Err(ValueError::UnknownRow(cell.row));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use questionnaire_types::{AnswerOption, MatrixRow, QuestionnaireDefinition};

    fn build(questions: Vec<Question>) -> Questionnaire {
        QuestionnaireDefinition::new(1, "Survey", questions)
            .with_tos("Be nice.")
            .build()
            .unwrap()
    }

    fn options() -> Vec<AnswerOption> {
        vec![
            AnswerOption::new(10, "Parrot"),
            AnswerOption::new(11, "Pigeon"),
            AnswerOption::free_text(12, "Other"),
        ]
    }

    fn matrix(kind: QuestionKind) -> Question {
        Question::new(1, 0, "Rate", kind)
            .with_rows(vec![MatrixRow::new(100, "Taste"), MatrixRow::new(101, "Price")])
            .with_options(vec![
                AnswerOption::new(10, "Good"),
                AnswerOption::new(11, "Bad"),
                AnswerOption::new(12, "Meh"),
            ])
    }

    fn kinds(questionnaire: &Questionnaire, value: AnswerValue) -> Vec<ErrorKind> {
        let validator = Validator::new(questionnaire, SessionConfig::default());
        validator.check_question(&questionnaire.questions()[0], Some(&value))
    }

    #[test]
    fn blank_only_when_mandatory() {
        let optional = build(vec![Question::new(1, 0, "Name", QuestionKind::ShortAnswer)]);
        let validator = Validator::new(&optional, SessionConfig::default());
        assert!(validator.check_question(&optional.questions()[0], None).is_empty());

        let mandatory = build(vec![
            Question::new(1, 0, "Name", QuestionKind::ShortAnswer).mandatory(),
        ]);
        let validator = Validator::new(&mandatory, SessionConfig::default());
        assert_eq!(
            validator.check_question(&mandatory.questions()[0], Some(&AnswerValue::from("  "))),
            vec![ErrorKind::Blank]
        );
    }

    #[test]
    fn too_long_respects_config() {
        let questionnaire = build(vec![
            Question::new(1, 0, "Name", QuestionKind::ShortAnswer).with_max_characters(5),
        ]);
        assert_eq!(
            kinds(&questionnaire, AnswerValue::from("Cacatua")),
            vec![ErrorKind::TooLong]
        );
        assert!(kinds(&questionnaire, AnswerValue::from("Loro")).is_empty());

        let relaxed = SessionConfig {
            enforce_max_characters: false,
            ..SessionConfig::default()
        };
        let validator = Validator::new(&questionnaire, relaxed);
        assert!(validator
            .check_question(&questionnaire.questions()[0], Some(&AnswerValue::from("Cacatua")))
            .is_empty());
    }

    #[test]
    fn max_choices_on_multiple_option() {
        let questionnaire = build(vec![
            Question::new(1, 0, "Birds", QuestionKind::MultipleOption)
                .with_options(options())
                .with_max_choices(2),
        ]);

        assert_eq!(
            kinds(
                &questionnaire,
                AnswerValue::Choices(vec![
                    Choice::new(10u64),
                    Choice::new(11u64),
                    Choice::with_custom_body(12u64, "Cacatua"),
                ])
            ),
            vec![ErrorKind::TooManyChoices]
        );
        assert!(kinds(&questionnaire, AnswerValue::options([10u64, 11])).is_empty());
    }

    #[test]
    fn single_option_allows_one_choice() {
        let questionnaire = build(vec![
            Question::new(1, 0, "Bird", QuestionKind::SingleOption).with_options(options()),
        ]);
        assert_eq!(
            kinds(&questionnaire, AnswerValue::options([10u64, 11])),
            vec![ErrorKind::TooManyChoices]
        );
    }

    #[test]
    fn free_text_option_needs_text() {
        let questionnaire = build(vec![
            Question::new(1, 0, "Bird", QuestionKind::SingleOption).with_options(options()),
        ]);
        assert_eq!(
            kinds(&questionnaire, AnswerValue::options([12u64])),
            vec![ErrorKind::MissingCustomText]
        );
        assert!(kinds(&questionnaire, Choice::with_custom_body(12u64, "Cacatua").into()).is_empty());
    }

    #[test]
    fn sorting_must_rank_every_option_once() {
        let questionnaire = build(vec![
            Question::new(1, 0, "Rank", QuestionKind::Sorting).with_options(options()),
        ]);
        let ids = |raw: &[u64]| AnswerValue::Sorting(raw.iter().copied().map(OptionId::new).collect());

        assert!(kinds(&questionnaire, ids(&[12, 10, 11])).is_empty());
        assert_eq!(
            kinds(&questionnaire, ids(&[12, 10])),
            vec![ErrorKind::IncompleteSorting]
        );
        assert_eq!(
            kinds(&questionnaire, ids(&[12, 12, 10])),
            vec![ErrorKind::IncompleteSorting]
        );
    }

    #[test]
    fn mandatory_matrix_single_needs_every_row() {
        let questionnaire = build(vec![matrix(QuestionKind::MatrixSingle).mandatory()]);
        assert_eq!(
            kinds(&questionnaire, vec![MatrixCell::new(100, 10)].into()),
            vec![ErrorKind::IncompleteMatrix]
        );
        assert!(kinds(
            &questionnaire,
            vec![MatrixCell::new(100, 10), MatrixCell::new(101, 12)].into()
        )
        .is_empty());
    }

    #[test]
    fn optional_matrix_may_skip_rows() {
        let questionnaire = build(vec![matrix(QuestionKind::MatrixSingle)]);
        assert!(kinds(&questionnaire, vec![MatrixCell::new(101, 11)].into()).is_empty());
    }

    #[test]
    fn matrix_single_allows_one_per_row() {
        let questionnaire = build(vec![matrix(QuestionKind::MatrixSingle)]);
        assert_eq!(
            kinds(
                &questionnaire,
                vec![MatrixCell::new(100, 10), MatrixCell::new(100, 11)].into()
            ),
            vec![ErrorKind::TooManyChoices]
        );
    }

    #[test]
    fn matrix_multiple_limit_is_per_row() {
        let questionnaire = build(vec![matrix(QuestionKind::MatrixMultiple).with_max_choices(2)]);

        let within = vec![
            MatrixCell::new(100, 11),
            MatrixCell::new(100, 12),
            MatrixCell::new(101, 10),
            MatrixCell::new(101, 11),
        ];
        assert!(kinds(&questionnaire, within.into()).is_empty());

        let over = vec![
            MatrixCell::new(100, 10),
            MatrixCell::new(100, 11),
            MatrixCell::new(100, 12),
        ];
        assert_eq!(kinds(&questionnaire, over.into()), vec![ErrorKind::TooManyChoices]);
    }

    #[test]
    fn validate_all_skips_hidden_and_reports_terms() {
        let condition = Question::new(1, 0, "Say hey", QuestionKind::ShortAnswer);
        let hidden = Question::new(2, 1, "Only after hey", QuestionKind::ShortAnswer)
            .mandatory()
            .with_condition(questionnaire_types::DisplayCondition::matching(1, "hey").required());
        let questionnaire = build(vec![condition, hidden]);

        let mut answers = Answers::new();
        answers.set(1, "My first answer");
        let visibility = Visibility::compute(&questionnaire, &answers);
        let validator = Validator::new(&questionnaire, SessionConfig::default());

        let errors = validator
            .validate_all(&answers, &visibility, false)
            .unwrap_err();
        assert!(errors.tos_agreement_missing());
        assert!(errors.for_question(QuestionId::new(2)).is_empty());
        assert_eq!(errors.len(), 1);

        assert!(validator.validate_all(&answers, &visibility, true).is_ok());
    }

    #[test]
    fn errors_are_batched() {
        let questionnaire = build(vec![
            Question::new(1, 0, "Name", QuestionKind::ShortAnswer).mandatory(),
            Question::new(2, 1, "Birds", QuestionKind::MultipleOption)
                .with_options(options())
                .with_max_choices(1),
        ]);
        let mut answers = Answers::new();
        answers.set(2, AnswerValue::options([10u64, 11]));
        let visibility = Visibility::compute(&questionnaire, &answers);

        let errors = Validator::new(&questionnaire, SessionConfig::default())
            .validate_all(&answers, &visibility, true)
            .unwrap_err();

        assert_eq!(errors.questions(), vec![QuestionId::new(1), QuestionId::new(2)]);
        assert_eq!(errors.for_question(QuestionId::new(1)), vec![ErrorKind::Blank]);
        assert_eq!(
            errors.for_question(QuestionId::new(2)),
            vec![ErrorKind::TooManyChoices]
        );
        assert_eq!(errors.to_string(), "2 validation error(s)");
    }

    #[test]
    fn consistency_detects_removed_options_and_rows() {
        let questionnaire = build(vec![matrix(QuestionKind::MatrixMultiple)]);
        let validator = Validator::new(&questionnaire, SessionConfig::default());

        let mut answers = Answers::new();
        answers.set(1, vec![MatrixCell::new(100, 99)]);
        assert_eq!(
            validator.check_consistency(&answers),
            Err(StaleQuestionnaire::Answer {
                question: QuestionId::new(1),
                problem: ValueError::UnknownOption(OptionId::new(99)),
            })
        );

        answers.set(1, vec![MatrixCell::new(999, 10)]);
        assert!(matches!(
            validator.check_consistency(&answers),
            Err(StaleQuestionnaire::Answer { problem: ValueError::UnknownRow(row), .. })
                if row == RowId::new(999)
        ));

        answers.set(1, "text for a matrix");
        assert!(matches!(
            validator.check_consistency(&answers),
            Err(StaleQuestionnaire::Answer { problem: ValueError::WrongShape { .. }, .. })
        ));

        answers.remove(QuestionId::new(1));
        answers.set(7, "gone");
        assert!(matches!(
            validator.check_consistency(&answers),
            Err(StaleQuestionnaire::UnknownQuestion(id)) if id == QuestionId::new(7)
        ));
    }

    #[test]
    fn i18n_keys() {
        assert_eq!(ErrorKind::IncompleteMatrix.i18n_key(), "incomplete");
        assert_eq!(ErrorKind::IncompleteSorting.i18n_key(), "incomplete");
        assert_eq!(ErrorKind::TooManyChoices.i18n_key(), "too_many_choices");
    }
}
