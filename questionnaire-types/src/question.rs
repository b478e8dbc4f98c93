use serde::{Deserialize, Serialize};

use crate::{DisplayCondition, OptionId, QuestionId, RowId};

/// A single question in a questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the questionnaire.
    id: QuestionId,

    /// Ordering key, unique within the questionnaire.
    position: u32,

    /// The prompt text shown to the respondent.
    body: String,

    /// Optional longer description (may contain markup, rendered by the caller).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// The kind of question (determines the shape of the answer).
    kind: QuestionKind,

    /// Whether a visible instance of this question must be answered.
    #[serde(default)]
    mandatory: bool,

    /// Maximum text length for short/long answers. 0 means unlimited.
    #[serde(default)]
    max_characters: u32,

    /// Upper bound on selections (per row for matrix questions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_choices: Option<u32>,

    /// Answer options, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<AnswerOption>,

    /// Matrix rows, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    rows: Vec<MatrixRow>,

    /// Rules deciding whether this question is shown.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    display_conditions: Vec<DisplayCondition>,
}

impl Question {
    /// Create a new question.
    pub fn new(
        id: impl Into<QuestionId>,
        position: u32,
        body: impl Into<String>,
        kind: QuestionKind,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            body: body.into(),
            description: None,
            kind,
            mandatory: false,
            max_characters: 0,
            max_choices: None,
            options: Vec::new(),
            rows: Vec::new(),
            display_conditions: Vec::new(),
        }
    }

    /// Create a separator, splitting the questionnaire into steps.
    pub fn separator(id: impl Into<QuestionId>, position: u32) -> Self {
        Self::new(id, position, "", QuestionKind::Separator)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn with_max_characters(mut self, max: u32) -> Self {
        self.max_characters = max;
        self
    }

    pub fn with_max_choices(mut self, max: u32) -> Self {
        self.max_choices = Some(max);
        self
    }

    pub fn with_options(mut self, options: Vec<AnswerOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_rows(mut self, rows: Vec<MatrixRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_condition(mut self, condition: DisplayCondition) -> Self {
        self.display_conditions.push(condition);
        self
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn max_characters(&self) -> u32 {
        self.max_characters
    }

    pub fn max_choices(&self) -> Option<u32> {
        self.max_choices
    }

    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    pub fn display_conditions(&self) -> &[DisplayCondition] {
        &self.display_conditions
    }

    /// Look up one of this question's options.
    pub fn option(&self, id: OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.id == id)
    }

    /// Index of an option in display order.
    pub fn option_index(&self, id: OptionId) -> Option<usize> {
        self.options.iter().position(|option| option.id == id)
    }

    /// Index of a matrix row in display order.
    pub fn row_index(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Check if this question divides steps instead of collecting an answer.
    pub fn is_separator(&self) -> bool {
        self.kind.is_separator()
    }
}

/// The kind of question, determining the answer shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Single-line text.
    ShortAnswer,

    /// Multi-line text.
    LongAnswer,

    /// Pick exactly one option.
    SingleOption,

    /// Pick any number of options (bounded by `max_choices`).
    MultipleOption,

    /// Rank every option.
    Sorting,

    /// One option per matrix row.
    MatrixSingle,

    /// Any number of options per matrix row (bounded by `max_choices`).
    MatrixMultiple,

    /// Divides the questionnaire into steps. Collects nothing.
    Separator,
}

impl QuestionKind {
    pub fn is_separator(self) -> bool {
        self == Self::Separator
    }

    /// Short or long free-text answers.
    pub fn is_text(self) -> bool {
        matches!(self, Self::ShortAnswer | Self::LongAnswer)
    }

    /// Single or multiple option selection.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::SingleOption | Self::MultipleOption)
    }

    pub fn is_matrix(self) -> bool {
        matches!(self, Self::MatrixSingle | Self::MatrixMultiple)
    }

    /// Kinds whose answers reference the question's options.
    pub fn has_options(self) -> bool {
        self.is_choice() || self.is_matrix() || self == Self::Sorting
    }

    /// The snake_case name used in definitions and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::ShortAnswer => "short_answer",
            Self::LongAnswer => "long_answer",
            Self::SingleOption => "single_option",
            Self::MultipleOption => "multiple_option",
            Self::Sorting => "sorting",
            Self::MatrixSingle => "matrix_single",
            Self::MatrixMultiple => "matrix_multiple",
            Self::Separator => "separator",
        }
    }
}

/// An option of a choice, sorting or matrix question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,

    /// Text shown for this option.
    pub body: String,

    /// Selecting this option reveals a custom text field.
    #[serde(default)]
    pub free_text: bool,
}

impl AnswerOption {
    pub fn new(id: impl Into<OptionId>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
            free_text: false,
        }
    }

    /// Create an option with an attached free-text field.
    pub fn free_text(id: impl Into<OptionId>, body: impl Into<String>) -> Self {
        Self {
            free_text: true,
            ..Self::new(id, body)
        }
    }
}

/// A row of a matrix question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub id: RowId,
    pub body: String,
}

impl MatrixRow {
    pub fn new(id: impl Into<RowId>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_families() {
        assert!(QuestionKind::ShortAnswer.is_text());
        assert!(QuestionKind::MultipleOption.is_choice());
        assert!(QuestionKind::MatrixSingle.is_matrix());
        assert!(QuestionKind::Sorting.has_options());
        assert!(!QuestionKind::LongAnswer.has_options());
        assert!(QuestionKind::Separator.is_separator());
    }

    #[test]
    fn option_lookup() {
        let question = Question::new(1, 0, "Favourite bird?", QuestionKind::SingleOption)
            .with_options(vec![
                AnswerOption::new(10, "Parrot"),
                AnswerOption::free_text(11, "Other"),
            ]);

        assert_eq!(question.option_index(OptionId::new(11)), Some(1));
        assert!(question.option(OptionId::new(11)).unwrap().free_text);
        assert!(question.option(OptionId::new(12)).is_none());
    }

    #[test]
    fn deserializes_with_defaults() {
        let question: Question = serde_json::from_str(
            r#"{"id": 4, "position": 2, "body": "Name?", "kind": "short_answer"}"#,
        )
        .unwrap();

        assert_eq!(question.kind(), QuestionKind::ShortAnswer);
        assert!(!question.is_mandatory());
        assert_eq!(question.max_characters(), 0);
        assert_eq!(question.max_choices(), None);
        assert!(question.display_conditions().is_empty());
    }
}
