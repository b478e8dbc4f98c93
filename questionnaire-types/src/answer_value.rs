use serde::{Deserialize, Serialize};

use crate::{OptionId, RowId};

/// A respondent's current value for one question.
///
/// Values live in memory until the whole submission validates, so display
/// conditions can be evaluated before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    /// Free text (short or long answer).
    Text(String),

    /// Selected options (single or multiple option), in selection order.
    Choices(Vec<Choice>),

    /// Options in ranked order (sorting).
    Sorting(Vec<OptionId>),

    /// Selected cells (matrix single or multiple).
    Matrix(Vec<MatrixCell>),
}

/// A selected option, with the custom text typed into its free-text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub option: OptionId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_body: Option<String>,
}

impl Choice {
    pub fn new(option: impl Into<OptionId>) -> Self {
        Self {
            option: option.into(),
            custom_body: None,
        }
    }

    pub fn with_custom_body(option: impl Into<OptionId>, custom_body: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            custom_body: Some(custom_body.into()),
        }
    }
}

/// A selected matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatrixCell {
    pub row: RowId,
    pub option: OptionId,
}

impl MatrixCell {
    pub fn new(row: impl Into<RowId>, option: impl Into<OptionId>) -> Self {
        Self {
            row: row.into(),
            option: option.into(),
        }
    }
}

impl AnswerValue {
    /// Build a choices value from plain option ids.
    pub fn options<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OptionId>,
    {
        Self::Choices(ids.into_iter().map(Choice::new).collect())
    }

    /// Check if this value counts as "not answered".
    ///
    /// Whitespace-only text is blank.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Choices(choices) => choices.is_empty(),
            Self::Sorting(order) => order.is_empty(),
            Self::Matrix(cells) => cells.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_choices(&self) -> Option<&[Choice]> {
        match self {
            Self::Choices(choices) => Some(choices),
            _ => None,
        }
    }

    pub fn as_sorting(&self) -> Option<&[OptionId]> {
        match self {
            Self::Sorting(order) => Some(order),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&[MatrixCell]> {
        match self {
            Self::Matrix(cells) => Some(cells),
            _ => None,
        }
    }

    /// All option ids referenced by this value, in value order.
    pub fn selected_options(&self) -> Vec<OptionId> {
        match self {
            Self::Text(_) => Vec::new(),
            Self::Choices(choices) => choices.iter().map(|choice| choice.option).collect(),
            Self::Sorting(order) => order.clone(),
            Self::Matrix(cells) => cells.iter().map(|cell| cell.option).collect(),
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Choices(_) => "Choices",
            Self::Sorting(_) => "Sorting",
            Self::Matrix(_) => "Matrix",
        }
    }
}

impl From<String> for AnswerValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for AnswerValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<Choice>> for AnswerValue {
    fn from(choices: Vec<Choice>) -> Self {
        Self::Choices(choices)
    }
}

impl From<Choice> for AnswerValue {
    fn from(choice: Choice) -> Self {
        Self::Choices(vec![choice])
    }
}

impl From<Vec<MatrixCell>> for AnswerValue {
    fn from(cells: Vec<MatrixCell>) -> Self {
        Self::Matrix(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_empty() {
        assert!(AnswerValue::from("   ").is_empty());
        assert!(!AnswerValue::from("Cacatua").is_empty());
    }

    #[test]
    fn empty_selections_are_empty() {
        assert!(AnswerValue::Choices(Vec::new()).is_empty());
        assert!(AnswerValue::Sorting(Vec::new()).is_empty());
        assert!(AnswerValue::Matrix(Vec::new()).is_empty());
        assert!(!AnswerValue::options([1u64]).is_empty());
    }

    #[test]
    fn selected_options_for_matrix() {
        let value = AnswerValue::from(vec![MatrixCell::new(1, 10), MatrixCell::new(2, 11)]);
        assert_eq!(
            value.selected_options(),
            vec![OptionId::new(10), OptionId::new(11)]
        );
    }

    #[test]
    fn tagged_serialization() {
        let value = AnswerValue::from(Choice::with_custom_body(3, "Cacatua"));
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["type"], "choices");
        assert_eq!(json["value"][0]["custom_body"], "Cacatua");
    }
}
