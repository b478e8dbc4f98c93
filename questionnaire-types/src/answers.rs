use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AnswerValue, Choice, MatrixCell, OptionId, QuestionId};

/// Error type for answer access operations.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("Missing answer for {0}")]
    MissingAnswer(QuestionId),

    #[error("Type mismatch at {question}: expected {expected}, got {actual}")]
    TypeMismatch {
        question: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },
}

/// In-progress answers of one respondent, keyed by question.
///
/// Holds values for every question the respondent touched, visible or not.
/// Hidden questions keep their values (so going back restores them) but are
/// dropped when a submission is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    values: HashMap<QuestionId, AnswerValue>,
}

impl Answers {
    /// Create an empty answer set.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set the value for a question, replacing any previous value.
    pub fn set(&mut self, question: impl Into<QuestionId>, value: impl Into<AnswerValue>) {
        self.values.insert(question.into(), value.into());
    }

    pub fn get(&self, question: QuestionId) -> Option<&AnswerValue> {
        self.values.get(&question)
    }

    pub fn remove(&mut self, question: QuestionId) -> Option<AnswerValue> {
        self.values.remove(&question)
    }

    pub fn contains(&self, question: QuestionId) -> bool {
        self.values.contains_key(&question)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if the question has a non-empty value.
    pub fn has_value(&self, question: QuestionId) -> bool {
        self.get(question).is_some_and(|value| !value.is_empty())
    }

    // === Convenience accessors ===

    pub fn get_text(&self, question: QuestionId) -> Result<&str, AnswerError> {
        match self.get(question) {
            Some(AnswerValue::Text(text)) => Ok(text),
            Some(other) => Err(mismatch(question, "Text", other)),
            None => Err(AnswerError::MissingAnswer(question)),
        }
    }

    pub fn get_choices(&self, question: QuestionId) -> Result<&[Choice], AnswerError> {
        match self.get(question) {
            Some(AnswerValue::Choices(choices)) => Ok(choices),
            Some(other) => Err(mismatch(question, "Choices", other)),
            None => Err(AnswerError::MissingAnswer(question)),
        }
    }

    pub fn get_sorting(&self, question: QuestionId) -> Result<&[OptionId], AnswerError> {
        match self.get(question) {
            Some(AnswerValue::Sorting(order)) => Ok(order),
            Some(other) => Err(mismatch(question, "Sorting", other)),
            None => Err(AnswerError::MissingAnswer(question)),
        }
    }

    pub fn get_matrix(&self, question: QuestionId) -> Result<&[MatrixCell], AnswerError> {
        match self.get(question) {
            Some(AnswerValue::Matrix(cells)) => Ok(cells),
            Some(other) => Err(mismatch(question, "Matrix", other)),
            None => Err(AnswerError::MissingAnswer(question)),
        }
    }
}

fn mismatch(question: QuestionId, expected: &'static str, actual: &AnswerValue) -> AnswerError {
    AnswerError::TypeMismatch {
        question,
        expected,
        actual: actual.type_name(),
    }
}

impl IntoIterator for Answers {
    type Item = (QuestionId, AnswerValue);
    type IntoIter = std::collections::hash_map::IntoIter<QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = (&'a QuestionId, &'a AnswerValue);
    type IntoIter = std::collections::hash_map::Iter<'a, QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
