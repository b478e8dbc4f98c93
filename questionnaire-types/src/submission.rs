use serde::{Deserialize, Serialize};

use crate::{OptionId, QuestionId, QuestionnaireId, RespondentId, RowId};

/// Everything one respondent answered, ready to be persisted in one go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub questionnaire: QuestionnaireId,

    /// The questionnaire revision the answers were given against.
    pub revision: u64,

    pub respondent: RespondentId,

    /// One entry per visible, answered question, in position order.
    pub answers: Vec<StoredAnswer>,
}

impl Submission {
    /// The stored answer for a question, if any.
    pub fn answer(&self, question: QuestionId) -> Option<&StoredAnswer> {
        self.answers.iter().find(|answer| answer.question == question)
    }
}

/// The persisted answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnswer {
    pub question: QuestionId,

    /// Text of a short or long answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Selected options or matrix cells, in storage order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<StoredChoice>,
}

/// A persisted selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredChoice {
    pub option: OptionId,

    /// Body of the selected option at submission time.
    pub body: String,

    /// Text typed into a free-text option's field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_body: Option<String>,

    /// Rank for sorting questions, starting at 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    /// Row for matrix questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<RowId>,
}

/// Result of asking a store to persist a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Everything was written.
    Saved,

    /// The questionnaire changed since the answers were given. Nothing was written.
    Stale { current_revision: u64 },

    /// The respondent had already submitted. Nothing was written.
    AlreadyAnswered,
}
