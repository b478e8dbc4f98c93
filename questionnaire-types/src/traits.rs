use crate::{Questionnaire, QuestionnaireId, RespondentId, SaveOutcome, Submission};

/// Trait for persistence layers holding questionnaires and their submissions.
///
/// The engine only reads questionnaires and hands over finished submissions;
/// locking and transaction isolation are the store's business.
pub trait QuestionnaireStore {
    /// The error type for this store.
    type Error: Into<anyhow::Error>;

    /// Load a questionnaire with its ordered questions, options, rows and
    /// display conditions.
    fn load(&self, id: QuestionnaireId) -> Result<Questionnaire, Self::Error>;

    /// Check whether the respondent already submitted this questionnaire.
    fn has_answered(
        &self,
        id: QuestionnaireId,
        respondent: RespondentId,
    ) -> Result<bool, Self::Error>;

    /// Persist a submission, all or nothing.
    ///
    /// Implementations must compare `submission.revision` with the stored
    /// revision and check for an earlier submission by the same respondent
    /// inside the same critical section as the write.
    fn save_submission(&self, submission: Submission) -> Result<SaveOutcome, Self::Error>;
}
