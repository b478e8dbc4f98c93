//! In-memory store for testing sessions without a database.
//!
//! `MemoryStore` keeps questionnaires and submissions behind a single mutex,
//! so the revision check, the already-answered check and the write of a
//! submission happen in one critical section.
//!
//! # Example
//!
//! ```rust,ignore
//! use questionnaire::{MemoryStore, QuestionnaireSession, SessionConfig, SessionStart};
//!
//! let store = MemoryStore::new().with_questionnaire(questionnaire);
//! let start = QuestionnaireSession::start(&store, id, respondent, SessionConfig::default())?;
//! if let SessionStart::Answerable(mut session) = start {
//!     session.set_value(1, "Cacatua")?;
//!     session.submit(&store)?;
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use questionnaire_types::{
    DefinitionError, Question, Questionnaire, QuestionnaireId, QuestionnaireStore, RespondentId,
    SaveOutcome, Submission,
};

/// A store holding everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    questionnaires: HashMap<QuestionnaireId, Questionnaire>,
    published: HashSet<QuestionnaireId>,
    submissions: HashMap<QuestionnaireId, Vec<Submission>>,
}

/// Error type for MemoryStore.
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("{0} does not exist")]
    NotFound(QuestionnaireId),

    #[error("Invalid questionnaire: {0}")]
    Definition(#[from] DefinitionError),

    #[error("Store lock poisoned")]
    Poisoned,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a questionnaire, replacing any with the same id.
    pub fn with_questionnaire(mut self, questionnaire: Questionnaire) -> Self {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        inner.questionnaires.insert(questionnaire.id(), questionnaire);
        self
    }

    /// Add a questionnaire, replacing any with the same id.
    pub fn insert(&self, questionnaire: Questionnaire) -> Result<(), MemoryStoreError> {
        let mut inner = self.lock()?;
        tracing::debug!(questionnaire = %questionnaire.id(), "Questionnaire stored");
        inner.questionnaires.insert(questionnaire.id(), questionnaire);
        Ok(())
    }

    /// Replace the questions of a questionnaire.
    ///
    /// Every stored submission is deleted and the revision is bumped, so
    /// sessions still answering the old questions are rejected as stale.
    /// Returns the new revision.
    pub fn update_questions(
        &self,
        id: QuestionnaireId,
        questions: Vec<Question>,
    ) -> Result<u64, MemoryStoreError> {
        let mut inner = self.lock()?;
        let current = inner
            .questionnaires
            .get(&id)
            .ok_or(MemoryStoreError::NotFound(id))?;

        let mut definition = current.definition().clone();
        definition.questions = questions;
        definition.revision += 1;
        let revision = definition.revision;
        let updated = definition.build()?;

        let deleted = inner.submissions.remove(&id).map_or(0, |s| s.len());
        inner.questionnaires.insert(id, updated);
        tracing::warn!(questionnaire = %id, revision, deleted, "Questions changed, answers deleted");
        Ok(revision)
    }

    /// Publish a questionnaire.
    ///
    /// With `clean_after_publish`, answers collected before publishing (while
    /// testing the form) are deleted. Returns the number of deleted submissions.
    pub fn publish(
        &self,
        id: QuestionnaireId,
        clean_after_publish: bool,
    ) -> Result<usize, MemoryStoreError> {
        let mut inner = self.lock()?;
        if !inner.questionnaires.contains_key(&id) {
            return Err(MemoryStoreError::NotFound(id));
        }
        inner.published.insert(id);

        let deleted = if clean_after_publish {
            inner.submissions.remove(&id).map_or(0, |s| s.len())
        } else {
            0
        };
        tracing::info!(questionnaire = %id, deleted, "Questionnaire published");
        Ok(deleted)
    }

    pub fn is_published(&self, id: QuestionnaireId) -> Result<bool, MemoryStoreError> {
        Ok(self.lock()?.published.contains(&id))
    }

    /// All submissions of a questionnaire, in the order they were saved.
    pub fn submissions(&self, id: QuestionnaireId) -> Result<Vec<Submission>, MemoryStoreError> {
        Ok(self
            .lock()?
            .submissions
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    /// The submission of one respondent, if any.
    pub fn answers_for(
        &self,
        id: QuestionnaireId,
        respondent: RespondentId,
    ) -> Result<Option<Submission>, MemoryStoreError> {
        Ok(self.lock()?.submissions.get(&id).and_then(|submissions| {
            submissions
                .iter()
                .find(|submission| submission.respondent == respondent)
                .cloned()
        }))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, MemoryStoreError> {
        self.inner.lock().map_err(|_| MemoryStoreError::Poisoned)
    }
}

impl QuestionnaireStore for MemoryStore {
    type Error = MemoryStoreError;

    fn load(&self, id: QuestionnaireId) -> Result<Questionnaire, Self::Error> {
        self.lock()?
            .questionnaires
            .get(&id)
            .cloned()
            .ok_or(MemoryStoreError::NotFound(id))
    }

    fn has_answered(
        &self,
        id: QuestionnaireId,
        respondent: RespondentId,
    ) -> Result<bool, Self::Error> {
        Ok(self.answers_for(id, respondent)?.is_some())
    }

    fn save_submission(&self, submission: Submission) -> Result<SaveOutcome, Self::Error> {
        let mut inner = self.lock()?;
        let id = submission.questionnaire;
        let current_revision = inner
            .questionnaires
            .get(&id)
            .ok_or(MemoryStoreError::NotFound(id))?
            .revision();

        if submission.revision != current_revision {
            return Ok(SaveOutcome::Stale { current_revision });
        }

        let submissions = inner.submissions.entry(id).or_default();
        if submissions
            .iter()
            .any(|existing| existing.respondent == submission.respondent)
        {
            return Ok(SaveOutcome::AlreadyAnswered);
        }

        submissions.push(submission);
        Ok(SaveOutcome::Saved)
    }
}
