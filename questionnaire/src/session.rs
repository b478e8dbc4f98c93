//! Multi-step answering of one questionnaire by one respondent.
//!
//! A session lives for the duration of a request (or a scripted run). It
//! holds in-progress values in memory and writes nothing until the final
//! submit validates as a whole.

use questionnaire_types::{
    AnswerValue, Answers, Question, QuestionId, Questionnaire, QuestionnaireId,
    QuestionnaireStore, RespondentId, SaveOutcome, Submission,
};

use crate::{
    ErrorKind, SessionConfig, SessionError, StaleQuestionnaire, SubmissionError,
    ValidationErrors, Validator, Visibility, build_submission, check_value,
};

/// Where a session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Showing a step, counted from 0.
    Answering { step: usize },

    /// Submitted. No more answers are accepted.
    Completed,
}

/// Result of opening a questionnaire for a respondent.
#[derive(Debug)]
pub enum SessionStart {
    /// A fresh, empty form.
    Answerable(QuestionnaireSession),

    /// The respondent submitted before. No form is shown.
    AlreadyAnswered,

    /// Nothing to answer.
    NoQuestions,
}

impl SessionStart {
    /// The session, if the questionnaire can be answered.
    pub fn into_session(self) -> Option<QuestionnaireSession> {
        match self {
            Self::Answerable(session) => Some(session),
            Self::AlreadyAnswered | Self::NoQuestions => None,
        }
    }
}

/// One respondent answering one questionnaire.
#[derive(Debug, Clone)]
pub struct QuestionnaireSession {
    questionnaire: Questionnaire,
    respondent: RespondentId,
    config: SessionConfig,
    answers: Answers,
    tos_accepted: bool,
    state: SessionState,

    /// Errors of the last failed continue or submit.
    errors: ValidationErrors,
}

impl QuestionnaireSession {
    /// Open a questionnaire from a store.
    ///
    /// The session never starts from stored answers, so nothing another
    /// respondent (or an earlier submission) entered can leak into the form.
    pub fn start<S: QuestionnaireStore>(
        store: &S,
        id: QuestionnaireId,
        respondent: RespondentId,
        config: SessionConfig,
    ) -> Result<SessionStart, SubmissionError> {
        if store
            .has_answered(id, respondent)
            .map_err(SubmissionError::store)?
        {
            tracing::debug!(questionnaire = %id, respondent = %respondent, "Already answered");
            return Ok(SessionStart::AlreadyAnswered);
        }

        let questionnaire = store.load(id).map_err(SubmissionError::store)?;
        if questionnaire.is_empty() {
            return Ok(SessionStart::NoQuestions);
        }

        Ok(SessionStart::Answerable(Self::new(
            questionnaire,
            respondent,
            config,
        )))
    }

    /// Create a session for an already loaded questionnaire.
    pub fn new(questionnaire: Questionnaire, respondent: RespondentId, config: SessionConfig) -> Self {
        Self {
            questionnaire,
            respondent,
            config,
            answers: Answers::new(),
            tos_accepted: false,
            state: SessionState::Answering { step: 0 },
            errors: ValidationErrors::new(),
        }
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn respondent(&self) -> RespondentId {
        self.respondent
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// The step being shown, or `None` once submitted.
    pub fn current_step(&self) -> Option<usize> {
        match self.state {
            SessionState::Answering { step } => Some(step),
            SessionState::Completed => None,
        }
    }

    /// `(step, of)` counted from one, as in "Step 1 of 2".
    pub fn step_indicator(&self) -> Option<(usize, usize)> {
        self.current_step()
            .map(|step| (step + 1, self.questionnaire.step_count()))
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step() == Some(0)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step()
            .is_some_and(|step| step + 1 >= self.questionnaire.step_count())
    }

    /// Whether the terms agreement is asked for on the current step.
    pub fn requests_tos(&self) -> bool {
        self.is_last_step() && self.validator().requires_tos()
    }

    // === Values ===

    /// Set the value of a question on any step.
    ///
    /// A value of the wrong shape, or naming an option or row the question
    /// does not have, is rejected and the previous value kept.
    pub fn set_value(
        &mut self,
        question: impl Into<QuestionId>,
        value: impl Into<AnswerValue>,
    ) -> Result<(), SessionError> {
        let value = value.into();
        let question = self.answerable_question(question.into())?;
        check_value(question, &value).map_err(|problem| SessionError::InvalidValue {
            question: question.id(),
            problem,
        })?;
        let question = question.id();
        tracing::debug!(question = %question, value = value.type_name(), "Answer changed");
        self.answers.set(question, value);
        Ok(())
    }

    /// Remove the value of a question.
    pub fn clear_value(&mut self, question: impl Into<QuestionId>) -> Result<(), SessionError> {
        let question = self.answerable_question(question.into())?.id();
        self.answers.remove(question);
        Ok(())
    }

    pub fn value(&self, question: QuestionId) -> Option<&AnswerValue> {
        self.answers.get(question)
    }

    /// Everything entered so far, including values of hidden questions.
    ///
    /// Used to pre-fill the form after a failed continue or submit.
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn accept_tos(&mut self, accepted: bool) {
        self.tos_accepted = accepted;
    }

    pub fn tos_accepted(&self) -> bool {
        self.tos_accepted
    }

    // === Visibility and feedback ===

    pub fn visibility(&self) -> Visibility {
        Visibility::compute(&self.questionnaire, &self.answers)
    }

    pub fn is_visible(&self, question: QuestionId) -> bool {
        self.visibility().is_visible(question)
    }

    /// All questions of the current step, visible or not, in position order.
    ///
    /// Hidden questions are still rendered (and toggled client side), so
    /// their position in the step is stable.
    pub fn step_questions(&self) -> Vec<&Question> {
        let Some(step) = self.current_step() else {
            return Vec::new();
        };
        self.questionnaire
            .step(step)
            .iter()
            .filter_map(|id| self.questionnaire.question(*id))
            .collect()
    }

    /// Visible questions of the current step, in position order.
    pub fn visible_questions(&self) -> Vec<&Question> {
        let visibility = self.visibility();
        self.step_questions()
            .into_iter()
            .filter(|question| visibility.is_visible(question.id()))
            .collect()
    }

    /// Characters remaining for a text question with a length limit.
    pub fn characters_left(&self, question: QuestionId) -> Option<usize> {
        let question = self.questionnaire.question(question)?;
        let max = question.max_characters() as usize;
        if max == 0 || !question.kind().is_text() {
            return None;
        }
        let used = self
            .answers
            .get(question.id())
            .and_then(AnswerValue::as_text)
            .map_or(0, |text| text.chars().count());
        Some(max.saturating_sub(used))
    }

    /// Non-blocking alerts shown while answering.
    pub fn warnings(&self, question: QuestionId) -> Vec<ErrorKind> {
        let Some(question) = self.questionnaire.question(question) else {
            return Vec::new();
        };
        self.validator()
            .check_question(question, self.answers.get(question.id()))
            .into_iter()
            .filter(|kind| *kind == ErrorKind::TooManyChoices)
            .collect()
    }

    /// Errors of the last failed continue or submit.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    // === Navigation ===

    /// Validate the current step and move to the next one.
    ///
    /// Returns the new step. On failure the session stays on the same step
    /// with its values and the errors are kept for rendering.
    pub fn continue_step(&mut self) -> Result<usize, SessionError> {
        let step = self.answering_step()?;
        if step + 1 >= self.questionnaire.step_count() {
            return Err(SessionError::NoNextStep);
        }

        let visibility = self.visibility();
        if let Err(errors) = self
            .validator()
            .validate_step(step, &self.answers, &visibility)
        {
            tracing::info!(step, errors = errors.len(), "Step has errors");
            self.errors = errors.clone();
            return Err(SessionError::Invalid(errors));
        }

        self.errors = ValidationErrors::new();
        self.state = SessionState::Answering { step: step + 1 };
        tracing::debug!(step = step + 1, "Moved to next step");
        Ok(step + 1)
    }

    /// Go back one step, keeping every value.
    pub fn back(&mut self) -> Result<usize, SessionError> {
        let step = self.answering_step()?;
        if step == 0 {
            return Err(SessionError::NoPreviousStep);
        }

        self.errors = ValidationErrors::new();
        self.state = SessionState::Answering { step: step - 1 };
        tracing::debug!(step = step - 1, "Moved to previous step");
        Ok(step - 1)
    }

    /// Validate everything and hand the submission to the store.
    ///
    /// Nothing is written unless every visible question validates. Errors are
    /// returned as a batch and kept on the session; the session stays on the
    /// last step with its values.
    pub fn submit<S: QuestionnaireStore>(
        &mut self,
        store: &S,
    ) -> Result<Submission, SubmissionError> {
        if self.is_completed() {
            return Err(SubmissionError::AlreadyAnswered);
        }
        if !self.is_last_step() {
            return Err(SessionError::NotOnLastStep.into());
        }

        let visibility = self.visibility();
        let checked = self
            .validator()
            .validate_all(&self.answers, &visibility, self.tos_accepted);
        if let Err(errors) = checked {
            tracing::info!(
                questionnaire = %self.questionnaire.id(),
                errors = errors.len(),
                "Submission rejected"
            );
            self.errors = errors.clone();
            return Err(SubmissionError::Invalid(errors));
        }

        let submission = build_submission(
            &self.questionnaire,
            self.respondent,
            &self.answers,
            &visibility,
        );

        match store
            .save_submission(submission.clone())
            .map_err(SubmissionError::store)?
        {
            SaveOutcome::Saved => {
                tracing::info!(
                    questionnaire = %submission.questionnaire,
                    respondent = %submission.respondent,
                    answers = submission.answers.len(),
                    "Submission saved"
                );
                self.errors = ValidationErrors::new();
                self.state = SessionState::Completed;
                Ok(submission)
            }
            SaveOutcome::Stale { current_revision } => {
                tracing::warn!(
                    questionnaire = %submission.questionnaire,
                    answered = submission.revision,
                    current = current_revision,
                    "Questionnaire changed while answering"
                );
                Err(self.stale_reason(store, submission.revision, current_revision))
            }
            SaveOutcome::AlreadyAnswered => {
                self.state = SessionState::Completed;
                Err(SubmissionError::AlreadyAnswered)
            }
        }
    }

    /// Name the first answer the current questionnaire no longer accepts,
    /// falling back to the revision mismatch itself.
    fn stale_reason<S: QuestionnaireStore>(
        &self,
        store: &S,
        answered: u64,
        current: u64,
    ) -> SubmissionError {
        let questionnaire = match store.load(self.questionnaire.id()) {
            Ok(questionnaire) => questionnaire,
            Err(err) => return SubmissionError::store(err),
        };
        let stale = Validator::new(&questionnaire, self.config)
            .check_consistency(&self.answers)
            .err()
            .unwrap_or(StaleQuestionnaire::Revision { answered, current });
        stale.into()
    }

    fn validator(&self) -> Validator<'_> {
        Validator::new(&self.questionnaire, self.config)
    }

    fn answering_step(&self) -> Result<usize, SessionError> {
        self.current_step().ok_or(SessionError::Completed)
    }

    fn answerable_question(&self, id: QuestionId) -> Result<&Question, SessionError> {
        if self.is_completed() {
            return Err(SessionError::Completed);
        }
        let question = self
            .questionnaire
            .question(id)
            .ok_or(SessionError::UnknownQuestion(id))?;
        if question.is_separator() {
            return Err(SessionError::NotAnswerable(id));
        }
        Ok(question)
    }
}
