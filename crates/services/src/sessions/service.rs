use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use exam_core::engine::PresentedQuestion;
use exam_core::model::{SelectionPolicy, SessionKey, SessionState, SessionStats};
use exam_core::{ExamError, QuestionSessionEngine};
use storage::SessionStore;

use super::view::{QuestionView, SessionSnapshot, SubmissionOutcome};
use crate::error::ExamServiceError;

//
// ─── EXAM SERVICE ──────────────────────────────────────────────────────────────
//

/// Drives exam sessions kept in a `SessionStore`.
///
/// Every operation is get, mutate, put on the state stored under one key.
/// Callers serialize requests per key; different keys never interact.
pub struct ExamService {
    engine: Arc<QuestionSessionEngine>,
    sessions: Arc<dyn SessionStore>,
    policy: SelectionPolicy,
    rng: Option<Mutex<StdRng>>,
}

impl ExamService {
    #[must_use]
    pub fn new(
        engine: Arc<QuestionSessionEngine>,
        sessions: Arc<dyn SessionStore>,
        policy: SelectionPolicy,
    ) -> Self {
        Self {
            engine,
            sessions,
            policy,
            rng: None,
        }
    }

    /// Draw random selections from a seeded generator instead of the thread RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Some(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    #[must_use]
    pub fn engine(&self) -> &QuestionSessionEngine {
        &self.engine
    }

    /// Replace whatever `key` held with a fresh session.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` if the state cannot be stored.
    pub async fn start_exam(&self, key: SessionKey) -> Result<SessionStats, ExamServiceError> {
        let state = self.engine.start_session(self.policy);
        self.sessions.put_session(key, &state).await?;
        info!(session = %key, policy = %self.policy, "exam started");
        Ok(state.stats())
    }

    /// Select the next question for `key`.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotStarted` if `key` has no session and
    /// `Engine(NoQuestionAvailable)` when nothing can be selected.
    pub async fn next_question(&self, key: SessionKey) -> Result<QuestionView, ExamServiceError> {
        let mut state = self.load(key).await?;
        let selected = self.select(&mut state);
        // Fixed-sequence exhaustion mutates the state even on error.
        self.sessions.put_session(key, &state).await?;

        match selected {
            Ok(presented) => {
                debug!(
                    session = %key,
                    category = %presented.category,
                    number = presented.number,
                    "question selected"
                );
                Ok(QuestionView::from_presented(&presented))
            }
            Err(err) => {
                debug!(session = %key, error = %err, "no question selected");
                Err(err.into())
            }
        }
    }

    /// Grade `raw_answer` against the current question of `key`.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotStarted` if `key` has no session, and
    /// `Engine(NoCurrentQuestion | EmptyAnswer)` from grading.
    pub async fn submit_answer(
        &self,
        key: SessionKey,
        raw_answer: &str,
    ) -> Result<SubmissionOutcome, ExamServiceError> {
        let mut state = self.load(key).await?;
        let result = self.engine.submit_answer(&mut state, raw_answer)?;
        self.sessions.put_session(key, &state).await?;

        let stats = state.stats();
        info!(
            session = %key,
            category = ?state.current_question_type(),
            correct = result.is_correct,
            answered = stats.answered_questions,
            "answer graded"
        );
        Ok(SubmissionOutcome { result, stats })
    }

    /// Stats for `key`; all zeros when no session exists.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` if the store cannot be read.
    pub async fn stats(&self, key: SessionKey) -> Result<SessionStats, ExamServiceError> {
        let state = self.sessions.get_session(key).await?;
        Ok(state.map(|s| self.engine.get_stats(&s)).unwrap_or_default())
    }

    /// Drop the session of `key`, returning it to idle.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` if the store cannot be updated.
    pub async fn restart(&self, key: SessionKey) -> Result<(), ExamServiceError> {
        self.sessions.remove_session(key).await?;
        info!(session = %key, "exam reset");
        Ok(())
    }

    /// Render-ready view of `key`; `None` when idle.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` if the store cannot be read.
    pub async fn snapshot(&self, key: SessionKey) -> Result<Option<SessionSnapshot>, ExamServiceError> {
        let state = self.sessions.get_session(key).await?;
        Ok(state.as_ref().map(SessionSnapshot::from_state))
    }

    async fn load(&self, key: SessionKey) -> Result<SessionState, ExamServiceError> {
        self.sessions.get_session(key).await?.ok_or_else(|| {
            warn!(session = %key, "operation on a session that was never started");
            ExamServiceError::SessionNotStarted
        })
    }

    fn select(&self, state: &mut SessionState) -> Result<PresentedQuestion, ExamError> {
        match &self.rng {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                self.engine.select_next_question(state, &mut *rng)
            }
            None => self.engine.select_next_question_with_default_rng(state),
        }
    }
}
