use async_trait::async_trait;
use chrono::{DateTime, Utc};
use exam_core::Clock;
use exam_core::model::{QuestionBank, QuestionCategory, QuestionError, SessionKey, SessionState};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::json::JsonBankSource;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("missing question bank files: {}", files.join(", "))]
    MissingBankFiles { files: Vec<String> },

    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid {category} record #{index}: {source}")]
    InvalidRecord {
        category: QuestionCategory,
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("connection error: {0}")]
    Connection(String),
}

/// Source of a parsed question bank.
#[async_trait]
pub trait BankSource: Send + Sync {
    /// Load and validate every category of the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read or a record is invalid.
    async fn load_bank(&self) -> Result<QuestionBank, StorageError>;
}

/// Caller-held session context: get/set of `SessionState` values by key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the state stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get_session(&self, key: SessionKey) -> Result<Option<SessionState>, StorageError>;

    /// Store `state` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the state cannot be stored.
    async fn put_session(&self, key: SessionKey, state: &SessionState) -> Result<(), StorageError>;

    /// Drop the state stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be updated.
    async fn remove_session(&self, key: SessionKey) -> Result<(), StorageError>;
}

/// Bank source over a bank that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBankSource {
    bank: QuestionBank,
}

impl InMemoryBankSource {
    #[must_use]
    pub fn new(bank: QuestionBank) -> Self {
        Self { bank }
    }
}

#[async_trait]
impl BankSource for InMemoryBankSource {
    async fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        Ok(self.bank.clone())
    }
}

#[derive(Debug, Clone)]
struct StoredSession {
    state: SessionState,
    touched_at: DateTime<Utc>,
}

/// Process-local session store; contents are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sessions: Arc<Mutex<HashMap<SessionKey, StoredSession>>>,
    clock: Clock,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `clock` to stamp writes.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Number of stored sessions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }

    /// Remove sessions last written before `cutoff`; returns how many went.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn evict_idle_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.len();
        guard.retain(|_, stored| stored.touched_at >= cutoff);
        Ok(before - guard.len())
    }
}

#[async_trait]
impl SessionStore for InMemoryRepository {
    async fn get_session(&self, key: SessionKey) -> Result<Option<SessionState>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).map(|stored| stored.state.clone()))
    }

    async fn put_session(&self, key: SessionKey, state: &SessionState) -> Result<(), StorageError> {
        let touched_at = self.clock.now();
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            key,
            StoredSession {
                state: state.clone(),
                touched_at,
            },
        );
        Ok(())
    }

    async fn remove_session(&self, key: SessionKey) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&key);
        Ok(())
    }
}

/// Aggregates the bank source and session store behind trait objects.
#[derive(Clone)]
pub struct Storage {
    pub bank: Arc<dyn BankSource>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Storage {
    /// In-memory sessions over an in-memory bank.
    #[must_use]
    pub fn in_memory(bank: QuestionBank) -> Self {
        Self {
            bank: Arc::new(InMemoryBankSource::new(bank)),
            sessions: Arc::new(InMemoryRepository::new()),
        }
    }

    /// In-memory sessions over the JSON bank files in `dir`.
    #[must_use]
    pub fn json(dir: impl Into<PathBuf>, sessions: InMemoryRepository) -> Self {
        Self {
            bank: Arc::new(JsonBankSource::new(dir)),
            sessions: Arc::new(sessions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use exam_core::QuestionSessionEngine;
    use exam_core::model::{Question, SelectionPolicy};
    use exam_core::time::fixed_now;

    fn engine() -> QuestionSessionEngine {
        let question = Question::new(
            QuestionCategory::SingleChoice,
            "Q",
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            "A",
        )
        .unwrap();
        QuestionSessionEngine::new(QuestionBank::new(vec![question], Vec::new(), Vec::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn round_trips_session_state() {
        let repo = InMemoryRepository::new();
        let engine = engine();
        let key = SessionKey::generate();

        let mut state = engine.start_session(SelectionPolicy::FixedSequence);
        engine.select_next_question_with_default_rng(&mut state).unwrap();
        engine.submit_answer(&mut state, "a").unwrap();
        repo.put_session(key, &state).await.unwrap();

        let fetched = repo.get_session(key).await.unwrap().expect("stored");
        assert_eq!(fetched, state);
        assert_eq!(fetched.correct_answers(), 1);

        repo.remove_session(key).await.unwrap();
        assert!(repo.get_session(key).await.unwrap().is_none());
        repo.remove_session(key).await.unwrap();
    }

    #[tokio::test]
    async fn evicts_only_idle_sessions() {
        let start = fixed_now();
        let old = InMemoryRepository::new().with_clock(Clock::fixed(start));
        let engine = engine();
        let state = engine.start_session(SelectionPolicy::Random);

        let stale_key = SessionKey::generate();
        old.put_session(stale_key, &state).await.unwrap();

        let fresh = InMemoryRepository {
            sessions: Arc::clone(&old.sessions),
            clock: Clock::fixed(start + Duration::hours(2)),
        };
        let fresh_key = SessionKey::generate();
        fresh.put_session(fresh_key, &state).await.unwrap();

        let evicted = old.evict_idle_before(start + Duration::hours(1)).unwrap();
        assert_eq!(evicted, 1);
        assert_eq!(old.len().unwrap(), 1);
        assert!(old.get_session(stale_key).await.unwrap().is_none());
        assert!(old.get_session(fresh_key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn in_memory_bank_source_returns_bank() {
        let bank = engine().bank().clone();
        let storage = Storage::in_memory(bank.clone());
        assert_eq!(storage.bank.load_bank().await.unwrap(), bank);
    }
}
