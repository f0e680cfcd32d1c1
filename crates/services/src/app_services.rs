use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use exam_core::model::{BankOverview, QuestionBank};
use exam_core::{Clock, QuestionSessionEngine};
use storage::{InMemoryRepository, Storage, StorageError};

use crate::config::ExamConfig;
use crate::error::AppServicesError;
use crate::sessions::ExamService;

/// Assembles app-facing services over a loaded bank.
#[derive(Clone)]
pub struct AppServices {
    config: ExamConfig,
    overview: BankOverview,
    sessions: InMemoryRepository,
    clock: Clock,
    exam: Arc<ExamService>,
}

impl AppServices {
    /// Load the bank named by `config` and build services over it.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if the bank files are missing or
    /// malformed, and `AppServicesError::Engine` if they hold no questions.
    pub async fn load(config: ExamConfig) -> Result<Self, AppServicesError> {
        let sessions = InMemoryRepository::new();
        let storage = Storage::json(&config.bank_dir, sessions.clone());
        let bank = storage.bank.load_bank().await?;
        Self::assemble(config, bank, sessions, Clock::default())
    }

    /// Build services over an already loaded bank.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Engine` if the bank holds no questions.
    pub fn from_bank(config: ExamConfig, bank: QuestionBank) -> Result<Self, AppServicesError> {
        Self::assemble(config, bank, InMemoryRepository::new(), Clock::default())
    }

    fn assemble(
        config: ExamConfig,
        bank: QuestionBank,
        sessions: InMemoryRepository,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let sessions = sessions.with_clock(clock);
        let engine = Arc::new(QuestionSessionEngine::new(bank)?);
        let overview = engine.bank().overview();
        let exam = Arc::new(ExamService::new(
            Arc::clone(&engine),
            Arc::new(sessions.clone()),
            config.policy,
        ));
        info!(
            policy = %config.policy,
            total = overview.total,
            "exam services ready"
        );
        Ok(Self {
            config,
            overview,
            sessions,
            clock,
            exam,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    #[must_use]
    pub fn overview(&self) -> BankOverview {
        self.overview
    }

    #[must_use]
    pub fn exam(&self) -> Arc<ExamService> {
        Arc::clone(&self.exam)
    }

    /// Drop sessions nobody has touched for `idle`; returns how many went.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session store is unusable.
    pub fn evict_idle_sessions(&self, idle: Duration) -> Result<usize, StorageError> {
        let evicted = self.sessions.evict_idle_before(self.clock.now() - idle)?;
        if evicted > 0 {
            info!(evicted, "evicted idle exam sessions");
        }
        Ok(evicted)
    }
}
