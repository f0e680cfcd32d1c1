use std::sync::Arc;

use exam_core::model::{BankOverview, SelectionPolicy, SessionKey};
use services::ExamService;

pub trait UiApp: Send + Sync {
    fn exam(&self) -> Arc<ExamService>;
    fn bank_overview(&self) -> BankOverview;
}

/// Services plus the single learner session of this window.
#[derive(Clone)]
pub struct AppContext {
    exam: Arc<ExamService>,
    overview: BankOverview,
    session_key: SessionKey,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            exam: app.exam(),
            overview: app.bank_overview(),
            session_key: SessionKey::generate(),
        }
    }

    #[must_use]
    pub fn exam(&self) -> Arc<ExamService> {
        Arc::clone(&self.exam)
    }

    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.exam.policy()
    }

    #[must_use]
    pub fn bank_overview(&self) -> BankOverview {
        self.overview
    }

    #[must_use]
    pub fn session_key(&self) -> SessionKey {
        self.session_key
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
