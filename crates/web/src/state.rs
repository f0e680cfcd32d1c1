use std::sync::Arc;

use exam_core::model::SelectionPolicy;
use services::{AppServices, ExamService};

/// Shared handler state.
#[derive(Clone)]
pub struct WebState {
    exam: Arc<ExamService>,
}

impl WebState {
    #[must_use]
    pub fn new(services: &AppServices) -> Self {
        Self {
            exam: services.exam(),
        }
    }

    #[must_use]
    pub fn exam(&self) -> &ExamService {
        &self.exam
    }

    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.exam.policy()
    }
}
