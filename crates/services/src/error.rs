//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::ExamError;
use exam_core::model::ParsePolicyError;
use storage::StorageError;

/// Errors emitted by `ExamService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamServiceError {
    #[error(transparent)]
    Engine(#[from] ExamError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("no exam has been started for this session")]
    SessionNotStarted,
}

/// Errors emitted while reading `ExamConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var}: {source}")]
    Policy {
        var: &'static str,
        #[source]
        source: ParsePolicyError,
    },
    #[error("{var}: invalid port {raw:?}")]
    Port { var: &'static str, raw: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Engine(#[from] ExamError),
}

impl AppServicesError {
    /// True when the bank loaded but held no questions at all.
    #[must_use]
    pub fn is_empty_bank(&self) -> bool {
        matches!(self, AppServicesError::Engine(ExamError::Load))
    }
}

