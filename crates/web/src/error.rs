use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use exam_core::ExamError;
use exam_core::model::SelectionPolicy;
use services::ExamServiceError;

use crate::response::ApiResponse;

/// Handler failures, rendered as `success: false` envelopes.
///
/// The display strings are the learner-facing messages.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("已无更多题目")]
    Exhausted,
    #[error("没有可用的题目")]
    NoQuestion,
    #[error("没有当前题目")]
    NoCurrentQuestion,
    #[error("请先选择答案")]
    EmptyAnswer,
    #[error("服务器内部错误")]
    Internal(String),
}

impl ApiError {
    /// Map a service error for a session run under `policy`.
    #[must_use]
    pub fn from_service(err: ExamServiceError, policy: SelectionPolicy) -> Self {
        match err {
            ExamServiceError::Engine(ExamError::NoQuestionAvailable) => match policy {
                SelectionPolicy::FixedSequence => ApiError::Exhausted,
                SelectionPolicy::Random => ApiError::NoQuestion,
            },
            ExamServiceError::Engine(ExamError::NoCurrentQuestion)
            | ExamServiceError::SessionNotStarted => ApiError::NoCurrentQuestion,
            ExamServiceError::Engine(ExamError::EmptyAnswer) => ApiError::EmptyAnswer,
            other => ApiError::Internal(other.to_string()),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Exhausted | ApiError::NoQuestion | ApiError::NoCurrentQuestion => {
                StatusCode::CONFLICT
            }
            ApiError::EmptyAnswer => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(%detail, "request failed");
        }
        let body = ApiResponse::<()>::error(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

/// Errors that stop the server.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WebError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::StorageError;

    #[test]
    fn exhaustion_message_depends_on_policy() {
        let fixed = ApiError::from_service(
            ExamServiceError::Engine(ExamError::NoQuestionAvailable),
            SelectionPolicy::FixedSequence,
        );
        assert_eq!(fixed.to_string(), "已无更多题目");

        let random = ApiError::from_service(
            ExamServiceError::Engine(ExamError::NoQuestionAvailable),
            SelectionPolicy::Random,
        );
        assert_eq!(random.to_string(), "没有可用的题目");
    }

    #[test]
    fn storage_failures_are_internal() {
        let err = ApiError::from_service(
            ExamServiceError::Storage(StorageError::Connection("poisoned".into())),
            SelectionPolicy::Random,
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "服务器内部错误");
    }
}
