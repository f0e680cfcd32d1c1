use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use exam_core::model::{SessionKey, SessionStats};
use services::{ExamServiceError, QuestionView, SubmissionOutcome};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::session::session_key;
use crate::state::WebState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub answer: String,
}

/// POST /start_exam
///
/// Resets the caller's session.
pub async fn start_exam(
    State(state): State<WebState>,
    jar: CookieJar,
) -> (CookieJar, ApiResult<SessionStats>) {
    let (jar, key) = session_key(jar);
    let result = state
        .exam()
        .start_exam(key)
        .await
        .map(|stats| Json(ApiResponse::success(stats, "考试开始！")))
        .map_err(|e| ApiError::from_service(e, state.policy()));
    (jar, result)
}

/// GET /get_question
///
/// Selects the next question. A caller without a session gets one started.
pub async fn get_question(
    State(state): State<WebState>,
    jar: CookieJar,
) -> (CookieJar, ApiResult<QuestionView>) {
    let (jar, key) = session_key(jar);
    let result = next_or_start(&state, key)
        .await
        .map(|view| Json(ApiResponse::success(view, "Question selected")))
        .map_err(|e| ApiError::from_service(e, state.policy()));
    (jar, result)
}

/// POST /submit_answer
///
/// Grades `{"answer": "..."}` against the current question.
pub async fn submit_answer(
    State(state): State<WebState>,
    jar: CookieJar,
    Json(req): Json<SubmitAnswerRequest>,
) -> (CookieJar, ApiResult<SubmissionOutcome>) {
    let (jar, key) = session_key(jar);
    let result = state
        .exam()
        .submit_answer(key, &req.answer)
        .await
        .map(|outcome| {
            let message = if outcome.result.is_correct {
                "回答正确！"
            } else {
                "回答错误！"
            };
            Json(ApiResponse::success(outcome, message))
        })
        .map_err(|e| ApiError::from_service(e, state.policy()));
    (jar, result)
}

/// GET /get_stats
pub async fn get_stats(
    State(state): State<WebState>,
    jar: CookieJar,
) -> (CookieJar, ApiResult<SessionStats>) {
    let (jar, key) = session_key(jar);
    let result = state
        .exam()
        .stats(key)
        .await
        .map(|stats| Json(ApiResponse::success(stats, "Stats retrieved")))
        .map_err(|e| ApiError::from_service(e, state.policy()));
    (jar, result)
}

async fn next_or_start(state: &WebState, key: SessionKey) -> Result<QuestionView, ExamServiceError> {
    match state.exam().next_question(key).await {
        Err(ExamServiceError::SessionNotStarted) => {
            state.exam().start_exam(key).await?;
            state.exam().next_question(key).await
        }
        other => other,
    }
}
