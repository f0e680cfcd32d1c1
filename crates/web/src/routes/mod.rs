//! HTTP entry points.
//!
//! - `GET /` → exam page
//! - `POST /start_exam`, `GET /get_question`, `POST /submit_answer`,
//!   `GET /get_stats` → exam API, keyed by the session cookie
//! - `GET /health` → liveness probe

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use axum::routing::{get, post};
use tracing::info;

use crate::state::WebState;

pub mod exam;
pub mod health;
pub mod index;

/// Builds the application router over `state`.
pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/start_exam", post(exam::start_exam))
        .route("/get_question", get(exam::get_question))
        .route("/submit_answer", post(exam::submit_answer))
        .route("/get_stats", get(exam::get_stats))
        .route("/health", get(health::health_check))
        .layer(from_fn(log_request))
        .with_state(state)
}

async fn log_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;
    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "handled request"
    );
    response
}
