#![forbid(unsafe_code)]

use std::time::Duration;

use services::AppServices;
use tracing::{info, warn};

pub mod error;
pub mod response;
pub mod routes;
pub mod session;
pub mod state;

pub use error::{ApiError, WebError};
pub use response::ApiResponse;
pub use routes::router;
pub use session::SESSION_COOKIE;
pub use state::WebState;

const EVICTION_INTERVAL: Duration = Duration::from_secs(10 * 60);
const SESSION_IDLE_LIMIT_HOURS: i64 = 2;

/// Serve the exam API on the configured address until the process stops.
///
/// # Errors
///
/// Returns `WebError::Bind` if the address cannot be bound and
/// `WebError::Serve` if the server fails afterwards.
pub async fn serve(services: AppServices) -> Result<(), WebError> {
    let addr = services.config().bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| WebError::Bind {
            addr: addr.clone(),
            source,
        })?;

    spawn_session_eviction(services.clone());

    info!(
        %addr,
        policy = %services.config().policy,
        "exam web server listening on http://{addr}"
    );
    axum::serve(listener, router(WebState::new(&services)))
        .await
        .map_err(WebError::Serve)
}

fn spawn_session_eviction(services: AppServices) {
    tokio::spawn(async move {
        let idle = chrono::Duration::hours(SESSION_IDLE_LIMIT_HOURS);
        let mut ticker = tokio::time::interval(EVICTION_INTERVAL);
        loop {
            ticker.tick().await;
            if let Err(err) = services.evict_idle_sessions(idle) {
                warn!(error = %err, "session eviction failed");
            }
        }
    });
}
