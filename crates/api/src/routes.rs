use crate::handlers;
use crate::state::AppState;
use axum::http::StatusCode;
use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Creates the web application: viewer page, viewer socket and health check,
/// plus `/debug/hub` when debug is enabled. Unknown paths redirect to `/`.
pub fn create_app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/ws", get(handlers::viewer_socket))
        .route("/api/health", get(handlers::health_check));

    if state.debug {
        router = router.route("/debug/hub", get(handlers::hub_metrics));
    }

    // The timeout bounds the upgrade request only; upgraded sockets run detached.
    router
        .fallback(handlers::redirect_to_index)
        .layer(handshake_timeout(state.handshake_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Requests still pending after `timeout` get `408 Request Timeout`.
fn handshake_timeout(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}
