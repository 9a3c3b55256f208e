//! Router configuration.
//!
//! Two routes: the webhook receiver and a liveness probe. No layer here may
//! turn a delivered webhook into a non-200 status, so there is no timeout and
//! the body size is only capped when `MAX_BODY_SIZE` is set.

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::constants::webhook;
use crate::handlers::{health_check, receive_webhook};
use crate::middleware::request_logger_middleware;

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    let body_limit = match app_state.config.max_body_size {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/health", get(health_check))
        .route(webhook::ROUTE, post(receive_webhook))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(request_logger_middleware))
                .layer(body_limit),
        )
        .with_state(app_state)
}
