//! API Routes
//!
//! Configures the Axum router with the inspection endpoints.

use std::time::Duration;

use axum::{http::Method, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::{entries_handler, stats_handler, AppState};

/// Creates the inspection router.
///
/// # Endpoints
/// - `GET /cache/stats` - Live entry counts
/// - `GET /cache/entries` - Every live entry with its statistics
///
/// # Middleware
/// - Timeout: bounds each request by `request_timeout`
/// - CORS: read-only access from any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/cache/stats", get(stats_handler))
        .route("/cache/entries", get(entries_handler))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
