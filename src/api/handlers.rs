//! API Handlers
//!
//! HTTP request handlers for the read-only inspection endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use crate::cache::DnsCache;
use crate::models::{EntryResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// Holds only a handle to the cache; the endpoint keeps no state of its own.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DnsCache>,
}

impl AppState {
    /// Creates a new AppState over a shared cache.
    pub fn new(cache: Arc<DnsCache>) -> Self {
        Self { cache }
    }
}

/// Handler for GET /cache/stats
///
/// Returns live entry counts of the positive and negative caches.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.export_stats())
}

/// Handler for GET /cache/entries
///
/// Walks both caches and returns every live entry. The walk runs on the
/// blocking pool since its length grows with the cache.
pub async fn entries_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntryResponse>>, StatusCode> {
    let cache = Arc::clone(&state.cache);
    tokio::task::spawn_blocking(move || cache.export_entries())
        .await
        .map(Json)
        .map_err(|err| {
            error!(error = %err, "cache entries export failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
