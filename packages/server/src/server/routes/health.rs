//! Liveness endpoint with a few in-memory store counters.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub text_cache_entries: usize,
    pub analysis_cache_entries: usize,
    pub rate_limiter_keys: usize,
}

/// `GET /health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
        text_cache_entries: state.text_cache.len(),
        analysis_cache_entries: state.analysis_cache.len(),
        rate_limiter_keys: state.rate_limiter.len(),
    })
}
