//! Optional health endpoint handler.
//!
//! Mounted only when `health_path` is configured, since every other path
//! belongs to the backends. Returns a [`HealthResponse`] JSON payload
//! with the server version, uptime, mode, backend count, and cumulative
//! request statistics.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub mode: String,
    pub backends: usize,
    pub timeout_ms: u64,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_multicast: u64,
    pub requests_failed: u64,
}

#[allow(clippy::cast_possible_truncation)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mode = if state.is_debug() { "debug" } else { "multicast" };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        mode: mode.to_string(),
        backends: state.backends.len(),
        timeout_ms: state.timeout.as_millis() as u64,
        stats: StatsResponse {
            requests_multicast: state.stats.multicast.load(Ordering::Relaxed),
            requests_failed: state.stats.failed.load(Ordering::Relaxed),
        },
    })
}
