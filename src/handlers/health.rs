//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use crate::state::AppState;

/// Public health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// Status indicator (always "ok")
    pub status: String,
    /// Records in the current snapshot
    pub records: usize,
}

/// Health check handler that returns simple status
///
/// Reports the snapshot size without touching the remote sheet.
///
/// # Example
/// ```bash
/// curl http://localhost:8080/api/v1/health
/// # Returns: {"status":"ok","records":12}
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let records = state.records.lock().await.records().len();
    tracing::debug!(records, "Health check requested");
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        records,
    })
}
