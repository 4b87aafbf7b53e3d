//! Timeline, status breakdown and summary handlers

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use crate::{
    error::Result,
    models::requests::SummaryResponse,
    services::{insights, Summarizer},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct TimelineQuery {
    /// Reference date for `days_left`; defaults to today.
    pub today: Option<NaiveDate>,
}

/// GET /api/v1/timeline
///
/// Records with a deadline, earliest first, with days remaining.
pub async fn timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Json<serde_json::Value> {
    let today = query.today.unwrap_or_else(|| state.digest.today());
    let service = state.records.lock().await;
    let entries = insights::timeline(service.records(), today);

    Json(serde_json::json!({
        "today": today,
        "entries": entries,
    }))
}

/// GET /api/v1/statuses
///
/// The status catalog and how many records are in each status.
pub async fn statuses(State(state): State<AppState>) -> Json<serde_json::Value> {
    let service = state.records.lock().await;
    let counts = insights::status_distribution(service.records(), service.catalog());

    Json(serde_json::json!({
        "statuses": service.catalog().definitions(),
        "counts": counts,
    }))
}

/// GET /api/v1/summary
///
/// Always returns the local digest. When a text-generation summarizer is
/// configured its text is included; its failure is reported in `ai_error`
/// rather than failing the request.
pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>> {
    // Copy the snapshot so the lock is not held across the external call.
    let records = state.records.lock().await.records().to_vec();
    let digest = state.digest.summarize(&records).await?;

    let (ai_summary, ai_error) = match &state.summarizer {
        Some(summarizer) => match summarizer.summarize(&records).await {
            Ok(text) => (Some(text), None),
            Err(e) => {
                tracing::warn!(error = %e, "AI summary failed");
                (None, Some(e.to_string()))
            }
        },
        None => (None, None),
    };

    Ok(Json(SummaryResponse {
        digest,
        ai_summary,
        ai_error,
    }))
}
