//! Project record handlers
//!
//! Handlers follow the thin-layer pattern: they parse inputs, delegate to the
//! record service, and return responses. Validation lives in the service.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use crate::{
    error::{Error, Result},
    models::{
        projects::{ProjectDraft, RecordId},
        requests::{FilterQuery, RecordsResponse},
    },
    state::AppState,
    validation::validate_filter,
};

// ============================================================================
// LIST PROJECTS
// ============================================================================

/// GET /api/v1/projects
///
/// Lists records from the current snapshot. No remote call is made.
///
/// # Query Parameters
/// - `status`: Comma-separated statuses (any-of)
/// - `owner`: Owner name (case-insensitive)
/// - `deadline_from`, `deadline_to`: Inclusive deadline range (`YYYY-MM-DD`)
///
/// # HTTP Status Codes
/// - `200 OK`: Records returned
/// - `400 BAD_REQUEST`: Unknown status or malformed date
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<RecordsResponse>> {
    let service = state.records.lock().await;
    let filter = validate_filter(&query, service.catalog())?;
    let records = service.filter(&filter);

    Ok(Json(RecordsResponse::new(records, service.skipped().to_vec())))
}

// ============================================================================
// GET SINGLE PROJECT
// ============================================================================

/// GET /api/v1/projects/{id}
///
/// # HTTP Status Codes
/// - `200 OK`: Record returned
/// - `404 NOT_FOUND`: No record with that id in the snapshot
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<serde_json::Value>> {
    let service = state.records.lock().await;
    let record = service
        .get(RecordId(id))
        .ok_or_else(|| Error::NotFound(format!("Project {id} not found; refresh and try again")))?;

    Ok(Json(serde_json::json!({
        "record": record,
    })))
}

// ============================================================================
// CREATE PROJECT
// ============================================================================

/// POST /api/v1/projects
///
/// Validates the draft and appends it to the sheet.
///
/// # Request Body
/// - `name`: Project name (required)
/// - `status`: One of the configured statuses (defaults to the first)
/// - `deadline`: `YYYY-MM-DD`
/// - `owner`: Free text
/// - `progress`: 0-100 (derived from status when absent)
///
/// # HTTP Status Codes
/// - `200 OK`: Record created
/// - `400 BAD_REQUEST`: Validation error, nothing written
/// - `502 BAD_GATEWAY`: The sheet write failed
pub async fn create_project(
    State(state): State<AppState>,
    Json(draft): Json<ProjectDraft>,
) -> Result<Json<serde_json::Value>> {
    let mut service = state.records.lock().await;
    let record = service.create(&draft).await?;

    Ok(Json(serde_json::json!({
        "record": record,
    })))
}

// ============================================================================
// UPDATE PROJECT
// ============================================================================

/// PATCH /api/v1/projects/{id}
///
/// Overwrites only the supplied fields. Empty `deadline` or `owner` clears
/// the field.
///
/// # HTTP Status Codes
/// - `200 OK`: Record updated
/// - `400 BAD_REQUEST`: Validation error, nothing written
/// - `404 NOT_FOUND`: Stale id; refresh first
/// - `502 BAD_GATEWAY`: The sheet write failed
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(draft): Json<ProjectDraft>,
) -> Result<Json<serde_json::Value>> {
    let mut service = state.records.lock().await;
    let record = service.update(RecordId(id), &draft).await?;

    Ok(Json(serde_json::json!({
        "record": record,
    })))
}

// ============================================================================
// REFRESH
// ============================================================================

/// POST /api/v1/projects/refresh
///
/// Reloads the whole snapshot from the sheet and reports rows that could not
/// be parsed.
///
/// # HTTP Status Codes
/// - `200 OK`: Snapshot reloaded
/// - `502 BAD_GATEWAY`: The sheet read failed; the old snapshot is kept
pub async fn refresh_projects(State(state): State<AppState>) -> Result<Json<RecordsResponse>> {
    let mut service = state.records.lock().await;
    let records = service.refresh().await?;

    Ok(Json(RecordsResponse::new(records, service.skipped().to_vec())))
}
