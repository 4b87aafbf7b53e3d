//! Download handlers for the filtered record set.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use crate::{
    error::Result,
    models::{projects::ProjectRecord, requests::FilterQuery},
    services::export,
    state::AppState,
    validation::validate_filter,
};

async fn filtered(state: &AppState, query: &FilterQuery) -> Result<Vec<ProjectRecord>> {
    let service = state.records.lock().await;
    let filter = validate_filter(query, service.catalog())?;
    Ok(service.filter(&filter))
}

fn attachment(body: String, content_type: &'static str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// GET /api/v1/projects/export.csv
///
/// Accepts the same filter parameters as the list endpoint.
pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response> {
    let records = filtered(&state, &query).await?;
    let body = export::to_csv(&records)?;
    tracing::info!(records = records.len(), "CSV export");
    Ok(attachment(body, "text/csv; charset=utf-8", export::CSV_FILENAME))
}

/// GET /api/v1/projects/export.txt
pub async fn export_txt(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response> {
    let records = filtered(&state, &query).await?;
    tracing::info!(records = records.len(), "TXT export");
    Ok(attachment(
        export::to_txt(&records),
        "text/plain; charset=utf-8",
        export::TXT_FILENAME,
    ))
}
