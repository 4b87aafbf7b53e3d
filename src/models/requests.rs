use serde::{Deserialize, Serialize};

use super::projects::ProjectRecord;
use crate::services::store::SkippedRow;

/// Raw filter parameters from the query string.
///
/// `status` is a comma-separated list; dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterQuery {
    pub status: Option<String>,
    pub owner: Option<String>,
    pub deadline_from: Option<String>,
    pub deadline_to: Option<String>,
}

/// Response for list and refresh calls.
#[derive(Debug, Clone, Serialize)]
pub struct RecordsResponse {
    pub records: Vec<ProjectRecord>,
    pub count: usize,
    pub skipped: Vec<SkippedRow>,
}

impl RecordsResponse {
    pub fn new(records: Vec<ProjectRecord>, skipped: Vec<SkippedRow>) -> Self {
        Self {
            count: records.len(),
            records,
            skipped,
        }
    }
}

/// Response for the summary endpoint. The AI text is optional and its
/// failure is reported alongside the digest instead of failing the call.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub digest: String,
    pub ai_summary: Option<String>,
    pub ai_error: Option<String>,
}
