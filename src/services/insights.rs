//! Derived views over a record set: timeline, status breakdown, digest.

use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{
    projects::{ProjectRecord, RecordId},
    status::{ProjectStatus, StatusCatalog},
};

/// Statuses that count as "on track" in the digest.
const ON_TRACK: [&str; 2] = ["In Progress", "Completed"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub id: RecordId,
    pub name: String,
    pub status: ProjectStatus,
    pub owner: Option<String>,
    pub progress: u8,
    pub deadline: NaiveDate,
    pub days_left: i64,
    pub overdue: bool,
}

/// Records that have a deadline, earliest first.
pub fn timeline(records: &[ProjectRecord], today: NaiveDate) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = records
        .iter()
        .filter_map(|record| {
            let deadline = record.deadline?;
            let days_left = (deadline - today).num_days();
            Some(TimelineEntry {
                id: record.id,
                name: record.name.clone(),
                status: record.status.clone(),
                owner: record.owner.clone(),
                progress: record.progress,
                deadline,
                days_left,
                overdue: days_left < 0 && record.progress < 100,
            })
        })
        .collect();

    entries.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.id.cmp(&b.id)));
    entries
}

/// Count of records per status, in catalog order, zeros included.
pub fn status_distribution(records: &[ProjectRecord], catalog: &StatusCatalog) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = catalog
        .statuses()
        .map(|status| (status.to_string(), 0))
        .collect();

    for record in records {
        *counts.entry(record.status.to_string()).or_insert(0) += 1;
    }
    counts
}

fn has_status(record: &ProjectRecord, name: &str) -> bool {
    record.status.as_str().eq_ignore_ascii_case(name)
}

/// One-paragraph status digest of the records.
pub fn digest(records: &[ProjectRecord], today: NaiveDate) -> String {
    if records.is_empty() {
        return "No projects to summarize.".to_string();
    }

    let week_end = today + Duration::days(7);
    let in_progress = records.iter().filter(|r| has_status(r, "In Progress")).count();
    let due_this_week = records
        .iter()
        .filter(|r| r.deadline.is_some_and(|d| d >= today && d <= week_end))
        .count();
    let on_track = records
        .iter()
        .filter(|r| ON_TRACK.iter().any(|s| has_status(r, s)))
        .count();
    let percent = on_track * 100 / records.len();

    format!(
        "You have {in_progress} project(s) in progress, {due_this_week} due this week. {percent}% of your projects are on track."
    )
}
