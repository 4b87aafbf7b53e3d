use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::status::ProjectStatus;

/// Stable identifier of a record: its 1-based position among the data rows
/// of the sheet. The header occupies sheet row 1, so record 1 is sheet row 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u32);

impl RecordId {
    pub fn from_sheet_row(row: u32) -> Option<Self> {
        row.checked_sub(1).filter(|id| *id > 0).map(RecordId)
    }

    pub fn sheet_row(self) -> u32 {
        self.0 + 1
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One tracked project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    pub id: RecordId,
    pub name: String,
    pub status: ProjectStatus,
    pub deadline: Option<NaiveDate>,
    pub owner: Option<String>,
    pub progress: u8,
}

/// Unvalidated field values as submitted by a caller.
///
/// On update, absent fields are left alone; an empty `deadline` or `owner`
/// clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<String>,
    pub owner: Option<String>,
    pub progress: Option<i64>,
}

impl ProjectDraft {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn with_deadline(mut self, deadline: &str) -> Self {
        self.deadline = Some(deadline.to_string());
        self
    }

    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    pub fn with_progress(mut self, progress: i64) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// A validated record waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub status: ProjectStatus,
    pub deadline: Option<NaiveDate>,
    pub owner: Option<String>,
    pub progress: u8,
}

impl NewProject {
    pub fn into_record(self, id: RecordId) -> ProjectRecord {
        ProjectRecord {
            id,
            name: self.name,
            status: self.status,
            deadline: self.deadline,
            owner: self.owner,
            progress: self.progress,
        }
    }
}

/// A validated partial update. `None` means "leave as is"; the nested
/// options on `deadline` and `owner` distinguish "clear" from "set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub deadline: Option<Option<NaiveDate>>,
    pub owner: Option<Option<String>>,
    pub progress: Option<u8>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.deadline.is_none()
            && self.owner.is_none()
            && self.progress.is_none()
    }

    /// Returns a copy of `record` with the supplied fields overwritten.
    pub fn applied_to(&self, record: &ProjectRecord) -> ProjectRecord {
        let mut updated = record.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(status) = &self.status {
            updated.status = status.clone();
        }
        if let Some(deadline) = self.deadline {
            updated.deadline = deadline;
        }
        if let Some(owner) = &self.owner {
            updated.owner = owner.clone();
        }
        if let Some(progress) = self.progress {
            updated.progress = progress;
        }
        updated
    }
}

/// Query over the current snapshot. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub statuses: Vec<ProjectStatus>,
    pub owner: Option<String>,
    pub deadline_from: Option<NaiveDate>,
    pub deadline_to: Option<NaiveDate>,
}

/// Owner names compare trimmed and with full Unicode lowercasing.
fn same_owner(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl RecordFilter {
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            statuses: vec![status],
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &ProjectRecord) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&record.status) {
            return false;
        }

        if let Some(owner) = &self.owner {
            match &record.owner {
                Some(record_owner) if same_owner(record_owner, owner) => {}
                _ => return false,
            }
        }

        if self.deadline_from.is_some() || self.deadline_to.is_some() {
            let Some(deadline) = record.deadline else {
                return false;
            };
            if self.deadline_from.is_some_and(|from| deadline < from) {
                return false;
            }
            if self.deadline_to.is_some_and(|to| deadline > to) {
                return false;
            }
        }

        true
    }
}
