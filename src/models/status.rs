use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::StatusDefinition;

/// A status name that is a member of the configured [`StatusCatalog`].
///
/// Only the catalog hands these out, so holding one means the value has
/// already been checked against the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectStatus(String);

impl ProjectStatus {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for ProjectStatus {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The ordered set of allowed statuses and the progress each one implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCatalog {
    statuses: Vec<StatusDefinition>,
}

impl StatusCatalog {
    pub fn new(statuses: Vec<StatusDefinition>) -> Self {
        Self { statuses }
    }

    /// Looks a status up by name, ignoring surrounding whitespace and case.
    /// The returned status carries the catalog's spelling.
    pub fn resolve(&self, name: &str) -> Option<ProjectStatus> {
        let wanted = name.trim();
        self.statuses
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(wanted))
            .map(|s| ProjectStatus(s.name.clone()))
    }

    /// Status used for drafts that do not name one.
    pub fn default_status(&self) -> Option<ProjectStatus> {
        self.statuses.first().map(|s| ProjectStatus(s.name.clone()))
    }

    pub fn progress_for(&self, status: &ProjectStatus) -> u8 {
        self.statuses
            .iter()
            .find(|s| s.name == status.0)
            .map(|s| s.progress)
            .unwrap_or(0)
    }

    pub fn statuses(&self) -> impl Iterator<Item = ProjectStatus> + '_ {
        self.statuses.iter().map(|s| ProjectStatus(s.name.clone()))
    }

    pub fn definitions(&self) -> &[StatusDefinition] {
        &self.statuses
    }

    pub fn names(&self) -> Vec<&str> {
        self.statuses.iter().map(|s| s.name.as_str()).collect()
    }
}

impl Default for StatusCatalog {
    fn default() -> Self {
        Self::new(crate::config::default_statuses())
    }
}
