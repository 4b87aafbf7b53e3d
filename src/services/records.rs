use crate::error::Result;
use crate::models::{
    projects::{ProjectDraft, ProjectRecord, RecordFilter, RecordId},
    status::StatusCatalog,
};
use crate::services::store::{RecordStore, SkippedRow};
use crate::validation::{validate_new_project, validate_patch};

/// Validation and query surface over the [`RecordStore`].
///
/// Status transitions are not enforced: any status may follow any other.
pub struct RecordService {
    store: RecordStore,
}

impl RecordService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Validates `draft` and appends it. Nothing is written when validation
    /// fails.
    pub async fn create(&mut self, draft: &ProjectDraft) -> Result<ProjectRecord> {
        let project = validate_new_project(draft, self.store.catalog())?;
        self.store.append(project).await
    }

    /// Validates the supplied fields of `draft` and writes only those.
    pub async fn update(&mut self, id: RecordId, draft: &ProjectDraft) -> Result<ProjectRecord> {
        let patch = validate_patch(draft, self.store.catalog())?;
        self.store.update(id, &patch).await
    }

    /// Matching records from the current snapshot, in sheet order.
    pub fn filter(&self, filter: &RecordFilter) -> Vec<ProjectRecord> {
        self.store
            .records()
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }

    /// Reloads the snapshot from the sheet.
    pub async fn refresh(&mut self) -> Result<Vec<ProjectRecord>> {
        self.store.load().await
    }

    pub fn records(&self) -> &[ProjectRecord] {
        self.store.records()
    }

    pub fn get(&self, id: RecordId) -> Option<&ProjectRecord> {
        self.store.get(id)
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        self.store.skipped()
    }

    pub fn catalog(&self) -> &StatusCatalog {
        self.store.catalog()
    }
}
