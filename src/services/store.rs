use serde::Serialize;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::{
    projects::{NewProject, ProjectPatch, ProjectRecord, RecordId},
    status::StatusCatalog,
};
use crate::sheets::{SheetTransport, columns};

/// A sheet row that could not be turned into a record during the last load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub row: u32,
    pub reason: String,
}

/// Owns the in-memory snapshot of the worksheet.
///
/// The sheet is the source of truth; the snapshot is replaced wholesale on
/// every [`load`](RecordStore::load) and only patched locally after the
/// remote call for a write has succeeded.
pub struct RecordStore {
    transport: Arc<dyn SheetTransport>,
    catalog: StatusCatalog,
    records: Vec<ProjectRecord>,
    skipped: Vec<SkippedRow>,
    loaded: bool,
}

impl RecordStore {
    pub fn new(transport: Arc<dyn SheetTransport>, catalog: StatusCatalog) -> Self {
        Self {
            transport,
            catalog,
            records: Vec::new(),
            skipped: Vec::new(),
            loaded: false,
        }
    }

    /// Fetches every row and replaces the snapshot with the rows that parse,
    /// in sheet order. Rows that fail to parse are reported via
    /// [`skipped`](RecordStore::skipped).
    ///
    /// An empty sheet gets its header row. A failure to write it is reported
    /// as `RemoteRead`, like any other failed load.
    pub async fn load(&mut self) -> Result<Vec<ProjectRecord>> {
        let rows = self.transport.read_rows().await?;

        if rows.iter().all(|row| columns::is_blank(row)) {
            tracing::info!("Worksheet is empty, writing header row");
            self.transport
                .append_row(columns::header_row())
                .await
                .map_err(|e| match e {
                    Error::RemoteWrite(message) => {
                        Error::RemoteRead(format!("writing header row: {message}"))
                    }
                    other => other,
                })?;
            self.records.clear();
            self.skipped.clear();
            self.loaded = true;
            return Ok(Vec::new());
        }

        if !columns::is_expected_header(&rows[0]) {
            tracing::warn!(header = ?rows[0], "Worksheet header does not match the expected columns");
        }

        let mut records = Vec::with_capacity(rows.len().saturating_sub(1));
        let mut skipped = Vec::new();

        for (index, row) in rows.iter().enumerate().skip(1) {
            let sheet_row = index as u32 + 1;
            if columns::is_blank(row) {
                continue;
            }
            let Some(id) = RecordId::from_sheet_row(sheet_row) else {
                continue;
            };
            match columns::decode_row(id, row, &self.catalog) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    tracing::warn!(row = sheet_row, %reason, "Skipping worksheet row");
                    skipped.push(SkippedRow { row: sheet_row, reason });
                }
            }
        }

        tracing::info!(records = records.len(), skipped = skipped.len(), "Loaded project records");

        self.records = records;
        self.skipped = skipped;
        self.loaded = true;
        Ok(self.records.clone())
    }

    /// Writes a new row and adds the resulting record to the snapshot.
    /// The id is derived from the row the sheet reports.
    ///
    /// Loads first if no load has succeeded yet, so the header row exists
    /// before any data row is written.
    pub async fn append(&mut self, project: NewProject) -> Result<ProjectRecord> {
        if !self.loaded {
            self.load().await?;
        }

        let row = self.transport.append_row(columns::encode_new(&project)).await?;
        let id = RecordId::from_sheet_row(row).ok_or_else(|| {
            Error::RemoteWrite(format!("append landed on row {row}, which is not a data row"))
        })?;

        let record = project.into_record(id);
        match self.records.iter().position(|r| r.id == id) {
            Some(index) => self.records[index] = record.clone(),
            None => self.records.push(record.clone()),
        }

        tracing::info!(record_id = %id, row, "Appended project record");
        Ok(record)
    }

    /// Overwrites the supplied fields of record `id`, remotely first.
    ///
    /// Unknown ids fail with `NotFound` without touching the sheet.
    pub async fn update(&mut self, id: RecordId, patch: &ProjectPatch) -> Result<ProjectRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("Project {id} not found; refresh and try again")))?;

        let cells = columns::encode_patch(patch);
        if cells.is_empty() {
            return Ok(self.records[index].clone());
        }

        self.transport.write_cells(id.sheet_row(), cells).await?;

        let updated = patch.applied_to(&self.records[index]);
        self.records[index] = updated.clone();

        tracing::info!(record_id = %id, "Updated project record");
        Ok(updated)
    }

    /// The snapshot as of the last load plus local writes since.
    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&ProjectRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn catalog(&self) -> &StatusCatalog {
        &self.catalog
    }
}
