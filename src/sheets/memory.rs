//! In-process worksheet, for tests and local demos.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::{Column, SheetTransport};
use crate::error::{Error, Result};

/// A worksheet held in memory that counts every call made against it.
///
/// Reads and writes can be made to fail to exercise error paths.
#[derive(Debug, Default)]
pub struct InMemorySheet {
    rows: Mutex<Vec<Vec<String>>>,
    reads: AtomicUsize,
    appends: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sheet pre-filled with `rows`; the first row is the header.
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub async fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().await.clone()
    }

    /// Edits a cell directly, as someone using the spreadsheet would.
    pub async fn set_cell(&self, row: u32, column: Column, value: &str) {
        let mut rows = self.rows.lock().await;
        Self::put(&mut rows, row, column, value.to_string());
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of calls that could have modified the sheet.
    pub fn mutation_count(&self) -> usize {
        self.append_count() + self.write_count()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn put(rows: &mut Vec<Vec<String>>, row: u32, column: Column, value: String) {
        let index = row.saturating_sub(1) as usize;
        if rows.len() <= index {
            rows.resize(index + 1, Vec::new());
        }
        let cells = &mut rows[index];
        if cells.len() <= column.index() {
            cells.resize(column.index() + 1, String::new());
        }
        cells[column.index()] = value;
    }
}

#[async_trait]
impl SheetTransport for InMemorySheet {
    async fn read_rows(&self) -> Result<Vec<Vec<String>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::RemoteRead("read rows: connection refused".to_string()));
        }
        Ok(self.rows.lock().await.clone())
    }

    async fn append_row(&self, cells: Vec<String>) -> Result<u32> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::RemoteWrite("append row: connection refused".to_string()));
        }

        let mut rows = self.rows.lock().await;
        // Like the real API, append after the last row with content.
        while rows.last().is_some_and(|row| row.iter().all(|c| c.trim().is_empty())) {
            rows.pop();
        }
        rows.push(cells);
        Ok(rows.len() as u32)
    }

    async fn write_cells(&self, row: u32, cells: Vec<(Column, String)>) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::RemoteWrite("update cells: connection refused".to_string()));
        }

        let mut rows = self.rows.lock().await;
        for (column, value) in cells {
            Self::put(&mut rows, row, column, value);
        }
        Ok(())
    }
}
