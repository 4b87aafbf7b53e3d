//! Remote spreadsheet access.
//!
//! Rows cross this boundary as plain strings and nowhere else: the
//! [`columns`] codec turns them into typed records before they reach the
//! store's callers.

pub mod auth;
pub mod client;
pub mod columns;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub use auth::{ServiceAccountKey, TokenSource};
pub use client::SheetsClient;
pub use columns::Column;
pub use memory::InMemorySheet;

/// Row-oriented access to one worksheet.
///
/// Row numbers are 1-based sheet rows; row 1 holds the header.
#[async_trait]
pub trait SheetTransport: Send + Sync {
    /// Returns every row of the worksheet; index 0 is sheet row 1.
    ///
    /// Fails with `RemoteRead` on transport or auth failure.
    async fn read_rows(&self) -> Result<Vec<Vec<String>>>;

    /// Appends a row after the last non-empty one and returns its row number.
    ///
    /// Fails with `RemoteWrite` on transport or auth failure.
    async fn append_row(&self, cells: Vec<String>) -> Result<u32>;

    /// Overwrites the given `(column, value)` cells of one row.
    ///
    /// Fails with `RemoteWrite` on transport or auth failure.
    async fn write_cells(&self, row: u32, cells: Vec<(Column, String)>) -> Result<()>;
}
