//! CSV and plain-text renderings of a record set.
//!
//! Both are pure functions of the records passed in.

use prettytable::{Cell, Row, Table, format};

use crate::error::{Error, Result, ValidationErrors};
use crate::models::{
    projects::{ProjectRecord, RecordId},
    status::StatusCatalog,
};
use crate::validation::parse_date;

/// Column order of the CSV export.
pub const CSV_HEADER: [&str; 6] = ["id", "name", "status", "deadline", "owner", "progress"];

pub const CSV_FILENAME: &str = "project_tracker.csv";
pub const TXT_FILENAME: &str = "project_tracker.txt";

fn fields(record: &ProjectRecord) -> [String; 6] {
    [
        record.id.to_string(),
        record.name.clone(),
        record.status.to_string(),
        record
            .deadline
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        record.owner.clone().unwrap_or_default(),
        record.progress.to_string(),
    ]
}

pub fn to_csv(records: &[ProjectRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let write_err = |e: csv::Error| Error::Internal(format!("CSV export failed: {}", e));
    writer.write_record(CSV_HEADER).map_err(write_err)?;
    for record in records {
        writer.write_record(fields(record)).map_err(write_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("CSV export failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Internal(format!("CSV export failed: {}", e)))
}

/// Parses text produced by [`to_csv`] back into records.
pub fn from_csv(text: &str, catalog: &StatusCatalog) -> Result<Vec<ProjectRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let invalid = |message: String| Error::Validation(ValidationErrors::single("csv", message));

    let headers = reader
        .headers()
        .map_err(|e| invalid(format!("unreadable header: {e}")))?;
    if headers.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(invalid(format!(
            "expected header '{}'",
            CSV_HEADER.join(",")
        )));
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let line = index + 2;
        let row = row.map_err(|e| invalid(format!("line {line}: {e}")))?;
        let field = |i: usize| row.get(i).unwrap_or("");

        let id = field(0)
            .parse::<u32>()
            .map_err(|_| invalid(format!("line {line}: invalid id '{}'", field(0))))?;
        let status = catalog
            .resolve(field(2))
            .ok_or_else(|| invalid(format!("line {line}: unknown status '{}'", field(2))))?;
        let deadline = match field(3) {
            "" => None,
            raw => Some(
                parse_date(raw).ok_or_else(|| invalid(format!("line {line}: invalid deadline '{raw}'")))?,
            ),
        };
        let progress = field(5)
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= 100)
            .ok_or_else(|| invalid(format!("line {line}: invalid progress '{}'", field(5))))?;

        records.push(ProjectRecord {
            id: RecordId(id),
            name: field(1).to_string(),
            status,
            deadline,
            owner: Some(field(4)).filter(|o| !o.is_empty()).map(str::to_string),
            progress,
        });
    }

    Ok(records)
}

/// Aligned plain-text table of the records.
pub fn to_txt(records: &[ProjectRecord]) -> String {
    if records.is_empty() {
        return "No projects to display.\n".to_string();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(Row::new(CSV_HEADER.iter().map(|h| Cell::new(h)).collect()));

    for record in records {
        let mut cells = fields(record);
        cells[5].push('%');
        table.add_row(Row::new(cells.iter().map(|c| Cell::new(c)).collect()));
    }

    table.to_string()
}
