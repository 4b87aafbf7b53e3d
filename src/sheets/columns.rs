use crate::models::{
    projects::{NewProject, ProjectPatch, ProjectRecord, RecordId},
    status::StatusCatalog,
};
use crate::validation::parse_date;

/// The fixed column layout of the worksheet, used for reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Status,
    Deadline,
    Owner,
    Progress,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Name,
        Column::Status,
        Column::Deadline,
        Column::Owner,
        Column::Progress,
    ];

    pub fn index(self) -> usize {
        match self {
            Column::Name => 0,
            Column::Status => 1,
            Column::Deadline => 2,
            Column::Owner => 3,
            Column::Progress => 4,
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Status => "Status",
            Column::Deadline => "Deadline",
            Column::Owner => "Owner",
            Column::Progress => "Progress",
        }
    }

    /// A1-notation column letter.
    pub fn letter(self) -> char {
        (b'A' + self.index() as u8) as char
    }

    pub fn first() -> Column {
        Column::ALL[0]
    }

    pub fn last() -> Column {
        Column::ALL[Column::ALL.len() - 1]
    }
}

pub fn header_row() -> Vec<String> {
    Column::ALL.iter().map(|c| c.header().to_string()).collect()
}

/// True when the first row carries the expected headers (case-insensitive).
pub fn is_expected_header(row: &[String]) -> bool {
    Column::ALL.iter().all(|column| {
        row.get(column.index())
            .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(column.header()))
    })
}

pub fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

pub fn encode_new(project: &NewProject) -> Vec<String> {
    let mut cells = vec![String::new(); Column::ALL.len()];
    cells[Column::Name.index()] = project.name.clone();
    cells[Column::Status.index()] = project.status.to_string();
    cells[Column::Deadline.index()] = format_date(project.deadline);
    cells[Column::Owner.index()] = project.owner.clone().unwrap_or_default();
    cells[Column::Progress.index()] = project.progress.to_string();
    cells
}

/// Cells to overwrite for a partial update; untouched fields are omitted.
pub fn encode_patch(patch: &ProjectPatch) -> Vec<(Column, String)> {
    let mut cells = Vec::new();
    if let Some(name) = &patch.name {
        cells.push((Column::Name, name.clone()));
    }
    if let Some(status) = &patch.status {
        cells.push((Column::Status, status.to_string()));
    }
    if let Some(deadline) = patch.deadline {
        cells.push((Column::Deadline, format_date(deadline)));
    }
    if let Some(owner) = &patch.owner {
        cells.push((Column::Owner, owner.clone().unwrap_or_default()));
    }
    if let Some(progress) = patch.progress {
        cells.push((Column::Progress, progress.to_string()));
    }
    cells
}

fn parse_progress(value: &str) -> Option<u8> {
    let value = value.trim().trim_end_matches('%').trim();
    let parsed = value
        .parse::<u8>()
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|f| f.fract() == 0.0 && (0.0..=100.0).contains(f))
                .map(|f| f as u8)
        })?;
    (parsed <= 100).then_some(parsed)
}

/// Parses one data row. The error is a human-readable reason for skipping it.
pub fn decode_row(
    id: RecordId,
    row: &[String],
    catalog: &StatusCatalog,
) -> std::result::Result<ProjectRecord, String> {
    let cell = |column: Column| row.get(column.index()).map(|c| c.trim()).unwrap_or("");

    let name = cell(Column::Name);
    if name.is_empty() {
        return Err("missing project name".to_string());
    }

    let raw_status = cell(Column::Status);
    let status = catalog
        .resolve(raw_status)
        .ok_or_else(|| format!("unknown status '{raw_status}'"))?;

    let raw_deadline = cell(Column::Deadline);
    let deadline = if raw_deadline.is_empty() {
        None
    } else {
        Some(parse_date(raw_deadline).ok_or_else(|| format!("invalid deadline '{raw_deadline}'"))?)
    };

    let raw_progress = cell(Column::Progress);
    let progress = if raw_progress.is_empty() {
        catalog.progress_for(&status)
    } else {
        parse_progress(raw_progress).ok_or_else(|| format!("invalid progress '{raw_progress}'"))?
    };

    let owner = cell(Column::Owner);

    Ok(ProjectRecord {
        id,
        name: name.to_string(),
        status,
        deadline,
        owner: (!owner.is_empty()).then(|| owner.to_string()),
        progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(Column::first().letter(), 'A');
        assert_eq!(Column::last().letter(), 'E');
        assert_eq!(Column::Owner.letter(), 'D');
    }

    #[test]
    fn test_header_detection() {
        assert!(is_expected_header(&header_row()));
        assert!(is_expected_header(&row(&["name", "STATUS", "Deadline", "Owner", "progress"])));
        assert!(!is_expected_header(&row(&["Project Name", "Description", "Status"])));
    }

    #[test]
    fn test_decode_full_row() {
        let catalog = StatusCatalog::default();
        let record = decode_row(
            RecordId(3),
            &row(&["Migration", "in progress", "2026-11-02", "sam", "40%"]),
            &catalog,
        )
        .unwrap();

        assert_eq!(record.id, RecordId(3));
        assert_eq!(record.status, "In Progress");
        assert_eq!(record.deadline, NaiveDate::from_ymd_opt(2026, 11, 2));
        assert_eq!(record.owner.as_deref(), Some("sam"));
        assert_eq!(record.progress, 40);
    }

    #[test]
    fn test_decode_short_row_derives_progress() {
        let catalog = StatusCatalog::default();
        let record = decode_row(RecordId(1), &row(&["Audit", "Completed"]), &catalog).unwrap();
        assert_eq!(record.progress, 100);
        assert_eq!(record.deadline, None);
        assert_eq!(record.owner, None);
    }

    #[test]
    fn test_decode_rejects_bad_rows() {
        let catalog = StatusCatalog::default();
        assert!(decode_row(RecordId(1), &row(&["", "Completed"]), &catalog).is_err());
        assert!(decode_row(RecordId(1), &row(&["X", "Paused"]), &catalog).is_err());
        assert!(decode_row(RecordId(1), &row(&["X", "Blocked", "someday"]), &catalog).is_err());
        assert!(decode_row(RecordId(1), &row(&["X", "Blocked", "", "", "150"]), &catalog).is_err());
    }

    #[test]
    fn test_encode_patch_only_supplied_cells() {
        let patch = ProjectPatch {
            owner: Some(None),
            progress: Some(70),
            ..ProjectPatch::default()
        };
        assert_eq!(
            encode_patch(&patch),
            vec![(Column::Owner, String::new()), (Column::Progress, "70".to_string())]
        );
    }
}
