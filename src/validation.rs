//! Input validation for drafts and queries.
//!
//! Every function here collects all violated fields before failing, so a
//! caller can show each problem inline at once.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Result, ValidationErrors};
use crate::models::{
    projects::{NewProject, ProjectDraft, ProjectPatch, RecordFilter},
    requests::FilterQuery,
    status::{ProjectStatus, StatusCatalog},
};

/// Longest accepted project name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Date formats accepted from drafts and sheet cells, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parses a calendar date from user or sheet input.
///
/// Accepts ISO dates, a few common spreadsheet spellings, and date-times
/// (the time part is dropped).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn check_name(name: &str, errors: &mut ValidationErrors) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        errors.add("name", "Project name cannot be empty");
        return None;
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        errors.add(
            "name",
            format!("Project name must be at most {MAX_NAME_LENGTH} characters"),
        );
        return None;
    }
    if name.chars().any(|c| c.is_control()) {
        errors.add("name", "Project name cannot contain control characters");
        return None;
    }
    Some(name.to_string())
}

fn check_status(
    status: &str,
    catalog: &StatusCatalog,
    errors: &mut ValidationErrors,
) -> Option<ProjectStatus> {
    let resolved = catalog.resolve(status);
    if resolved.is_none() {
        errors.add(
            "status",
            format!(
                "Unknown status '{}'; expected one of: {}",
                status.trim(),
                catalog.names().join(", ")
            ),
        );
    }
    resolved
}

/// `Some(None)` for an empty value (clear), `None` when unparseable.
fn check_deadline(value: &str, errors: &mut ValidationErrors) -> Option<Option<NaiveDate>> {
    if value.trim().is_empty() {
        return Some(None);
    }
    match parse_date(value) {
        Some(date) => Some(Some(date)),
        None => {
            errors.add("deadline", format!("'{}' is not a valid date (use YYYY-MM-DD)", value.trim()));
            None
        }
    }
}

fn check_progress(value: i64, errors: &mut ValidationErrors) -> Option<u8> {
    match u8::try_from(value) {
        Ok(progress) if progress <= 100 => Some(progress),
        _ => {
            errors.add("progress", "Progress must be between 0 and 100");
            None
        }
    }
}

/// `Some(None)` for an empty value (clear), `None` when rejected.
fn check_owner(owner: &str, errors: &mut ValidationErrors) -> Option<Option<String>> {
    let owner = owner.trim();
    if owner.is_empty() {
        return Some(None);
    }
    if owner.chars().any(|c| c.is_control()) {
        errors.add("owner", "Owner cannot contain control characters");
        return None;
    }
    Some(Some(owner.to_string()))
}

/// Validates a draft for creation.
///
/// `name` is required. A missing status falls back to the catalog default
/// and a missing progress is derived from the status.
pub fn validate_new_project(draft: &ProjectDraft, catalog: &StatusCatalog) -> Result<NewProject> {
    let mut errors = ValidationErrors::new();

    let name = match &draft.name {
        Some(name) => check_name(name, &mut errors),
        None => {
            errors.add("name", "Project name is required");
            None
        }
    };

    let status = match &draft.status {
        Some(status) => check_status(status, catalog, &mut errors),
        None => {
            let fallback = catalog.default_status();
            if fallback.is_none() {
                errors.add("status", "No statuses are configured");
            }
            fallback
        }
    };

    let deadline = draft
        .deadline
        .as_deref()
        .map(|d| check_deadline(d, &mut errors))
        .unwrap_or(Some(None));

    let progress = draft.progress.map(|p| check_progress(p, &mut errors));

    let owner = draft
        .owner
        .as_deref()
        .and_then(|o| check_owner(o, &mut errors))
        .flatten();

    errors.into_result()?;

    // All checks passed, so every slot holds a value.
    match (name, status, deadline) {
        (Some(name), Some(status), Some(deadline)) => {
            let progress = progress
                .flatten()
                .unwrap_or_else(|| catalog.progress_for(&status));
            Ok(NewProject {
                name,
                status,
                deadline,
                owner,
                progress,
            })
        }
        _ => Err(crate::error::Error::Internal(
            "draft validation produced no value".to_string(),
        )),
    }
}

/// Validates a draft for a partial update. Only supplied fields are checked.
pub fn validate_patch(draft: &ProjectDraft, catalog: &StatusCatalog) -> Result<ProjectPatch> {
    let mut errors = ValidationErrors::new();

    let patch = ProjectPatch {
        name: draft.name.as_deref().and_then(|n| check_name(n, &mut errors)),
        status: draft
            .status
            .as_deref()
            .and_then(|s| check_status(s, catalog, &mut errors)),
        deadline: draft
            .deadline
            .as_deref()
            .and_then(|d| check_deadline(d, &mut errors)),
        owner: draft.owner.as_deref().and_then(|o| check_owner(o, &mut errors)),
        progress: draft.progress.and_then(|p| check_progress(p, &mut errors)),
    };

    errors.into_result()?;

    if patch.is_empty() {
        return Err(crate::error::Error::Validation(ValidationErrors::single(
            "draft",
            "At least one field must be supplied",
        )));
    }

    Ok(patch)
}

/// Turns raw query parameters into a typed filter.
pub fn validate_filter(query: &FilterQuery, catalog: &StatusCatalog) -> Result<RecordFilter> {
    let mut errors = ValidationErrors::new();

    let statuses = query
        .status
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .filter(|s| !s.trim().is_empty())
                .filter_map(|s| check_status(s, catalog, &mut errors))
                .collect()
        })
        .unwrap_or_default();

    let mut bound = |field: &str, value: &Option<String>| {
        value.as_deref().filter(|v| !v.trim().is_empty()).and_then(|v| {
            let parsed = parse_date(v);
            if parsed.is_none() {
                errors.add(field, format!("'{}' is not a valid date", v.trim()));
            }
            parsed
        })
    };
    let deadline_from = bound("deadline_from", &query.deadline_from);
    let deadline_to = bound("deadline_to", &query.deadline_to);

    let owner = query
        .owner
        .as_deref()
        .and_then(|o| check_owner(o, &mut errors))
        .flatten();

    errors.into_result()?;

    Ok(RecordFilter {
        statuses,
        owner,
        deadline_from,
        deadline_to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn catalog() -> StatusCatalog {
        StatusCatalog::default()
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 5, 1);
        assert_eq!(parse_date("2026-05-01"), expected);
        assert_eq!(parse_date(" 2026/05/01 "), expected);
        assert_eq!(parse_date("05/01/2026"), expected);
        assert_eq!(parse_date("2026-05-01 00:00:00"), expected);
        assert_eq!(parse_date("2026-02-30"), None);
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn test_new_project_defaults() {
        let project = validate_new_project(&ProjectDraft::named("  Website  "), &catalog()).unwrap();
        assert_eq!(project.name, "Website");
        assert_eq!(project.status, "Not Started");
        assert_eq!(project.progress, 0);
        assert_eq!(project.deadline, None);
        assert_eq!(project.owner, None);
    }

    #[test]
    fn test_new_project_progress_derived_from_status() {
        let draft = ProjectDraft::named("Launch").with_status("completed");
        let project = validate_new_project(&draft, &catalog()).unwrap();
        assert_eq!(project.status, "Completed");
        assert_eq!(project.progress, 100);
    }

    #[test]
    fn test_new_project_explicit_progress_wins() {
        let draft = ProjectDraft::named("Launch").with_status("In Progress").with_progress(40);
        let project = validate_new_project(&draft, &catalog()).unwrap();
        assert_eq!(project.progress, 40);
    }

    #[test]
    fn test_new_project_lists_every_violated_field() {
        let draft = ProjectDraft::named("   ")
            .with_status("Done-ish")
            .with_deadline("tomorrow")
            .with_progress(101);

        match validate_new_project(&draft, &catalog()) {
            Err(Error::Validation(errors)) => {
                assert_eq!(
                    errors.fields().collect::<Vec<_>>(),
                    vec!["name", "status", "deadline", "progress"]
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_new_project_requires_name() {
        let draft = ProjectDraft::default();
        match validate_new_project(&draft, &catalog()) {
            Err(Error::Validation(errors)) => assert!(errors.contains("name")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_patch_empty_strings_clear_optional_fields() {
        let draft = ProjectDraft {
            deadline: Some(String::new()),
            owner: Some("  ".to_string()),
            ..ProjectDraft::default()
        };
        let patch = validate_patch(&draft, &catalog()).unwrap();
        assert_eq!(patch.deadline, Some(None));
        assert_eq!(patch.owner, Some(None));
        assert_eq!(patch.name, None);
    }

    #[test]
    fn test_owner_with_control_characters_rejected() {
        let draft = ProjectDraft::named("Launch").with_owner("ana\u{7}");
        match validate_new_project(&draft, &catalog()) {
            Err(Error::Validation(errors)) => assert!(errors.contains("owner")),
            other => panic!("expected validation error, got {other:?}"),
        }

        let patch = ProjectDraft {
            owner: Some("lee\nkim".to_string()),
            ..ProjectDraft::default()
        };
        assert!(matches!(validate_patch(&patch, &catalog()), Err(Error::Validation(_))));

        let query = FilterQuery {
            owner: Some("\u{1b}ana".to_string()),
            ..FilterQuery::default()
        };
        assert!(matches!(validate_filter(&query, &catalog()), Err(Error::Validation(_))));
    }

    #[test]
    fn test_patch_rejects_bad_status_and_negative_progress() {
        let draft = ProjectDraft {
            status: Some("Archived".to_string()),
            progress: Some(-1),
            ..ProjectDraft::default()
        };
        match validate_patch(&draft, &catalog()) {
            Err(Error::Validation(errors)) => {
                assert!(errors.contains("status"));
                assert!(errors.contains("progress"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_patch_requires_some_field() {
        assert!(matches!(
            validate_patch(&ProjectDraft::default(), &catalog()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_filter_parses_status_list() {
        let query = FilterQuery {
            status: Some("completed, Blocked".to_string()),
            ..FilterQuery::default()
        };
        let filter = validate_filter(&query, &catalog()).unwrap();
        assert_eq!(filter.statuses.len(), 2);
        assert_eq!(filter.statuses[0], "Completed");
    }

    #[test]
    fn test_filter_rejects_unknown_status_and_bad_date() {
        let query = FilterQuery {
            status: Some("Nope".to_string()),
            deadline_to: Some("31-31-2026".to_string()),
            ..FilterQuery::default()
        };
        match validate_filter(&query, &catalog()) {
            Err(Error::Validation(errors)) => {
                assert!(errors.contains("status"));
                assert!(errors.contains("deadline_to"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
