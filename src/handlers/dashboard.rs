//! Server-rendered dashboard
//!
//! A plain HTML view over the same service calls as the JSON API. Forms post
//! back here and redirect to the index; failures are rendered as a page with
//! the error message.

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::fmt::Write;

use crate::{
    error::{Error, ValidationErrors},
    models::{
        projects::{ProjectDraft, ProjectRecord, RecordId},
        requests::FilterQuery,
    },
    services::{Summarizer, insights},
    state::AppState,
    validation::validate_filter,
};

/// Form fields for both create and status update; all arrive as text.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectForm {
    pub name: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<String>,
    pub owner: Option<String>,
    pub progress: Option<String>,
}

impl ProjectForm {
    fn into_draft(self) -> Result<ProjectDraft, Error> {
        let progress = match self.progress.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                Error::Validation(ValidationErrors::single(
                    "progress",
                    format!("'{raw}' is not a number"),
                ))
            })?),
        };

        Ok(ProjectDraft {
            name: self.name,
            status: self.status,
            deadline: self.deadline,
            owner: self.owner,
            progress,
        })
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body></html>\n",
        escape_html(title),
        body
    )
}

fn error_page(error: Error) -> Response {
    let status = error.status_code();
    let mut body = format!("<h1>Something went wrong</h1>\n<p>{}</p>\n", escape_html(&error.to_string()));
    if matches!(error, Error::NotFound(_)) {
        body.push_str("<form method=\"post\" action=\"/refresh\"><button>Refresh</button></form>\n");
    }
    body.push_str("<p><a href=\"/\">Back to projects</a></p>");
    (status, Html(page("Project Tracker - error", &body))).into_response()
}

fn status_options(statuses: &[&str], selected: &str) -> String {
    statuses
        .iter()
        .map(|s| {
            let marker = if *s == selected { " selected" } else { "" };
            format!("<option{marker}>{}</option>", escape_html(s))
        })
        .collect()
}

fn render_record(out: &mut String, record: &ProjectRecord, statuses: &[&str]) {
    let _ = write!(
        out,
        "<section>\n<h3>{name}</h3>\n<p>Status: {status} | Deadline: {deadline} | Owner: {owner}</p>\n\
         <progress value=\"{progress}\" max=\"100\">{progress}%</progress> {progress}%\n\
         <form method=\"post\" action=\"/projects/{id}\">\
         <select name=\"status\">{options}</select> \
         <input name=\"progress\" type=\"number\" min=\"0\" max=\"100\" placeholder=\"{progress}\"> \
         <button>Update</button></form>\n</section>\n",
        name = escape_html(&record.name),
        status = escape_html(record.status.as_str()),
        deadline = record.deadline.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
        owner = escape_html(record.owner.as_deref().unwrap_or("-")),
        progress = record.progress,
        id = record.id,
        options = status_options(statuses, record.status.as_str()),
    );
}

/// GET /
///
/// Filter form, add form, one section per record, and the local digest.
pub async fn index(State(state): State<AppState>, Query(query): Query<FilterQuery>) -> Response {
    let service = state.records.lock().await;
    let filter = match validate_filter(&query, service.catalog()) {
        Ok(filter) => filter,
        Err(e) => return error_page(e),
    };
    let records = service.filter(&filter);
    let statuses = service.catalog().names();
    let export_query = serde_json::to_value(&query)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .map(|fields| {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in fields {
                if let Some(value) = value.as_str() {
                    serializer.append_pair(&key, value);
                }
            }
            serializer.finish()
        })
        .unwrap_or_default();

    let mut body = String::from("<h1>Project Tracker</h1>\n");

    let _ = write!(
        body,
        "<form method=\"get\" action=\"/\">Status: <input name=\"status\" value=\"{}\" placeholder=\"{}\"> \
         Owner: <input name=\"owner\" value=\"{}\"> <button>Filter</button></form>\n",
        escape_html(query.status.as_deref().unwrap_or("")),
        escape_html(&statuses.join(",")),
        escape_html(query.owner.as_deref().unwrap_or("")),
    );

    let _ = write!(
        body,
        "<details><summary>Add New Project</summary>\
         <form method=\"post\" action=\"/projects\">\
         <input name=\"name\" placeholder=\"Project name\" required> \
         <select name=\"status\">{}</select> \
         <input name=\"deadline\" type=\"date\"> \
         <input name=\"owner\" placeholder=\"Owner\"> \
         <button>Add Project</button></form></details>\n",
        status_options(&statuses, statuses.first().copied().unwrap_or("")),
    );

    if !service.skipped().is_empty() {
        let _ = write!(body, "<p>{} sheet row(s) could not be read.</p>\n", service.skipped().len());
    }

    if records.is_empty() {
        body.push_str("<p>No projects to display.</p>\n");
    } else {
        for record in &records {
            render_record(&mut body, record, &statuses);
        }
    }

    let digest = state.digest.summarize(service.records()).await.unwrap_or_default();
    let _ = write!(body, "<h2>Project Summary</h2>\n<p>{}</p>\n", escape_html(&digest));

    let upcoming = insights::timeline(service.records(), state.digest.today());
    if !upcoming.is_empty() {
        body.push_str("<h2>Timeline</h2>\n<ol>\n");
        for entry in upcoming {
            let _ = write!(
                body,
                "<li>{} - {} ({} day(s) left)</li>\n",
                entry.deadline,
                escape_html(&entry.name),
                entry.days_left
            );
        }
        body.push_str("</ol>\n");
    }

    let suffix = if export_query.is_empty() { String::new() } else { format!("?{export_query}") };
    let _ = write!(
        body,
        "<p><a href=\"/api/v1/projects/export.csv{0}\">Download CSV</a> | \
         <a href=\"/api/v1/projects/export.txt{0}\">Download TXT</a></p>\n\
         <form method=\"post\" action=\"/refresh\"><button>Refresh from sheet</button></form>",
        escape_html(&suffix)
    );

    Html(page("Project Tracker", &body)).into_response()
}

/// POST /projects
pub async fn submit_create(State(state): State<AppState>, Form(form): Form<ProjectForm>) -> Response {
    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(e) => return error_page(e),
    };
    let mut service = state.records.lock().await;
    match service.create(&draft).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => error_page(e),
    }
}

/// POST /projects/{id}
///
/// A status change without an explicit progress moves progress to the
/// status default.
pub async fn submit_update(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Form(form): Form<ProjectForm>,
) -> Response {
    let mut draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(e) => return error_page(e),
    };
    let mut service = state.records.lock().await;
    if draft.progress.is_none() {
        let catalog = service.catalog();
        draft.progress = draft
            .status
            .as_deref()
            .and_then(|status| catalog.resolve(status))
            .map(|status| i64::from(catalog.progress_for(&status)));
    }
    match service.update(RecordId(id), &draft).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => error_page(e),
    }
}

/// POST /refresh
pub async fn submit_refresh(State(state): State<AppState>) -> Response {
    let mut service = state.records.lock().await;
    match service.refresh().await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => error_page(e),
    }
}
