//! Sheets v4 values API over reqwest.

use async_trait::async_trait;
use regex::Regex;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use super::{Column, SheetTransport, TokenSource};
use crate::config::SheetsConfig;
use crate::error::{Error, Result};

/// Upper bound on how much of an error body is echoed into messages.
const MAX_ERROR_BODY: usize = 300;

/// Captures the first row number of an A1 range such as `Sheet1!A7:E7`.
static RANGE_START_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"![A-Za-z]+(\d+)").expect("range pattern is valid")
});

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    range: Option<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    updates: AppendUpdates,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: String,
}

#[derive(Clone, Copy)]
enum Direction {
    Read,
    Write,
}

impl Direction {
    fn error(self, message: String) -> Error {
        match self {
            Direction::Read => Error::RemoteRead(message),
            Direction::Write => Error::RemoteWrite(message),
        }
    }
}

/// Client for one worksheet of one spreadsheet.
#[derive(Debug)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: Url,
    spreadsheet_id: String,
    worksheet: String,
    timeout: Duration,
    auth: TokenSource,
}

impl SheetsClient {
    pub fn new(config: &SheetsConfig, auth: TokenSource) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.max(1));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            Error::Configuration(format!(
                "invalid sheets.api_base_url '{}': {}",
                config.api_base_url, e
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "sheets.api_base_url '{}' cannot be used as a base URL",
                config.api_base_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet: config.worksheet.clone(),
            timeout,
            auth,
        })
    }

    /// Worksheet name as it must appear in A1 notation.
    fn quoted_worksheet(&self) -> String {
        if self.worksheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.worksheet.clone()
        } else {
            format!("'{}'", self.worksheet.replace('\'', "''"))
        }
    }

    fn columns_range(&self) -> String {
        format!(
            "{}!{}:{}",
            self.quoted_worksheet(),
            Column::first().letter(),
            Column::last().letter()
        )
    }

    fn cell_range(&self, row: u32, column: Column) -> String {
        format!("{}!{}{}", self.quoted_worksheet(), column.letter(), row)
    }

    /// `{base}/v4/spreadsheets/{id}/{tail...}`
    fn endpoint(&self, tail: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
                .extend(tail);
        }
        url
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        direction: Direction,
        action: &str,
    ) -> Result<reqwest::Response> {
        let token = self
            .auth
            .bearer()
            .await
            .map_err(|e| direction.error(format!("{action}: {e}")))?;

        let response = request
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    direction.error(format!("{action}: timed out after {:?}", self.timeout))
                } else {
                    direction.error(format!("{action}: {e}"))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Err(direction.error(format!("{action}: HTTP {}: {}", status.as_u16(), body)))
    }
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// First row number of an A1 range, if it names one.
pub fn range_start_row(range: &str) -> Option<u32> {
    RANGE_START_ROW
        .captures(range)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[async_trait]
impl SheetTransport for SheetsClient {
    async fn read_rows(&self) -> Result<Vec<Vec<String>>> {
        let mut url = self.endpoint(&["values", &self.columns_range()]);
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");

        let response = self
            .send(self.http.get(url), Direction::Read, "read rows")
            .await?;

        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| Error::RemoteRead(format!("read rows: unexpected response: {e}")))?;

        // The returned range may start below row 1 when leading rows are empty.
        let first_row = body
            .range
            .as_deref()
            .and_then(range_start_row)
            .unwrap_or(1);

        let mut rows: Vec<Vec<String>> = vec![Vec::new(); first_row.saturating_sub(1) as usize];
        rows.extend(
            body.values
                .into_iter()
                .map(|row| row.into_iter().map(cell_to_string).collect()),
        );

        tracing::debug!(rows = rows.len(), "Read worksheet rows");
        Ok(rows)
    }

    async fn append_row(&self, cells: Vec<String>) -> Result<u32> {
        let range = format!("{}:append", self.columns_range());
        let mut url = self.endpoint(&["values", &range]);
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let payload = serde_json::json!({
            "majorDimension": "ROWS",
            "values": [cells],
        });

        let response = self
            .send(self.http.post(url).json(&payload), Direction::Write, "append row")
            .await?;

        let body: AppendResponse = response
            .json()
            .await
            .map_err(|e| Error::RemoteWrite(format!("append row: unexpected response: {e}")))?;

        let row = range_start_row(&body.updates.updated_range).ok_or_else(|| {
            Error::RemoteWrite(format!(
                "append row: cannot determine row from range '{}'",
                body.updates.updated_range
            ))
        })?;

        tracing::debug!(row, "Appended worksheet row");
        Ok(row)
    }

    async fn write_cells(&self, row: u32, cells: Vec<(Column, String)>) -> Result<()> {
        if cells.is_empty() {
            return Ok(());
        }

        let url = self.endpoint(&["values:batchUpdate"]);
        let data: Vec<Value> = cells
            .into_iter()
            .map(|(column, value)| {
                serde_json::json!({
                    "range": self.cell_range(row, column),
                    "majorDimension": "ROWS",
                    "values": [[value]],
                })
            })
            .collect();

        let payload = serde_json::json!({
            "valueInputOption": "RAW",
            "data": data,
        });

        self.send(self.http.post(url).json(&payload), Direction::Write, "update cells")
            .await?;

        tracing::debug!(row, "Updated worksheet cells");
        Ok(())
    }
}
