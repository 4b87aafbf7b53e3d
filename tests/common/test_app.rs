use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, redirect::Policy};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracker::{
    build_state, router,
    error::{Error, Result},
    models::ProjectRecord,
    services::{StatusDigest, Summarizer},
    sheets::{InMemorySheet, columns},
    Config,
};

/// Summarizer double that returns a fixed reply or fails.
pub struct StubSummarizer {
    reply: Option<String>,
}

impl StubSummarizer {
    pub fn replying(text: &str) -> Arc<dyn Summarizer> {
        Arc::new(Self {
            reply: Some(text.to_string()),
        })
    }

    pub fn failing() -> Arc<dyn Summarizer> {
        Arc::new(Self { reply: None })
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, records: &[ProjectRecord]) -> Result<String> {
        match &self.reply {
            Some(text) => Ok(format!("{text} ({} records)", records.len())),
            None => Err(Error::ExternalService("model unavailable".to_string())),
        }
    }
}

/// Options for building a [`TestApp`]
pub struct TestAppOptions {
    /// Data rows below the header row
    pub rows: Vec<Vec<String>>,
    /// Summarizer to install, if any
    pub summarizer: Option<Arc<dyn Summarizer>>,
    /// Date used as "today" by date-relative views
    pub today: NaiveDate,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            summarizer: None,
            today: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        }
    }
}

impl TestAppOptions {
    pub fn with_rows(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
            ..Self::default()
        }
    }

    pub fn summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }
}

/// HTTP test application wrapper
///
/// Serves the full router on a random port, backed by an in-memory sheet
/// the test can inspect.
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    /// HTTP client for making requests (does not follow redirects)
    pub client: Client,
    /// The worksheet behind the store
    pub sheet: Arc<InMemorySheet>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::new_with_options(TestAppOptions::default()).await
    }

    pub async fn new_with_options(options: TestAppOptions) -> Self {
        let mut rows = vec![columns::header_row()];
        rows.extend(options.rows);
        let sheet = Arc::new(InMemorySheet::with_rows(rows));

        let mut state = build_state(&Config::default(), sheet.clone(), options.summarizer).await;
        state.digest = StatusDigest::on(options.today);

        let app = router(state);

        // Bind to random port (port 0 tells OS to assign available port)
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            address,
            client,
            sheet,
        }
    }

    /// Get the full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get_json(&self, path: &str) -> (u16, serde_json::Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> (u16, serde_json::Value) {
        let response = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    pub async fn patch_json(&self, path: &str, body: serde_json::Value) -> (u16, serde_json::Value) {
        let response = self.client.patch(self.url(path)).json(&body).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    /// Posts an urlencoded form, as the dashboard does.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> reqwest::Response {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.client
            .post(self.url(path))
            .header("content-type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .unwrap()
    }
}
