//! OpenAI-backed project summaries

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai::Client;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::projects::ProjectRecord;
use crate::services::{export, summary::Summarizer};

const PREAMBLE: &str = "You write status updates for an internal project tracker. \
Given a table of projects, reply with two or three plain sentences: what is in \
progress, what is blocked or overdue, and what is due soon. No lists, no markdown.";

/// Summarizer that asks an OpenAI-compatible model.
pub struct OpenAiSummarizer {
    client: Client,
    model: String,
    timeout: Duration,
}

impl fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("client", &"<OpenAI Client>")
            .finish()
    }
}

impl OpenAiSummarizer {
    /// Create a new summarizer; `base_url` points at an OpenAI-compatible API.
    pub fn new(api_key: &SecretString, base_url: Option<&str>, model: &str) -> Result<Self> {
        let client = if let Some(url) = base_url {
            tracing::info!(base_url = %url, "Creating OpenAI summarizer with custom base URL");
            Client::builder()
                .api_key(api_key.expose_secret())
                .base_url(url)
                .build()
                .map_err(|e| Error::Configuration(format!("failed to create OpenAI client: {}", e)))?
        } else {
            tracing::info!("Creating OpenAI summarizer with default base URL");
            Client::new(api_key.expose_secret())
                .map_err(|e| Error::Configuration(format!("failed to create OpenAI client: {}", e)))?
        };

        Ok(Self {
            client,
            model: model.to_string(),
            timeout: Duration::from_secs(60),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// The user message sent with each request.
pub fn build_prompt(records: &[ProjectRecord]) -> String {
    format!(
        "Summarize the current state of these {} project(s):\n\n{}",
        records.len(),
        export::to_txt(records)
    )
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, records: &[ProjectRecord]) -> Result<String> {
        let agent = self.client.agent(&self.model).preamble(PREAMBLE).build();
        let prompt = build_prompt(records);

        tracing::debug!(model = %self.model, records = records.len(), "Requesting AI summary");

        let reply = tokio::time::timeout(self.timeout, agent.prompt(prompt))
            .await
            .map_err(|_| Error::ExternalService(format!("summary timed out after {:?}", self.timeout)))?
            .map_err(|e| Error::ExternalService(format!("summary request failed: {}", e)))?;

        Ok(reply.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarizer_creation() {
        let api_key = SecretString::new("test-key".to_string().into());
        let summarizer = OpenAiSummarizer::new(&api_key, None, "gpt-5-mini").unwrap();
        assert_eq!(summarizer.model(), "gpt-5-mini");
    }

    #[test]
    fn test_summarizer_with_custom_base_url() {
        let api_key = SecretString::new("test-key".to_string().into());
        let summarizer =
            OpenAiSummarizer::new(&api_key, Some("https://llm.internal.example/v1"), "small").unwrap();
        assert!(format!("{:?}", summarizer).contains("small"));
    }

    #[test]
    fn test_prompt_lists_records() {
        assert!(build_prompt(&[]).contains("0 project(s)"));
    }
}
