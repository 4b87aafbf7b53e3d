use async_trait::async_trait;
use chrono::{Local, NaiveDate};

use crate::error::Result;
use crate::models::projects::ProjectRecord;
use crate::services::insights;

/// Produces a short natural-language status summary of a record set.
///
/// Implementations that call out to a remote service report failures as
/// `ExternalService` errors.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, records: &[ProjectRecord]) -> Result<String>;
}

/// Deterministic summary computed locally from the records.
#[derive(Debug, Clone, Default)]
pub struct StatusDigest {
    today: Option<NaiveDate>,
}

impl StatusDigest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins "today" instead of reading the local clock.
    pub fn on(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[async_trait]
impl Summarizer for StatusDigest {
    async fn summarize(&self, records: &[ProjectRecord]) -> Result<String> {
        Ok(insights::digest(records, self.today()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_status_digest_uses_pinned_date() {
        let digest = StatusDigest::on(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(digest.summarize(&[]).await.unwrap(), "No projects to summarize.");
        assert_eq!(digest.today(), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
