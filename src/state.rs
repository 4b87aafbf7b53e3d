use crate::services::{RecordService, StatusDigest, Summarizer};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared across all HTTP handlers
///
/// The record service sits behind a mutex, so interactions are handled one
/// at a time and each performs at most one remote store operation.
#[derive(Clone)]
pub struct AppState {
    /// Validation and query surface over the worksheet snapshot
    pub records: Arc<Mutex<RecordService>>,
    /// Local digest; also the source of "today" for date-relative views
    pub digest: StatusDigest,
    /// Optional text-generation summarizer
    pub summarizer: Option<Arc<dyn Summarizer>>,
}

impl AppState {
    /// Create a new AppState instance
    ///
    /// # Arguments
    /// * `records` - Record service, already loaded or not
    /// * `digest` - Local status digest
    /// * `summarizer` - External summarizer, if one is configured
    pub fn new(
        records: RecordService,
        digest: StatusDigest,
        summarizer: Option<Arc<dyn Summarizer>>,
    ) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            digest,
            summarizer,
        }
    }
}
