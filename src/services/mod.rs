pub mod export;
pub mod insights;
pub mod records;
pub mod store;
pub mod summary;

pub use records::RecordService;
pub use store::{RecordStore, SkippedRow};
pub use summary::{StatusDigest, Summarizer};
