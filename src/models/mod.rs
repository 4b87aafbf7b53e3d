pub mod projects;
pub mod requests;
pub mod status;

pub use projects::{NewProject, ProjectDraft, ProjectPatch, ProjectRecord, RecordFilter, RecordId};
pub use status::{ProjectStatus, StatusCatalog};
