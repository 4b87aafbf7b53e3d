pub mod dashboard;
pub mod exports;
pub mod health;
pub mod insights;
pub mod projects;

pub use exports::*;
pub use health::*;
pub use insights::*;
pub use projects::*;
