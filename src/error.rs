use thiserror::Error;
use indexmap::IndexMap;
use serde::{Serialize, Deserialize};

use std::fmt;

// Import Axum types for HTTP response conversion
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Field-level validation failures, in the order they were detected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: IndexMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Records a failure for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Turns the collected failures into a result.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad input; the operation was not attempted.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// A record id that is not in the current snapshot.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Reading from the remote sheet failed (transport, auth, timeout).
    #[error("Remote read failed: {0}")]
    RemoteRead(String),

    /// Writing to the remote sheet failed (transport, auth, timeout).
    #[error("Remote write failed: {0}")]
    RemoteWrite(String),

    /// Missing or unusable startup configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A configuration source could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// An external collaborator (text generation) failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// An internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable machine-readable code, also used in HTTP bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::RemoteRead(_) => "REMOTE_READ_ERROR",
            Error::RemoteWrite(_) => "REMOTE_WRITE_ERROR",
            Error::Configuration(_) | Error::Config(_) => "CONFIG_ERROR",
            Error::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::RemoteRead(_) | Error::RemoteWrite(_) | Error::ExternalService(_) => {
                StatusCode::BAD_GATEWAY
            }
            Error::Configuration(_) | Error::Config(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Convert custom Error to HTTP response
///
/// The view layer only renders these; it never interprets them.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let body = match &self {
            Error::Validation(errors) => serde_json::json!({
                "error": "Validation failed",
                "code": code,
                "fields": errors,
            }),
            Error::Configuration(_) | Error::Config(_) => serde_json::json!({
                "error": "Configuration error",
                "code": code,
            }),
            Error::NotFound(msg)
            | Error::RemoteRead(msg)
            | Error::RemoteWrite(msg)
            | Error::ExternalService(msg)
            | Error::Internal(msg) => serde_json::json!({
                "error": msg,
                "code": code,
            }),
        };

        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            tracing::error!(code, error = %self, "Request failed");
        }

        (status, Json(body)).into_response()
    }
}
