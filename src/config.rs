use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Settings file looked up in the working directory, extension optional.
const CONFIG_FILE: &str = "tracker";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub sheets: SheetsConfig,
    pub summary: SummaryConfig,
    #[serde(default = "default_statuses", skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<StatusDefinition>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Location of the remote spreadsheet and how to authenticate against it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub credentials_path: Option<PathBuf>,
    #[serde(skip_serializing, default)]
    pub access_token: Option<SecretString>,
    pub api_base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummaryConfig {
    #[serde(skip_serializing, default)]
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
}

/// One entry of the status catalog, with the progress it implies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusDefinition {
    pub name: String,
    pub progress: u8,
}

impl StatusDefinition {
    pub fn new(name: &str, progress: u8) -> Self {
        Self {
            name: name.to_string(),
            progress,
        }
    }
}

impl Config {
    /// Loads defaults, then the optional settings file (`tracker.toml` or
    /// any other format the `config` crate knows; `TRACKER_CONFIG` names a
    /// different file), then `TRACKER__*` environment variables.
    pub fn load() -> std::result::Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let path = std::env::var("TRACKER_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
        Self::load_with(config::File::with_name(&path).required(false))
    }

    /// Same as [`load`](Config::load) with `file` in place of the settings
    /// file.
    pub fn load_with<S>(file: S) -> std::result::Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        // The status list comes whole from the file or the serde default.
        let mut defaults = Self::default();
        defaults.statuses.clear();

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(file)
            // e.g., TRACKER__SHEETS__SPREADSHEET_ID="1AbC..."
            .add_source(
                config::Environment::with_prefix("TRACKER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Checks the settings the process cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.sheets.spreadsheet_id.trim().is_empty() {
            return Err(Error::Configuration(
                "sheets.spreadsheet_id must be set".to_string(),
            ));
        }

        if self.sheets.credentials_path.is_none() && self.sheets.access_token.is_none() {
            return Err(Error::Configuration(
                "either sheets.credentials_path or sheets.access_token must be set".to_string(),
            ));
        }

        if self.sheets.worksheet.trim().is_empty() {
            return Err(Error::Configuration("sheets.worksheet must not be empty".to_string()));
        }

        if self.statuses.is_empty() {
            return Err(Error::Configuration("at least one status must be configured".to_string()));
        }

        let mut seen = HashSet::new();
        for status in &self.statuses {
            let key = status.name.trim().to_lowercase();
            if key.is_empty() {
                return Err(Error::Configuration("status names must not be empty".to_string()));
            }
            if !seen.insert(key) {
                return Err(Error::Configuration(format!(
                    "status '{}' is configured more than once",
                    status.name
                )));
            }
            if status.progress > 100 {
                return Err(Error::Configuration(format!(
                    "status '{}' has progress {} (must be 0-100)",
                    status.name, status.progress
                )));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            sheets: SheetsConfig::default(),
            summary: SummaryConfig::default(),
            statuses: default_statuses(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            worksheet: "Sheet1".to_string(),
            credentials_path: None,
            access_token: None,
            api_base_url: "https://sheets.googleapis.com".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gpt-5-mini".to_string(),
            timeout_seconds: 30,
        }
    }
}

pub fn default_statuses() -> Vec<StatusDefinition> {
    vec![
        StatusDefinition::new("Not Started", 0),
        StatusDefinition::new("In Progress", 50),
        StatusDefinition::new("Blocked", 25),
        StatusDefinition::new("Completed", 100),
    ]
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets are skipped by serde
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}
