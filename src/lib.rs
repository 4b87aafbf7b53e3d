pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod services;
pub mod sheets;
pub mod state;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::models::StatusCatalog;
use crate::providers::OpenAiSummarizer;
use crate::services::{RecordService, RecordStore, StatusDigest, Summarizer};
use crate::sheets::{
    auth::ServiceAccountAuth, ServiceAccountKey, SheetTransport, SheetsClient, TokenSource,
};

/// Load configuration from environment variables
pub fn load_config() -> Result<Config> {
    Ok(Config::load()?)
}

/// Builds the HTTP router: the JSON API under `/api/v1` and the HTML
/// dashboard at the root.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route("/projects/refresh", post(handlers::refresh_projects))
        .route("/projects/export.csv", get(handlers::export_csv))
        .route("/projects/export.txt", get(handlers::export_txt))
        .route(
            "/projects/{id}",
            get(handlers::get_project).patch(handlers::update_project),
        )
        .route("/timeline", get(handlers::timeline))
        .route("/statuses", get(handlers::statuses))
        .route("/summary", get(handlers::summary));

    Router::new()
        .route("/", get(handlers::dashboard::index))
        .route("/projects", post(handlers::dashboard::submit_create))
        .route("/projects/{id}", post(handlers::dashboard::submit_update))
        .route("/refresh", post(handlers::dashboard::submit_refresh))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves how Sheets calls authenticate. The credentials file is read here,
/// once, and a bad file is a configuration error.
pub fn token_source(config: &Config) -> Result<TokenSource> {
    if let Some(token) = &config.sheets.access_token {
        return Ok(TokenSource::Static(token.clone()));
    }

    let path = config.sheets.credentials_path.as_ref().ok_or_else(|| {
        Error::Configuration(
            "either sheets.credentials_path or sheets.access_token must be set".to_string(),
        )
    })?;

    let key = ServiceAccountKey::from_file(path)?;
    tracing::info!(client_email = %key.client_email, "Loaded service account credentials");
    let auth = ServiceAccountAuth::new(key, Duration::from_secs(config.sheets.timeout_seconds.max(1)))?;
    Ok(TokenSource::ServiceAccount(auth))
}

/// Builds the application state around `transport` and performs the first
/// load. A failed first load is logged and left for the user to retry.
pub async fn build_state(
    config: &Config,
    transport: Arc<dyn SheetTransport>,
    summarizer: Option<Arc<dyn Summarizer>>,
) -> AppState {
    let catalog = StatusCatalog::new(config.statuses.clone());
    let mut service = RecordService::new(RecordStore::new(transport, catalog));

    if let Err(e) = service.refresh().await {
        tracing::warn!(error = %e, "Initial load failed; use refresh to retry");
    }

    AppState::new(service, StatusDigest::new(), summarizer)
}

/// Starts the server with the configured sheet and summarizer and runs until
/// Ctrl-C.
pub async fn run_api_server(config: Config) -> Result<()> {
    config.validate()?;

    let client = SheetsClient::new(&config.sheets, token_source(&config)?)?;

    let summarizer: Option<Arc<dyn Summarizer>> = match &config.summary.api_key {
        Some(key) => Some(Arc::new(OpenAiSummarizer::new(
            key,
            config.summary.base_url.as_deref(),
            &config.summary.model,
        )?
        .with_timeout(Duration::from_secs(config.summary.timeout_seconds.max(1))))),
        None => {
            tracing::info!("No summary API key configured; AI summaries disabled");
            None
        }
    };

    let state = build_state(&config, Arc::new(client), summarizer).await;
    let app = router(state);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| Error::Configuration(format!("cannot bind {}: {}", address, e)))?;

    tracing::info!(%address, "Project tracker listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutting down");
        })
        .await
        .map_err(|e| Error::Internal(format!("server error: {}", e)))
}
