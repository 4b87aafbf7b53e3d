use tracing_subscriber::EnvFilter;
use tracker::{load_config, run_api_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tracker=info,tower_http=info")),
        )
        .init();

    let config = load_config()?;
    config.validate()?;

    // Secrets are skipped by the Display implementation
    tracing::info!("Loaded configuration:\n{}", config);

    run_api_server(config).await?;
    Ok(())
}
