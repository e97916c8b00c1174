//! Pulsia Planner - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the planning API.

use pulsia_planner::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulsia_planner=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: solver={}, explainer={}",
        config
            .planner
            .solver
            .endpoint
            .as_ref()
            .map(|u| u.as_str())
            .unwrap_or("(unset)"),
        config
            .planner
            .explainer
            .endpoint
            .as_ref()
            .map(|u| u.as_str())
            .unwrap_or("(local fallback)")
    );

    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", addr);

    api::serve(config).await?;

    Ok(())
}
