use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use volley_centre::{Client, Config, MatchEngine, MatchResult, ScoreObserver};

/// Logs every score change
struct ScoreLogger;

#[async_trait]
impl ScoreObserver for ScoreLogger {
    async fn on_score(&self, engine: &MatchEngine, score: &MatchResult) -> Result<()> {
        info!("{}: {}", engine.match_centre_link(), score);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volley_centre=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting volley-centre");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    let match_url = std::env::args()
        .nth(1)
        .or_else(|| config.match_url.clone())
        .context("pass a match centre URL or set MATCH_URL")?;

    let client = Client::new(config).context("failed to create HTTP client")?;
    let engine = client
        .match_by_url(&match_url)
        .await
        .with_context(|| format!("failed to load match centre {match_url}"))?;

    let identity = engine.init().await;
    info!("Following match {:?} at {}", identity.match_id, identity.match_centre_link);

    let snapshot = engine.snapshot().await.context("failed to build snapshot")?;
    let json = serde_json::to_string_pretty(&snapshot.to_json()?)?;
    println!("{json}");

    engine.add_score_observer(Arc::new(ScoreLogger));
    info!("Score observer registered, waiting for changes");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    info!("Shutdown signal received");

    engine.shutdown().await;
    info!("Shutting down volley-centre");
    Ok(())
}
