use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use vidrec_api::api::{create_router, AppState};
use vidrec_api::config::Config;
use vidrec_api::services::embedding::FastEmbedder;
use vidrec_api::services::providers::youtube::YouTubeProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // The embedding model loads once here and is shared read-only
    let embedder = Arc::new(FastEmbedder::new()?);
    let provider = Arc::new(YouTubeProvider::new(
        config.youtube_api_key.clone(),
        config.youtube_api_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?);

    let state = AppState::new(provider, embedder);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
