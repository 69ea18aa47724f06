use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfmatch::{
    api::{create_router, AppState},
    config::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelfmatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    if config.openai_api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
        tracing::warn!("OPENAI_API_KEY is not set; submissions will fail with a configuration error");
    }

    tracing::info!(
        catalog = %config.catalog_path.display(),
        selection_model = %config.selection_model,
        reasoning_model = %config.reasoning_model,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config).context("Failed to initialize application state")?;
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
