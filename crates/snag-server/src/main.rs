//! Snagtrack HTTP server entry point.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use snag_config::SnagConfig;
use snag_db::service::SnagService;
use snag_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SnagConfig::load_with_dotenv().context("failed to load configuration")?;
    tracing::info!(db = %config.database.path, "opening database");

    let service = SnagService::new_local(&config.database.path)
        .await
        .context("failed to open database")?;

    let bind = config.server.bind.clone();
    let app = snag_server::build_router(AppState::new(service, config));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(%bind, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
