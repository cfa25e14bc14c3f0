use anyhow::{Context, Result};
use faq_service::{api, config::Config, state::AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("faq_service=info".parse()?),
        )
        .init();

    info!("Starting FAQ service");

    let config = Config::from_env()?;
    let port = config.port;

    let state = AppState::from_config(config).await?;

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    api::serve(listener, state).await
}
