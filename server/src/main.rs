//! Dogs API server. Configuration comes from the environment (and `.env`):
//! `APP_ENV`, `PORT`, `HOST`, `DOGS_STORE`, `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`.
//!
//! Run from repo root: `cargo run -p dogs-server`

use dogs_api::{build_state, serve, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("dogs_api=info,dogs_server=info,tower_http=info")
            }),
        )
        .init();

    tracing::info!(store = ?config.store, port = config.port, "starting");
    let state = build_state(&config).await?;
    serve(&config, state).await?;
    Ok(())
}
