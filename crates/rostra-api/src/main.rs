//! rostra-api service entry point.

use std::path::PathBuf;

use rostra_api::{Config, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rostra=debug".into()),
        )
        .init();

    // ROSTRA_API_CONFIG names a TOML file; without it, env vars alone.
    let config = match std::env::var("ROSTRA_API_CONFIG") {
        Ok(path) => Config::from_file(&PathBuf::from(path))?.with_env_overrides()?,
        Err(_) => Config::from_env()?,
    };

    tracing::info!("rostra-api starting");
    Server::new(config).run().await?;
    Ok(())
}
