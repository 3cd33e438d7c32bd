pub mod api; // HTTP routes, error envelope, server lifecycle
pub mod config;
pub mod models;
pub mod pipeline; // Chat turn and image generation

use tracing_subscriber::EnvFilter;

use crate::api::{ApiContext, ServerError};
use crate::config::{AppConfig, ConfigError};
use crate::pipeline::upstream::UpstreamError;

/// Anything that stops the service from coming up or staying up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] UpstreamError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Load configuration, wire the pipelines and serve until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        e
    })?;
    tracing::info!(
        base_url = %config.base_url,
        bind = %config.bind_addr,
        schema_mode = ?config.schema_mode,
        origins = ?config.allowed_origins,
        "Configuration loaded"
    );

    let ctx = ApiContext::from_config(&config)?;
    api::serve_until(ctx, config.bind_addr, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl-C received, shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await
        }
    }
}
