//! signbridge - HTTP server for text to sign-language translation.
//!
//! Settings come from `SIGNBRIDGE_*` env vars (see `signbridge::config`).
//! Models are downloaded from the HuggingFace Hub on first start.

use anyhow::{Context, Result};
use signbridge::api::{build_router, AppState};
use signbridge::{bootstrap, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "signbridge=info,sign_semantic_matcher=info,tower_http=debug".into()
            }),
        )
        .init();

    let settings = Settings::from_env().context("Invalid configuration")?;
    tracing::info!("Starting {} v{}", settings.app_name, settings.app_version);

    // Model download and vocabulary embedding block for a while
    let service = {
        let settings = settings.clone();
        tokio::task::spawn_blocking(move || bootstrap::build_service(&settings))
            .await
            .context("Service construction task panicked")??
    };

    let bind_addr = settings.bind_addr();
    let app = build_router(AppState::new(service, settings));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;
    tracing::info!("signbridge listening on {bind_addr}");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
