//! # pkgdocs-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to a configurable port (default 8080)
//! and serves from an in-memory data source, optionally seeded from the
//! JSON fixtures named by `PKGDOCS_FIXTURES`.

use std::sync::Arc;

use anyhow::Context;

use pkgdocs_api::state::{AppConfig, AppState};
use pkgdocs_frontend::{Fixtures, InMemoryDataSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let ds = match &config.fixtures_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading fixtures {}", path.display()))?;
            let fixtures = Fixtures::from_json(&json)
                .with_context(|| format!("parsing fixtures {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                modules = fixtures.modules.len(),
                "loaded fixtures"
            );
            InMemoryDataSource::from_fixtures(fixtures)
        }
        None => {
            tracing::warn!("PKGDOCS_FIXTURES not set; serving from an empty data source");
            InMemoryDataSource::new()
        }
    };

    let port = config.port;
    let state = AppState::with_config(config, Arc::new(ds));
    let app = pkgdocs_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("pkgdocs listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
