//! # pkgdocs-api: Axum HTTP Binding
//!
//! Serves package, module and directory details pages over a pluggable
//! [`DataSource`](pkgdocs_frontend::DataSource) and
//! [`PageRenderer`](render::PageRenderer).
//!
//! ## Routes
//!
//! | Path                 | Handler                          |
//! |----------------------|----------------------------------|
//! | `/`                  | [`routes::details::index`]       |
//! | `/health/liveness`   | process liveness                 |
//! | `/health/readiness`  | data source reachability         |
//! | everything else      | [`routes::details::serve_details`] |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - No page logic in handlers; they resolve the path and delegate to
//!   `pkgdocs-frontend`.
//! - All errors map to rendered error pages via [`AppError`].

pub mod error;
pub mod render;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe. Always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 "ready" when the data source answers, 503
/// otherwise.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.ds.is_excluded(pkgdocs_core::stdlib::MODULE_PATH).await {
        Ok(_) => (StatusCode::OK, "ready").into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "data source unavailable").into_response()
        }
    }
}
