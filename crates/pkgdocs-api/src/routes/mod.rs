//! # Route Modules
//!
//! The site has a single page surface: everything that is not the index or
//! a health probe is a details URL. Details paths can contain any number of
//! segments and an `@version` in the middle, so they are dispatched from the
//! router fallback rather than from a wildcard route.

pub mod details;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Index and details routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(details::index))
        .fallback(details::serve_details)
}
