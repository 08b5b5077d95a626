//! # Details Pages
//!
//! Dispatches a URL path to the package, module or directory page.
//!
//! | Path                  | Page                                       |
//! |-----------------------|--------------------------------------------|
//! | `/pkg/<path>`         | 301 to `/<path>`                           |
//! | `/mod/<module>[@v]`   | module details                             |
//! | `/std[@v]`            | standard library module details            |
//! | `/C`                  | 301 to the cgo documentation               |
//! | `/<path>[@v[/<sfx>]]` | package details, or directory when no package exists at the path |
//!
//! The `tab` query parameter selects the detail view. When it is repeated
//! the first value is used.

use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use pkgdocs_core::Version;
use pkgdocs_frontend::resolve::{CGO_DOC_URL, CGO_PACKAGE_PATH};
use pkgdocs_frontend::{
    directory_details_page, fetch_package_or_module, is_std_module_alias, module_details_page,
    package_details_page, parse_details_url_path, DetailsPage, FetchError, Namespace,
};

use crate::error::AppError;
use crate::state::AppState;

/// GET /: landing page.
pub async fn index(State(state): State<AppState>) -> Response {
    match state.renderer.render_index() {
        Ok(rendered) => rendered.into_response_with_status(StatusCode::OK),
        Err(err) => AppError::Internal(err.to_string()).render(state.renderer.as_ref()),
    }
}

/// GET /*: every path not claimed by another route.
pub async fn serve_details(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let path = uri.path();
    let tab = requested_tab(params);
    let tab = tab.as_deref();
    let result = if let Some(rest) = path.strip_prefix("/pkg/") {
        Ok(legacy_redirect(rest, uri.query()))
    } else if let Some(rest) = path.strip_prefix("/mod/") {
        serve_module(&state, rest, tab).await
    } else if is_std_module_alias(path) {
        serve_module(&state, path, tab).await
    } else {
        serve_package(&state, path, tab).await
    };

    result.unwrap_or_else(|err| err.render(state.renderer.as_ref()))
}

/// First `tab` value in the query string.
fn requested_tab(params: Vec<(String, String)>) -> Option<String> {
    params
        .into_iter()
        .find_map(|(key, value)| (key == "tab").then_some(value))
}

/// `/pkg/<path>` predates the current URL scheme.
fn legacy_redirect(rest: &str, query: Option<&str>) -> Response {
    let target = match query {
        Some(q) if !q.is_empty() => format!("/{rest}?{q}"),
        _ => format!("/{rest}"),
    };
    permanent_redirect(target)
}

/// 301 Moved Permanently. `Redirect::permanent` answers 308.
fn permanent_redirect(target: String) -> Response {
    tracing::debug!(%target, "permanent redirect");
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]).into_response()
}

/// Serve the module named by `url_path`.
async fn serve_module(
    state: &AppState,
    url_path: &str,
    tab: Option<&str>,
) -> Result<Response, AppError> {
    let resolved = parse_details_url_path(url_path)?;
    let module_path = resolved.package_path.as_str();
    let ds = state.ds.as_ref();

    let vi = fetch_package_or_module(
        ds,
        Namespace::Module,
        module_path,
        &resolved.version,
        |v| async move { ds.get_version_info(module_path, &v).await },
    )
    .await?;

    let page = module_details_page(state.details_context(), &vi, tab).await?;
    render_page(state, &page)
}

/// Serve the package at `url_path`, or the directory there if no package
/// exists.
async fn serve_package(
    state: &AppState,
    url_path: &str,
    tab: Option<&str>,
) -> Result<Response, AppError> {
    let resolved = parse_details_url_path(url_path)?;
    let pkg_path = resolved.package_path.as_str();
    if pkg_path == CGO_PACKAGE_PATH {
        return Ok(permanent_redirect(CGO_DOC_URL.to_string()));
    }

    let ds = state.ds.as_ref();
    let module = &resolved.module_path;
    let found = fetch_package_or_module(
        ds,
        Namespace::Package,
        pkg_path,
        &resolved.version,
        |v| async move {
            match module.known() {
                Some(module_path) => {
                    ds.get_package_in_module_version(pkg_path, module_path, &v)
                        .await
                }
                None => ds.get_package(pkg_path, &v).await,
            }
        },
    )
    .await;

    match found {
        Ok(pkg) => {
            let page = package_details_page(state.details_context(), &pkg, tab).await?;
            render_page(state, &page)
        }
        Err(FetchError::NotFound) => serve_directory(state, pkg_path, &resolved.version).await,
        Err(err) => Err(err.into()),
    }
}

/// Serve the directory view of `path`.
async fn serve_directory(
    state: &AppState,
    path: &str,
    version: &Version,
) -> Result<Response, AppError> {
    let ds = state.ds.as_ref();
    let dir = fetch_package_or_module(ds, Namespace::Package, path, version, |v| async move {
        ds.get_directory(path, &v).await
    })
    .await?;

    if dir.packages.is_empty() {
        return Err(AppError::NotFound);
    }
    let page = directory_details_page(state.details_context(), &dir).await?;
    render_page(state, &page)
}

fn render_page(state: &AppState, page: &DetailsPage) -> Result<Response, AppError> {
    let rendered = state
        .renderer
        .render_details(page)
        .map_err(|err| AppError::Internal(err.to_string()))?;
    Ok(rendered.into_response_with_status(StatusCode::OK))
}
