//! # Integration Tests for pkgdocs-api
//!
//! Drives the full router over an in-memory data source seeded from JSON
//! fixtures: path dispatch, tab defaulting, redistributability gating,
//! the latest-version fallback and error status mapping.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use pkgdocs_api::render::{PageRenderer, RenderError, Rendered};
use pkgdocs_api::state::{AppConfig, AppState};
use pkgdocs_frontend::{DetailsPage, ErrorPage, Fixtures, InMemoryDataSource};

const FIXTURES: &str = r##"{
  "modules": [
    {
      "module_path": "github.com/acme/kit",
      "version": "v1.0.0",
      "commit_time": "2019-01-30T00:00:00Z",
      "repository_url": "https://github.com/acme/kit",
      "packages": [
        {
          "path": "github.com/acme/kit",
          "name": "kit",
          "synopsis": "Package kit is a toolkit.",
          "licenses": [{"type": "MIT", "file_path": "LICENSE"}],
          "documentation_html": "<p>kit docs</p>",
          "imports": ["fmt"]
        }
      ],
      "licenses": [{"type": "MIT", "file_path": "LICENSE", "contents": "MIT License"}]
    },
    {
      "module_path": "github.com/acme/kit",
      "version": "v1.1.0",
      "commit_time": "2019-03-01T00:00:00Z",
      "repository_url": "https://github.com/acme/kit",
      "readme_file_path": "README.md",
      "readme_contents": "# kit",
      "packages": [
        {
          "path": "github.com/acme/kit",
          "name": "kit",
          "licenses": [{"type": "MIT", "file_path": "LICENSE"}],
          "documentation_html": "<p>kit docs</p>",
          "imports": ["fmt", "github.com/acme/kit/sub/pkg"]
        },
        {
          "path": "github.com/acme/kit/sub/pkg",
          "name": "pkg",
          "licenses": [{"type": "MIT", "file_path": "LICENSE"}]
        }
      ],
      "licenses": [{"type": "MIT", "file_path": "LICENSE", "contents": "MIT License"}]
    },
    {
      "module_path": "github.com/closed/lib",
      "version": "v0.1.0",
      "commit_time": "2019-01-30T00:00:00Z",
      "packages": [
        {
          "path": "github.com/closed/lib",
          "name": "lib",
          "licenses": [{"type": "Proprietary", "file_path": "LICENSE"}],
          "documentation_html": "<p>secret sauce</p>"
        }
      ],
      "licenses": [{"type": "Proprietary", "file_path": "LICENSE", "contents": "All rights reserved"}]
    },
    {
      "module_path": "github.com/secret/thing",
      "version": "v1.0.0",
      "commit_time": "2019-01-30T00:00:00Z",
      "packages": [
        {
          "path": "github.com/secret/thing",
          "name": "thing",
          "licenses": [{"type": "MIT", "file_path": "LICENSE"}]
        }
      ]
    },
    {
      "module_path": "std",
      "version": "v1.13.0",
      "commit_time": "2019-09-03T00:00:00Z",
      "packages": [
        {
          "path": "fmt",
          "name": "fmt",
          "licenses": [{"type": "BSD-3-Clause", "file_path": "LICENSE"}]
        },
        {
          "path": "net/http",
          "name": "http",
          "licenses": [{"type": "BSD-3-Clause", "file_path": "LICENSE"}]
        }
      ],
      "licenses": [{"type": "BSD-3-Clause", "file_path": "LICENSE", "contents": "BSD"}]
    }
  ],
  "excluded": ["github.com/secret"]
}"##;

fn data_source() -> InMemoryDataSource {
    InMemoryDataSource::from_fixtures(Fixtures::from_json(FIXTURES).unwrap())
}

/// Helper: build the test app over the fixtures with default configuration.
fn test_app() -> axum::Router {
    pkgdocs_api::app(AppState::new(Arc::new(data_source())))
}

/// Helper: build the test app with a custom configuration.
fn test_app_with_config(config: AppConfig) -> axum::Router {
    pkgdocs_api::app(AppState::with_config(config, Arc::new(data_source())))
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

async fn get(app: axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = get(test_app(), "/health/liveness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let response = get(test_app(), "/health/readiness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Index --------------------------------------------------------------------

#[tokio::test]
async fn test_index_page() {
    let response = get(test_app(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let json = body_json(response).await;
    assert_eq!(json["template"], "index.tmpl");
}

// -- Package Pages ------------------------------------------------------------

#[tokio::test]
async fn test_package_defaults_to_doc_tab() {
    let response = get(test_app(), "/github.com/acme/kit").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["template"], "pkg_doc.tmpl");

    let page = &json["page"];
    assert_eq!(page["title"], "Package kit");
    assert_eq!(page["settings"]["name"], "doc");
    assert_eq!(page["can_show_details"], true);
    assert_eq!(page["details"]["kind"], "documentation");
    assert_eq!(page["details"]["documentation_html"], "<p>kit docs</p>");
    assert_eq!(page["header"]["kind"], "package");
    assert_eq!(page["header"]["suffix"], "kit (root)");
    assert_eq!(page["header"]["module"]["version"], "v1.1.0");
    assert_eq!(page["namespace"], "pkg");
    assert_eq!(page["tabs"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_unknown_tab_falls_back_to_default() {
    let response = get(test_app(), "/github.com/acme/kit?tab=bogus").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"]["settings"]["name"], "doc");
}

#[tokio::test]
async fn test_repeated_tab_uses_first_value() {
    let response = get(test_app(), "/github.com/acme/kit?tab=versions&tab=doc").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"]["settings"]["name"], "versions");

    let response = get(test_app(), "/github.com/acme/kit?tab=doc&tab=versions").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"]["settings"]["name"], "doc");
}

#[tokio::test]
async fn test_specific_version_with_suffix() {
    let response = get(test_app(), "/github.com/acme/kit@v1.1.0/sub/pkg").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let page = &json["page"];
    assert_eq!(page["title"], "Package pkg");
    assert_eq!(page["header"]["path"], "github.com/acme/kit/sub/pkg");
    assert_eq!(page["header"]["suffix"], "sub/pkg");
    assert_eq!(page["header"]["module"]["path"], "github.com/acme/kit");
}

#[tokio::test]
async fn test_older_version_is_served() {
    let response = get(test_app(), "/github.com/acme/kit@v1.0.0").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"]["header"]["module"]["version"], "v1.0.0");
}

#[tokio::test]
async fn test_versions_tab_lists_newest_first() {
    let response = get(test_app(), "/github.com/acme/kit?tab=versions").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let details = &json["page"]["details"];
    assert_eq!(details["kind"], "versions");
    let versions = details["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["version"], "v1.1.0");
    assert_eq!(versions[1]["version"], "v1.0.0");
}

#[tokio::test]
async fn test_stdlib_package() {
    let response = get(test_app(), "/fmt").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"]["title"], "Package fmt");
    assert_eq!(json["page"]["header"]["module"]["path"], "std");
}

// -- Redistributability -------------------------------------------------------

#[tokio::test]
async fn test_non_redistributable_package_defaults_to_subdirectories() {
    let response = get(test_app(), "/github.com/closed/lib").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let page = &json["page"];
    assert_eq!(page["settings"]["name"], "subdirectories");
    assert_eq!(page["header"]["is_redistributable"], false);
    assert_eq!(page["details"]["kind"], "directory");
}

#[tokio::test]
async fn test_header_shows_license_directory_breakdown() {
    let response = get(test_app(), "/github.com/closed/lib").await;
    let json = body_json(response).await;
    let dirs = &json["page"]["header"]["license_directories"];
    assert_eq!(dirs.as_array().unwrap().len(), 1);
    assert_eq!(dirs[0]["directory"], ".");
    assert_eq!(dirs[0]["compliant"], false);
    assert_eq!(dirs[0]["license_types"][0], "Proprietary");

    let response = get(test_app(), "/mod/github.com/acme/kit").await;
    let json = body_json(response).await;
    let dirs = &json["page"]["header"]["license_directories"];
    assert_eq!(dirs[0]["directory"], ".");
    assert_eq!(dirs[0]["compliant"], true);
}

#[tokio::test]
async fn test_non_redistributable_package_hides_doc() {
    let response = get(test_app(), "/github.com/closed/lib?tab=doc").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let page = &json["page"];
    assert_eq!(page["settings"]["name"], "doc");
    assert_eq!(page["can_show_details"], false);
    assert!(page.get("details").is_none());
    assert!(!json.to_string().contains("secret sauce"));
}

#[tokio::test]
async fn test_configured_allow_list_applies() {
    let app = test_app_with_config(AppConfig {
        redistributable_licenses: Some(vec!["ISC".to_string()]),
        ..AppConfig::default()
    });
    let response = get(app, "/github.com/acme/kit").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"]["settings"]["name"], "subdirectories");
}

// -- Module Pages -------------------------------------------------------------

#[tokio::test]
async fn test_module_page_defaults_to_readme() {
    let response = get(test_app(), "/mod/github.com/acme/kit").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["template"], "readme.tmpl");
    let page = &json["page"];
    assert_eq!(page["title"], "Module github.com/acme/kit");
    assert_eq!(page["namespace"], "mod");
    assert_eq!(page["header"]["kind"], "module");
    assert_eq!(page["details"]["readme_contents"], "# kit");
    assert_eq!(page["tabs"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_module_licenses_tab() {
    let response = get(test_app(), "/mod/github.com/acme/kit@v1.0.0?tab=licenses").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let details = &json["page"]["details"];
    assert_eq!(details["kind"], "licenses");
    assert_eq!(details["licenses"][0]["type"], "MIT");
    assert_eq!(details["licenses"][0]["contents"], "MIT License");
}

#[tokio::test]
async fn test_std_alias_serves_module_page() {
    let response = get(test_app(), "/std").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"]["title"], "Standard library");
    assert_eq!(json["page"]["namespace"], "mod");
}

#[tokio::test]
async fn test_missing_module_version_is_see_other() {
    let response = get(test_app(), "/mod/github.com/acme/kit@v2.0.0").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "Module github.com/acme/kit@v2.0.0 is not available."
    );
    assert!(json["secondary_message"]
        .as_str()
        .unwrap()
        .contains("/mod/github.com/acme/kit?tab=versions"));
}

// -- Directory Fallback -------------------------------------------------------

#[tokio::test]
async fn test_directory_page_when_no_package() {
    let response = get(test_app(), "/github.com/acme/kit/sub").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let page = &json["page"];
    assert_eq!(page["title"], "Directory github.com/acme/kit/sub");
    assert_eq!(page["header"]["kind"], "directory");
    let packages = page["details"]["packages"].as_array().unwrap();
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0]["path"], "github.com/acme/kit/sub/pkg");
}

// -- Redirects ----------------------------------------------------------------

#[tokio::test]
async fn test_cgo_redirect() {
    let response = get(test_app(), "/C").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://golang.org/doc/articles/c_go_cgo.html"
    );
}

#[tokio::test]
async fn test_legacy_pkg_redirect() {
    let response = get(test_app(), "/pkg/github.com/acme/kit?tab=versions").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/github.com/acme/kit?tab=versions"
    );
}

// -- Error Pages --------------------------------------------------------------

#[tokio::test]
async fn test_invalid_version_is_bad_request() {
    let response = get(test_app(), "/github.com/acme/kit@v1.x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["template"], "error.tmpl");
    assert_eq!(json["message"], "\"v1.x\" is not a valid semantic version.");
}

#[tokio::test]
async fn test_malformed_path_is_bad_request() {
    let response = get(test_app(), "/-a").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_excluded_path_is_not_found() {
    let response = get(test_app(), "/github.com/secret/thing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(!body.contains("excluded"));
}

#[tokio::test]
async fn test_missing_version_is_see_other() {
    let response = get(test_app(), "/github.com/acme/kit@v9.0.0").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "Package github.com/acme/kit@v9.0.0 is not available."
    );
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let response = get(test_app(), "/github.com/nobody/here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Not Found");
}

#[tokio::test]
async fn test_post_is_method_not_allowed() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/github.com/acme/kit")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// -- Custom Renderer ----------------------------------------------------------

/// Renders titles and status lines as plain text.
struct TextRenderer;

impl TextRenderer {
    fn text(body: String) -> Result<Rendered, RenderError> {
        Ok(Rendered {
            content_type: "text/plain; charset=utf-8",
            body: body.into_bytes(),
        })
    }
}

impl PageRenderer for TextRenderer {
    fn render_index(&self) -> Result<Rendered, RenderError> {
        Self::text("index".to_string())
    }

    fn render_details(&self, page: &DetailsPage) -> Result<Rendered, RenderError> {
        Self::text(format!("{} [{}]", page.title, page.settings.name))
    }

    fn render_error(
        &self,
        status: StatusCode,
        page: Option<&ErrorPage>,
    ) -> Result<Rendered, RenderError> {
        let message = page.map(|p| p.message.as_str()).unwrap_or("-");
        Self::text(format!("{} {}", status.as_u16(), message))
    }
}

fn test_app_with_text_renderer() -> axum::Router {
    let state = AppState::new(Arc::new(data_source())).with_renderer(Arc::new(TextRenderer));
    pkgdocs_api::app(state)
}

#[tokio::test]
async fn test_custom_renderer_details_page() {
    let response = get(test_app_with_text_renderer(), "/github.com/acme/kit?tab=imports").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_string(response).await, "Package kit [imports]");
}

#[tokio::test]
async fn test_custom_renderer_error_page() {
    let response = get(test_app_with_text_renderer(), "/github.com/nobody/here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "404 -");
}
