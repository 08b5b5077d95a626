//! # Page Rendering
//!
//! The [`PageRenderer`] turns page models into response bodies. The built-in
//! [`JsonRenderer`] emits the model as JSON together with the name of the
//! template that would render it, which keeps the server usable without a
//! template set and makes responses easy to assert on.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use pkgdocs_frontend::{DetailsPage, ErrorPage};

/// Template of the landing page.
pub const INDEX_TEMPLATE: &str = "index.tmpl";

/// Template of error pages.
pub const ERROR_TEMPLATE: &str = "error.tmpl";

/// A rendered response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Rendered {
    /// Wrap the body in a response with `status`.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Rendering failure.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The page model could not be serialized.
    #[error("serialize page: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Produces response bodies for pages.
pub trait PageRenderer: Send + Sync {
    /// The landing page.
    fn render_index(&self) -> Result<Rendered, RenderError>;

    /// A package, module or directory page.
    fn render_details(&self, page: &DetailsPage) -> Result<Rendered, RenderError>;

    /// An error page. `page` is `None` when only the status is shown.
    fn render_error(
        &self,
        status: StatusCode,
        page: Option<&ErrorPage>,
    ) -> Result<Rendered, RenderError>;
}

/// Renders every page as a JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    fn json(value: &serde_json::Value) -> Result<Rendered, RenderError> {
        Ok(Rendered {
            content_type: "application/json",
            body: serde_json::to_vec(value)?,
        })
    }
}

impl PageRenderer for JsonRenderer {
    fn render_index(&self) -> Result<Rendered, RenderError> {
        Self::json(&json!({
            "template": INDEX_TEMPLATE,
            "title": "Go Discovery",
        }))
    }

    fn render_details(&self, page: &DetailsPage) -> Result<Rendered, RenderError> {
        Self::json(&json!({
            "template": page.settings.template_name,
            "page": page,
        }))
    }

    fn render_error(
        &self,
        status: StatusCode,
        page: Option<&ErrorPage>,
    ) -> Result<Rendered, RenderError> {
        let message = page
            .map(|p| p.message.clone())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Error").to_string());
        Self::json(&json!({
            "template": ERROR_TEMPLATE,
            "status": status.as_u16(),
            "message": message,
            "secondary_message": page.and_then(|p| p.secondary_message.clone()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(rendered: &Rendered) -> serde_json::Value {
        serde_json::from_slice(&rendered.body).unwrap()
    }

    #[test]
    fn error_without_page_uses_reason_phrase() {
        let rendered = JsonRenderer.render_error(StatusCode::NOT_FOUND, None).unwrap();
        assert_eq!(rendered.content_type, "application/json");
        let json = parse(&rendered);
        assert_eq!(json["status"], 404);
        assert_eq!(json["message"], "Not Found");
        assert!(json["secondary_message"].is_null());
    }

    #[test]
    fn error_with_page_keeps_messages() {
        let page = ErrorPage {
            message: "Package a.com/b@v1.0.0 is not available.".into(),
            secondary_message: Some("<a href=\"/a.com/b?tab=versions\">".into()),
        };
        let json = parse(&JsonRenderer.render_error(StatusCode::SEE_OTHER, Some(&page)).unwrap());
        assert_eq!(json["status"], 303);
        assert_eq!(json["message"], "Package a.com/b@v1.0.0 is not available.");
        assert_eq!(json["secondary_message"], "<a href=\"/a.com/b?tab=versions\">");
    }

    #[test]
    fn index_names_template() {
        let json = parse(&JsonRenderer.render_index().unwrap());
        assert_eq!(json["template"], INDEX_TEMPLATE);
    }
}
