//! # API Error Types
//!
//! Outcomes that end a request with an error page. Each variant maps to one
//! status code; the page is produced by the configured
//! [`PageRenderer`](crate::render::PageRenderer). Internal error details
//! are logged and never shown.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use pkgdocs_core::ValidationError;
use pkgdocs_frontend::{DetailsError, ErrorPage, FetchError};

use crate::render::{JsonRenderer, PageRenderer};

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed path or version (400).
    #[error("bad request: {0}")]
    BadRequest(ErrorPage),

    /// Absent or excluded (404).
    #[error("not found")]
    NotFound,

    /// The requested version is missing but others exist (303).
    #[error("see other: {0}")]
    SeeOther(ErrorPage),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::SeeOther(_) => StatusCode::SEE_OTHER,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Page content shown to the user, if any.
    pub fn page(&self) -> Option<&ErrorPage> {
        match self {
            Self::BadRequest(page) | Self::SeeOther(page) => Some(page),
            Self::NotFound | Self::Internal(_) => None,
        }
    }

    /// Render the error page with `renderer`.
    pub fn render(self, renderer: &dyn PageRenderer) -> Response {
        let status = self.status();
        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }
        match renderer.render_error(status, self.page()) {
            Ok(rendered) => rendered.into_response_with_status(status),
            Err(err) => {
                tracing::error!(error = %err, %status, "failed to render error page");
                (status, status.canonical_reason().unwrap_or_default()).into_response()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.render(&JsonRenderer)
    }
}

/// Malformed URL paths.
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(ErrorPage {
            message: err.to_string(),
            secondary_message: None,
        })
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidVersion(page) => Self::BadRequest(page),
            FetchError::NotFound => Self::NotFound,
            FetchError::OtherVersionsAvailable(page) => Self::SeeOther(page),
            FetchError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<DetailsError> for AppError {
    fn from(err: DetailsError) -> Self {
        Self::Internal(err.to_string())
    }
}
