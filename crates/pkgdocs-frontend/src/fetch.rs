//! # Fetch With Latest-Version Fallback
//!
//! The first phase of serving a package or module page: validate the
//! requested version, hide excluded paths, and look the entity up. When a
//! specific version is missing but the path exists at some other version,
//! the caller is pointed at the versions tab instead of getting a bare
//! not-found.
//!
//! ```text
//! Validating ──invalid──▶ InvalidVersion (400)
//!     │
//! CheckExcluded ──excluded──▶ NotFound (404)
//!     │        ──error─────▶ Internal (500)
//! Lookup(v) ──ok──▶ entity
//!     │     ──other error──▶ Internal (500)
//!     │     ──not found, v = latest──▶ NotFound (404)
//! RetryLatest ──ok──▶ OtherVersionsAvailable (303)
//!             ──any error──▶ NotFound (404)
//! ```
//!
//! Excluded and absent paths produce the same outcome.

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use pkgdocs_core::Version;

use crate::datasource::{DataSource, DataSourceError};
use crate::presentation::suggested_search;

/// Whether a page describes a package or a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Namespace {
    /// Package pages, served at `/<path>`.
    #[serde(rename = "pkg")]
    Package,
    /// Module pages, served at `/mod/<path>`.
    #[serde(rename = "mod")]
    Module,
}

impl Namespace {
    /// Short form used in page models.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Package => "pkg",
            Self::Module => "mod",
        }
    }

    /// Noun used in user-facing messages.
    pub fn word(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Module => "module",
        }
    }

    /// URL of the page for `path` at its latest version.
    pub fn url_path(self, path: &str) -> String {
        match self {
            Self::Package => format!("/{path}"),
            Self::Module => format!("/mod/{path}"),
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing content of an error page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPage {
    pub message: String,
    /// Additional HTML shown below the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_message: Option<String>,
}

impl std::fmt::Display for ErrorPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Why a package or module could not be served.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The requested version is neither `latest` nor valid semver.
    #[error("{0}")]
    InvalidVersion(ErrorPage),

    /// Nothing to show: absent at every version, or excluded.
    #[error("not found")]
    NotFound,

    /// The requested version does not exist but others do.
    #[error("{0}")]
    OtherVersionsAvailable(ErrorPage),

    /// The data source failed. The detail is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FetchError {
    /// HTTP status code for the outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidVersion(_) => 400,
            Self::NotFound => 404,
            Self::OtherVersionsAvailable(_) => 303,
            Self::Internal(_) => 500,
        }
    }

    /// Page content to show, if the outcome carries any.
    pub fn error_page(&self) -> Option<&ErrorPage> {
        match self {
            Self::InvalidVersion(page) | Self::OtherVersionsAvailable(page) => Some(page),
            Self::NotFound | Self::Internal(_) => None,
        }
    }
}

/// Look up a package or module at `version`, falling back to `latest` to
/// tell a missing version apart from a missing path.
///
/// `lookup` is invoked at most twice.
///
/// # Errors
///
/// See [`FetchError`] for the outcomes.
pub async fn fetch_package_or_module<T, F, Fut>(
    ds: &dyn DataSource,
    namespace: Namespace,
    path: &str,
    version: &Version,
    lookup: F,
) -> Result<T, FetchError>
where
    F: Fn(Version) -> Fut,
    Fut: Future<Output = Result<T, DataSourceError>>,
{
    if !version.is_valid() {
        tracing::info!(%namespace, path, %version, "invalid version requested");
        return Err(FetchError::InvalidVersion(ErrorPage {
            message: format!("\"{version}\" is not a valid semantic version."),
            secondary_message: match namespace {
                Namespace::Package => Some(suggested_search(path)),
                Namespace::Module => None,
            },
        }));
    }

    match ds.is_excluded(path).await {
        Ok(true) => return Err(FetchError::NotFound),
        Ok(false) => {}
        Err(err) => {
            tracing::error!(path, error = %err, "exclusion check failed");
            return Err(FetchError::Internal(err.to_string()));
        }
    }

    let err = match lookup(version.clone()).await {
        Ok(found) => return Ok(found),
        Err(err) => err,
    };
    tracing::warn!(%namespace, path, %version, error = %err, "lookup failed");
    if !err.is_not_found() {
        return Err(FetchError::Internal(err.to_string()));
    }
    if version.is_latest() {
        return Err(FetchError::NotFound);
    }

    if let Err(err) = lookup(Version::Latest).await {
        tracing::warn!(%namespace, path, error = %err, "no latest version available");
        return Err(FetchError::NotFound);
    }

    let word = namespace.word();
    let mut title = word.to_string();
    title[..1].make_ascii_uppercase();
    Err(FetchError::OtherVersionsAvailable(ErrorPage {
        message: format!("{title} {path}@{version} is not available."),
        secondary_message: Some(format!(
            r#"There are other versions of this {word} that are! To view them, <a href="{}?tab=versions">click here</a>.</p>"#,
            namespace.url_path(path)
        )),
    }))
}
