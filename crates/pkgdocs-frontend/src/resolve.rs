//! # URL Path Resolution
//!
//! Splits a details-page URL path into the requested package path, what the
//! URL reveals about its module, and the requested version.
//!
//! ```text
//! /<module>@<version>/<suffix>   package <module>/<suffix> in module <module>
//! /<path>@<version>              package <path>, module unknown
//! /<path>                        package <path>, module unknown, latest
//! ```
//!
//! A version segment of `latest` leaves the module unknown even when a
//! suffix follows. Paths whose first element has no dot are attributed to
//! the standard library regardless of the URL shape.

use serde::Serialize;

use pkgdocs_core::{check_import_path, in_std_lib, stdlib, ModulePath, ValidationError, Version};

/// Package path for which the details handler redirects to the cgo article.
pub const CGO_PACKAGE_PATH: &str = "C";

/// Documentation for the cgo pseudo-package.
pub const CGO_DOC_URL: &str = "https://golang.org/doc/articles/c_go_cgo.html";

/// The outcome of parsing a details URL path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    /// Full import path of the requested package. Never empty.
    pub package_path: String,
    /// Module of the package, as far as the URL reveals it.
    pub module_path: ModulePath,
    /// Requested version; not validated here.
    pub version: Version,
}

/// Parse a URL path of the form `/<path>[@<version>[/<suffix>]]`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidImportPath`] when the resulting package
/// path is not a well-formed import path.
pub fn parse_details_url_path(url_path: &str) -> Result<ResolvedPath, ValidationError> {
    let trimmed = url_path.strip_prefix('/').unwrap_or(url_path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    let (package_path, module_path, version) = match trimmed.split_once('@') {
        None => (trimmed.to_string(), ModulePath::Unknown, Version::Latest),
        Some((base, rest)) => {
            let base = base.strip_suffix('/').unwrap_or(base);
            let (raw_version, suffix) = rest.split_once('/').unwrap_or((rest, ""));
            let version = Version::parse(raw_version);
            if suffix.is_empty() || version.is_latest() {
                (base.to_string(), ModulePath::Unknown, version)
            } else {
                (
                    format!("{base}/{suffix}"),
                    ModulePath::Known(base.to_string()),
                    version,
                )
            }
        }
    };

    check_import_path(&package_path)?;

    let module_path = if in_std_lib(&package_path) {
        ModulePath::StdLib
    } else {
        module_path
    };

    Ok(ResolvedPath {
        package_path,
        module_path,
        version,
    })
}

/// Whether the URL path names the standard library module itself
/// (`/std` or `/std@<version>`), which is served as a module page.
pub fn is_std_module_alias(url_path: &str) -> bool {
    let trimmed = url_path.trim_start_matches('/');
    match trimmed.strip_prefix(stdlib::MODULE_PATH) {
        Some("") => true,
        Some(rest) => rest.starts_with('@') && !rest.contains('/'),
        None => false,
    }
}
