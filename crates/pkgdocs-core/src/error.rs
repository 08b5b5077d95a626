//! # Error Hierarchy
//!
//! Structured error types for the core crate, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.

use thiserror::Error;

/// Validation errors for user-supplied paths and versions.
///
/// Each variant carries the rejected input so that request logs show
/// exactly what the client sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The path is not a well-formed import path.
    #[error("malformed path \"{path}\": {reason}")]
    InvalidImportPath {
        /// The path that failed validation.
        path: String,
        /// Which rule was violated.
        reason: String,
    },

    /// The standard library has no release tag for this version.
    #[error("no standard library tag for version \"{0}\"")]
    NoStdlibTag(String),
}

impl ValidationError {
    pub(crate) fn import_path(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidImportPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
