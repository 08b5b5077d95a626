//! # DataSource
//!
//! The storage collaborator consulted by the details pages. Every lookup
//! either returns the requested record or a [`DataSourceError`]; callers
//! distinguish "not found" from backend failures via
//! [`DataSourceError::is_not_found`].
//!
//! Versions passed as [`Version`] may be the `latest` sentinel; versions
//! passed as `&str` are concrete versions taken from an already-resolved
//! record.

use async_trait::async_trait;
use thiserror::Error;

use pkgdocs_core::{License, Version};

use crate::model::{Directory, Package, VersionInfo, VersionedPackage};

/// Errors surfaced by a [`DataSource`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    /// No record exists for the requested path and version.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backing store failed.
    #[error("backend error: {0}")]
    Backend(String),
}

impl DataSourceError {
    /// Whether the lookup failed only because the record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub(crate) fn not_found(path: &str, version: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{path}@{version}"))
    }
}

/// Read access to stored modules, packages and licenses.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// The package at `pkg_path` in whichever module provides it at
    /// `version`. When several modules provide the path, the one with the
    /// longest module path wins.
    async fn get_package(
        &self,
        pkg_path: &str,
        version: &Version,
    ) -> Result<VersionedPackage, DataSourceError>;

    /// The package at `pkg_path` within the named module.
    async fn get_package_in_module_version(
        &self,
        pkg_path: &str,
        module_path: &str,
        version: &Version,
    ) -> Result<VersionedPackage, DataSourceError>;

    /// Metadata for a module version.
    async fn get_version_info(
        &self,
        module_path: &str,
        version: &Version,
    ) -> Result<VersionInfo, DataSourceError>;

    /// The packages at or below `dir_path` in the module version that
    /// contains that directory.
    async fn get_directory(
        &self,
        dir_path: &str,
        version: &Version,
    ) -> Result<Directory, DataSourceError>;

    /// All license files of a module version.
    async fn get_module_licenses(
        &self,
        module_path: &str,
        version: &str,
    ) -> Result<Vec<License>, DataSourceError>;

    /// License files applying to a package: those in its directory or any
    /// ancestor directory within the module.
    async fn get_package_licenses(
        &self,
        pkg_path: &str,
        module_path: &str,
        version: &str,
    ) -> Result<Vec<License>, DataSourceError>;

    /// All packages of a module version.
    async fn get_packages_in_version(
        &self,
        module_path: &str,
        version: &str,
    ) -> Result<Vec<Package>, DataSourceError>;

    /// Paths of packages outside `module_path` that import `pkg_path`,
    /// sorted, at most `limit` entries.
    async fn get_imported_by(
        &self,
        pkg_path: &str,
        module_path: &str,
        limit: usize,
    ) -> Result<Vec<String>, DataSourceError>;

    /// Versions of every module version containing `pkg_path`, newest first.
    async fn get_package_versions(
        &self,
        pkg_path: &str,
    ) -> Result<Vec<VersionInfo>, DataSourceError>;

    /// Versions of a module, newest first.
    async fn get_module_versions(
        &self,
        module_path: &str,
    ) -> Result<Vec<VersionInfo>, DataSourceError>;

    /// Whether `path` has been excluded from display.
    async fn is_excluded(&self, path: &str) -> Result<bool, DataSourceError>;
}
