//! # Data Model
//!
//! Records returned by a [`DataSource`](crate::datasource::DataSource).
//! These mirror what the storage layer knows about a module version and
//! the packages it contains; presentation-specific shapes live in
//! [`details`](crate::details).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pkgdocs_core::license::{directory_of, ROOT_DIR};
use pkgdocs_core::{LicenseRecord, RedistributabilityReport, RedistributionPolicy};

/// Metadata for one version of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub module_path: String,
    pub version: String,
    pub commit_time: DateTime<Utc>,
    #[serde(default)]
    pub repository_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_contents: Option<String>,
}

/// Directory of `path` relative to the root of `module_path`.
pub fn dir_in_module<'a>(path: &'a str, module_path: &str) -> &'a str {
    match path.strip_prefix(module_path) {
        Some("") => ROOT_DIR,
        Some(rest) if rest.starts_with('/') => &rest[1..],
        // Standard library packages are stored under a module path that
        // is not a prefix of their import path.
        _ => path,
    }
}

/// A package within some module version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Full import path.
    pub path: String,
    /// Declared package name (`main` for commands).
    pub name: String,
    #[serde(default)]
    pub synopsis: String,
    /// License files applying to the package, relative to the module root.
    #[serde(default)]
    pub licenses: Vec<LicenseRecord>,
    #[serde(default)]
    pub documentation_html: String,
    /// Import paths this package imports.
    #[serde(default)]
    pub imports: Vec<String>,
}

impl Package {
    /// Directory of the package relative to the root of `module_path`.
    pub fn dir_in_module(&self, module_path: &str) -> &str {
        dir_in_module(&self.path, module_path)
    }

    /// Whether the package's content may be displayed under `policy`, with
    /// the per-directory breakdown.
    ///
    /// Only license files at or above the package directory count.
    pub fn redistributability(
        &self,
        module_path: &str,
        policy: &RedistributionPolicy,
    ) -> RedistributabilityReport {
        policy.evaluate_package(&self.licenses, self.dir_in_module(module_path))
    }

    /// License records located at the module root.
    pub fn root_licenses(&self) -> Vec<LicenseRecord> {
        self.licenses
            .iter()
            .filter(|l| directory_of(&l.file_path) == ROOT_DIR)
            .cloned()
            .collect()
    }
}

/// A package together with the module version it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedPackage {
    pub package: Package,
    pub version_info: VersionInfo,
}

impl VersionedPackage {
    pub fn path(&self) -> &str {
        &self.package.path
    }

    pub fn module_path(&self) -> &str {
        &self.version_info.module_path
    }
}

/// A directory of packages in a module version that is not itself a
/// package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub path: String,
    pub version_info: VersionInfo,
    /// Packages whose import path is `path` or lies below it.
    pub packages: Vec<Package>,
}
