//! # In-Memory DataSource
//!
//! A [`DataSource`] backed by module versions held in memory. Used for local
//! serving from JSON fixtures and throughout the test suites.
//!
//! Module versions are stored per module path. The `latest` sentinel picks
//! the highest version by [`latest_order`]: releases before prereleases
//! before pseudo-versions. When several modules contain a package path, the
//! module with the longest path is consulted first.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use pkgdocs_core::license::is_at_or_above;
use pkgdocs_core::version::compare;
use pkgdocs_core::{in_std_lib, latest_order, stdlib, License, Version};

use crate::datasource::{DataSource, DataSourceError};
use crate::model::{dir_in_module, Directory, Package, VersionInfo, VersionedPackage};

/// One stored module version with its packages and license files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleFixture {
    #[serde(flatten)]
    pub version_info: VersionInfo,
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub licenses: Vec<License>,
}

/// Seed data for an [`InMemoryDataSource`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub modules: Vec<ModuleFixture>,
    /// Path prefixes excluded from display.
    #[serde(default)]
    pub excluded: Vec<String>,
}

impl Fixtures {
    /// Parse fixtures from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Default)]
struct Inner {
    modules: HashMap<String, Vec<ModuleFixture>>,
    excluded: Vec<String>,
}

/// Thread-safe, cloneable in-memory store of module versions.
///
/// The lock is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryDataSource {
    /// Create an empty data source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a data source seeded from `fixtures`.
    pub fn from_fixtures(fixtures: Fixtures) -> Self {
        let ds = Self::new();
        for module in fixtures.modules {
            ds.insert_module(module);
        }
        for path in fixtures.excluded {
            ds.exclude(path);
        }
        ds
    }

    /// Store a module version, replacing any existing entry for the same
    /// module path and version.
    pub fn insert_module(&self, module: ModuleFixture) {
        let mut inner = self.inner.write();
        let versions = inner
            .modules
            .entry(module.version_info.module_path.clone())
            .or_default();
        versions.retain(|m| m.version_info.version != module.version_info.version);
        versions.push(module);
    }

    /// Exclude `path` and everything below it.
    pub fn exclude(&self, path: impl Into<String>) {
        self.inner.write().excluded.push(path.into());
    }

    /// Number of stored module versions.
    pub fn len(&self) -> usize {
        self.inner.read().modules.values().map(Vec::len).sum()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn module_version(&self, module_path: &str, version: &Version) -> Option<ModuleFixture> {
        let inner = self.inner.read();
        let versions = inner.modules.get(module_path)?;
        select(versions, version).cloned()
    }

    /// Module paths that could contain `path`, longest first.
    fn candidate_modules(&self, path: &str) -> Vec<String> {
        let inner = self.inner.read();
        let mut candidates: Vec<String> = inner
            .modules
            .keys()
            .filter(|m| module_contains(m, path))
            .cloned()
            .collect();
        candidates.sort_by_key(|m| Reverse(m.len()));
        candidates
    }

    fn sorted_versions(&self, mut infos: Vec<VersionInfo>) -> Vec<VersionInfo> {
        infos.sort_by(|a, b| {
            compare(&b.version, &a.version).then_with(|| a.module_path.cmp(&b.module_path))
        });
        infos
    }
}

fn select<'a>(versions: &'a [ModuleFixture], version: &Version) -> Option<&'a ModuleFixture> {
    match version {
        Version::Latest => versions
            .iter()
            .max_by(|a, b| latest_order(&a.version_info.version, &b.version_info.version)),
        Version::Specific(v) => versions.iter().find(|m| &m.version_info.version == v),
    }
}

fn module_contains(module_path: &str, path: &str) -> bool {
    if module_path == stdlib::MODULE_PATH {
        return in_std_lib(path);
    }
    path == module_path
        || path
            .strip_prefix(module_path)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn is_at_or_below(path: &str, dir: &str) -> bool {
    path == dir || path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
}

#[async_trait]
impl DataSource for InMemoryDataSource {
    async fn get_package(
        &self,
        pkg_path: &str,
        version: &Version,
    ) -> Result<VersionedPackage, DataSourceError> {
        for module_path in self.candidate_modules(pkg_path) {
            if let Ok(found) = self
                .get_package_in_module_version(pkg_path, &module_path, version)
                .await
            {
                return Ok(found);
            }
        }
        Err(DataSourceError::not_found(pkg_path, version))
    }

    async fn get_package_in_module_version(
        &self,
        pkg_path: &str,
        module_path: &str,
        version: &Version,
    ) -> Result<VersionedPackage, DataSourceError> {
        let module = self
            .module_version(module_path, version)
            .ok_or_else(|| DataSourceError::not_found(pkg_path, version))?;
        let package = module
            .packages
            .into_iter()
            .find(|p| p.path == pkg_path)
            .ok_or_else(|| DataSourceError::not_found(pkg_path, version))?;
        Ok(VersionedPackage {
            package,
            version_info: module.version_info,
        })
    }

    async fn get_version_info(
        &self,
        module_path: &str,
        version: &Version,
    ) -> Result<VersionInfo, DataSourceError> {
        self.module_version(module_path, version)
            .map(|m| m.version_info)
            .ok_or_else(|| DataSourceError::not_found(module_path, version))
    }

    async fn get_directory(
        &self,
        dir_path: &str,
        version: &Version,
    ) -> Result<Directory, DataSourceError> {
        for module_path in self.candidate_modules(dir_path) {
            let Some(module) = self.module_version(&module_path, version) else {
                continue;
            };
            let mut packages: Vec<Package> = module
                .packages
                .into_iter()
                .filter(|p| is_at_or_below(&p.path, dir_path) || module_path == dir_path)
                .collect();
            if packages.is_empty() {
                continue;
            }
            packages.sort_by(|a, b| a.path.cmp(&b.path));
            return Ok(Directory {
                path: dir_path.to_string(),
                version_info: module.version_info,
                packages,
            });
        }
        Err(DataSourceError::not_found(dir_path, version))
    }

    async fn get_module_licenses(
        &self,
        module_path: &str,
        version: &str,
    ) -> Result<Vec<License>, DataSourceError> {
        let version = Version::parse(version);
        self.module_version(module_path, &version)
            .map(|m| m.licenses)
            .ok_or_else(|| DataSourceError::not_found(module_path, &version))
    }

    async fn get_package_licenses(
        &self,
        pkg_path: &str,
        module_path: &str,
        version: &str,
    ) -> Result<Vec<License>, DataSourceError> {
        let dir = dir_in_module(pkg_path, module_path);
        let licenses = self.get_module_licenses(module_path, version).await?;
        Ok(licenses
            .into_iter()
            .filter(|l| is_at_or_above(l.record.directory(), dir))
            .collect())
    }

    async fn get_packages_in_version(
        &self,
        module_path: &str,
        version: &str,
    ) -> Result<Vec<Package>, DataSourceError> {
        let version = Version::parse(version);
        let mut packages = self
            .module_version(module_path, &version)
            .map(|m| m.packages)
            .ok_or_else(|| DataSourceError::not_found(module_path, &version))?;
        packages.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(packages)
    }

    async fn get_imported_by(
        &self,
        pkg_path: &str,
        module_path: &str,
        limit: usize,
    ) -> Result<Vec<String>, DataSourceError> {
        let inner = self.inner.read();
        let mut importers: Vec<String> = inner
            .modules
            .iter()
            .filter(|(path, _)| path.as_str() != module_path)
            .filter_map(|(_, versions)| select(versions, &Version::Latest))
            .flat_map(|m| m.packages.iter())
            .filter(|p| p.imports.iter().any(|i| i == pkg_path))
            .map(|p| p.path.clone())
            .collect();
        importers.sort();
        importers.dedup();
        importers.truncate(limit);
        Ok(importers)
    }

    async fn get_package_versions(
        &self,
        pkg_path: &str,
    ) -> Result<Vec<VersionInfo>, DataSourceError> {
        let infos: Vec<VersionInfo> = {
            let inner = self.inner.read();
            inner
                .modules
                .iter()
                .filter(|(path, _)| module_contains(path, pkg_path))
                .flat_map(|(_, versions)| versions.iter())
                .filter(|m| m.packages.iter().any(|p| p.path == pkg_path))
                .map(|m| m.version_info.clone())
                .collect()
        };
        Ok(self.sorted_versions(infos))
    }

    async fn get_module_versions(
        &self,
        module_path: &str,
    ) -> Result<Vec<VersionInfo>, DataSourceError> {
        let infos: Vec<VersionInfo> = self
            .inner
            .read()
            .modules
            .get(module_path)
            .map(|versions| versions.iter().map(|m| m.version_info.clone()).collect())
            .unwrap_or_default();
        Ok(self.sorted_versions(infos))
    }

    async fn is_excluded(&self, path: &str) -> Result<bool, DataSourceError> {
        Ok(self
            .inner
            .read()
            .excluded
            .iter()
            .any(|prefix| is_at_or_below(path, prefix)))
    }
}
