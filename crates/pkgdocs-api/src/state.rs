//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Configuration
//!
//! | Variable                            | Default              |
//! |-------------------------------------|----------------------|
//! | `PORT`                              | `8080`               |
//! | `PKGDOCS_REDISTRIBUTABLE_LICENSES`  | built-in allow-list  |
//! | `PKGDOCS_REQUIRE_ROOT_LICENSE`      | `false`              |
//! | `PKGDOCS_IMPORTED_BY_LIMIT`         | `20000`              |
//! | `PKGDOCS_FIXTURES`                  | none (empty store)   |
//!
//! The license list is comma-separated. Unparseable numeric values fall
//! back to their defaults.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use pkgdocs_core::RedistributionPolicy;
use pkgdocs_frontend::details::DEFAULT_IMPORTED_BY_LIMIT;
use pkgdocs_frontend::{DataSource, DetailsContext, InMemoryDataSource};

use crate::render::{JsonRenderer, PageRenderer};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Replacement for the built-in redistributable license allow-list.
    pub redistributable_licenses: Option<Vec<String>>,
    /// Require a license file at the module root.
    pub require_root_license: bool,
    /// Maximum number of importers listed on the imported-by tab.
    pub imported_by_limit: usize,
    /// JSON fixtures seeding the in-memory data source.
    pub fixtures_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            redistributable_licenses: None,
            require_root_license: false,
            imported_by_limit: DEFAULT_IMPORTED_BY_LIMIT,
            fixtures_path: None,
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            redistributable_licenses: lookup("PKGDOCS_REDISTRIBUTABLE_LICENSES").map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            require_root_license: lookup("PKGDOCS_REQUIRE_ROOT_LICENSE")
                .is_some_and(|v| matches!(v.trim(), "1" | "true" | "yes")),
            imported_by_limit: lookup("PKGDOCS_IMPORTED_BY_LIMIT")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.imported_by_limit),
            fixtures_path: lookup("PKGDOCS_FIXTURES")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    /// The redistribution policy described by this configuration.
    pub fn policy(&self) -> RedistributionPolicy {
        let policy = match &self.redistributable_licenses {
            Some(list) => RedistributionPolicy::new(list.iter().cloned()),
            None => RedistributionPolicy::default(),
        };
        policy.with_root_license_required(self.require_root_license)
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub ds: Arc<dyn DataSource>,
    pub renderer: Arc<dyn PageRenderer>,
    pub policy: Arc<RedistributionPolicy>,
    pub config: AppConfig,
}

impl AppState {
    /// State with default configuration and the JSON renderer.
    pub fn new(ds: Arc<dyn DataSource>) -> Self {
        Self::with_config(AppConfig::default(), ds)
    }

    /// State for `config`, serving from `ds`.
    pub fn with_config(config: AppConfig, ds: Arc<dyn DataSource>) -> Self {
        Self {
            ds,
            renderer: Arc::new(JsonRenderer),
            policy: Arc::new(config.policy()),
            config,
        }
    }

    /// State with an empty in-memory data source.
    pub fn empty() -> Self {
        Self::new(Arc::new(InMemoryDataSource::new()))
    }

    /// Replace the page renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Per-request context for building details pages.
    pub fn details_context(&self) -> DetailsContext<'_> {
        DetailsContext {
            ds: self.ds.as_ref(),
            policy: &self.policy,
            imported_by_limit: self.config.imported_by_limit,
            now: Utc::now(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("policy", &self.policy)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
