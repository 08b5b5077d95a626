//! # pkgdocs-frontend: Details Page Orchestration
//!
//! Turns a requested URL path into a page model: resolve the path, fetch the
//! package or module with the latest-version fallback, pick a tab and load
//! its contents when the licenses allow it.
//!
//! ## Flow
//!
//! ```text
//! URL path ─▶ resolve ─▶ fetch (DataSource) ─▶ details ─▶ DetailsPage
//!                                                 │
//!                                     RedistributionPolicy
//! ```
//!
//! ## Modules
//!
//! - [`resolve`]: URL path parsing.
//! - [`fetch`]: version validation, exclusion and latest-version fallback.
//! - [`tabs`]: the closed package and module tab sets.
//! - [`details`]: page models, headers and per-tab fetchers.
//! - [`presentation`]: URLs, breadcrumbs, titles, relative times.
//! - [`datasource`]: the storage trait; [`memory`] implements it in memory.
//! - [`model`]: records returned by a data source.
//!
//! ## Crate Policy
//!
//! - The data source is the only I/O boundary; everything else is pure.
//! - Data source failures never reach users verbatim; they are logged and
//!   mapped to an opaque internal error by the caller.

pub mod datasource;
pub mod details;
pub mod fetch;
pub mod memory;
pub mod model;
pub mod presentation;
pub mod resolve;
pub mod tabs;

pub use datasource::{DataSource, DataSourceError};
pub use details::{
    directory_details_page, module_details_page, package_details_page, Details, DetailsContext,
    DetailsError, DetailsPage, Header,
};
pub use fetch::{fetch_package_or_module, ErrorPage, FetchError, Namespace};
pub use memory::{Fixtures, InMemoryDataSource, ModuleFixture};
pub use model::{Directory, Package, VersionInfo, VersionedPackage};
pub use resolve::{is_std_module_alias, parse_details_url_path, ResolvedPath};
pub use tabs::{ModuleTab, PackageTab, TabSettings};
