#![deny(missing_docs)]

//! # pkgdocs-core: Foundational Types for pkgdocs
//!
//! This crate holds the pure, request-independent rules of the
//! documentation frontend. It has no internal crate dependencies.
//!
//! ## Contents
//!
//! - [`import_path`]: import path syntax and the standard-library heuristic.
//! - [`version`]: the `latest` sentinel and Go-style semantic versions.
//! - [`module_path`]: the three-valued module path outcome of URL parsing.
//! - [`license`]: the redistributability policy over license records.
//! - [`stdlib`]: standard library constants and release tags.
//!
//! ## Crate Policy
//!
//! - No I/O and no shared mutable state.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod import_path;
pub mod license;
pub mod module_path;
pub mod stdlib;
pub mod version;

// Re-export primary types at crate root for ergonomic imports.
pub use error::ValidationError;
pub use import_path::{check_import_path, in_std_lib, split_path_version};
pub use license::{
    DirectoryVerdict, License, LicenseRecord, RedistributabilityReport, RedistributionPolicy,
};
pub use module_path::ModulePath;
pub use version::{is_valid_semver, latest_order, Version, VersionType, LATEST};
