//! # Details Pages
//!
//! Assembles the page model for package, module and directory pages once
//! the entity itself has been fetched (see [`fetch`](crate::fetch)).
//!
//! ## Tab dispatch
//!
//! The requested tab is resolved against the closed tab sets in
//! [`tabs`](crate::tabs); unknown names fall back to the default tab. The
//! tab's detail payload is fetched only when the entity is redistributable
//! or the tab is always visible. Otherwise the page carries navigation and
//! header metadata with `details` omitted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use pkgdocs_core::{
    in_std_lib, DirectoryVerdict, License, LicenseRecord, RedistributionPolicy, Version,
};

use crate::datasource::{DataSource, DataSourceError};
use crate::fetch::Namespace;
use crate::model::{Directory, Package, VersionInfo, VersionedPackage};
use crate::presentation::{
    breadcrumb_path, construct_module_url, construct_package_url, effective_name, elapsed_time,
    file_source, module_title, package_title,
};
use crate::tabs::{
    ModuleTab, PackageTab, TabSettings, DIRECTORY_TAB_SETTINGS, MODULE_TAB_SETTINGS,
    PACKAGE_TAB_SETTINGS,
};

/// Default bound on the importers listed by the imported-by tab.
pub const DEFAULT_IMPORTED_BY_LIMIT: usize = 20_000;

/// Failure while assembling a page for an entity that exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetailsError {
    /// A data source lookup for tab contents or licenses failed.
    #[error("data source: {0}")]
    DataSource(#[from] DataSourceError),
}

/// Collaborators and request-scoped settings for building pages.
#[derive(Clone, Copy)]
pub struct DetailsContext<'a> {
    pub ds: &'a dyn DataSource,
    pub policy: &'a RedistributionPolicy,
    pub imported_by_limit: usize,
    /// Reference time for commit ages.
    pub now: DateTime<Utc>,
}

// -- Headers ------------------------------------------------------------------

/// Header describing a module version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleHeader {
    pub version: String,
    pub path: String,
    /// Age of the commit, e.g. `3 days ago`.
    pub commit_time: String,
    pub repository_url: String,
    pub is_redistributable: bool,
    pub licenses: Vec<LicenseRecord>,
    /// Compliance of each directory holding license files.
    pub license_directories: Vec<DirectoryVerdict>,
    pub url: String,
}

/// Header describing a package and its module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageHeader {
    pub path: String,
    /// Path relative to the module root, or `<name> (root)`.
    pub suffix: String,
    pub synopsis: String,
    pub is_redistributable: bool,
    pub url: String,
    pub licenses: Vec<LicenseRecord>,
    /// Compliance of each directory at or above the package.
    pub license_directories: Vec<DirectoryVerdict>,
    /// Module header computed from root-level licenses only.
    pub module: ModuleHeader,
}

/// Header describing a directory of packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryHeader {
    pub path: String,
    pub url: String,
    pub module: ModuleHeader,
}

/// Header of a details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Header {
    Package(PackageHeader),
    Module(ModuleHeader),
    Directory(DirectoryHeader),
}

/// Build a module header for `vi` from the given license records.
pub fn create_module_header(
    vi: &VersionInfo,
    licenses: Vec<LicenseRecord>,
    policy: &RedistributionPolicy,
    now: DateTime<Utc>,
) -> ModuleHeader {
    let report = policy.evaluate(&licenses);
    ModuleHeader {
        version: vi.version.clone(),
        path: vi.module_path.clone(),
        commit_time: elapsed_time(vi.commit_time, now),
        repository_url: vi.repository_url.clone(),
        is_redistributable: report.redistributable,
        licenses,
        license_directories: report.directories,
        url: construct_module_url(&vi.module_path, &Version::parse(&vi.version)),
    }
}

/// Build a package header. The embedded module header only considers
/// license files at the module root.
pub fn create_package_header(
    pkg: &Package,
    vi: &VersionInfo,
    policy: &RedistributionPolicy,
    now: DateTime<Utc>,
) -> PackageHeader {
    let suffix = match pkg.dir_in_module(&vi.module_path) {
        "." => format!("{} (root)", effective_name(&pkg.name, &pkg.path)),
        dir => dir.to_string(),
    };
    let report = pkg.redistributability(&vi.module_path, policy);
    PackageHeader {
        path: pkg.path.clone(),
        suffix,
        synopsis: pkg.synopsis.clone(),
        is_redistributable: report.redistributable,
        url: construct_package_url(&pkg.path, &vi.module_path, &Version::parse(&vi.version)),
        licenses: pkg.licenses.clone(),
        license_directories: report.directories,
        module: create_module_header(vi, pkg.root_licenses(), policy, now),
    }
}

// -- Detail payloads ----------------------------------------------------------

/// Contents of the doc tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentationDetails {
    pub module_path: String,
    pub documentation_html: String,
}

/// Contents of the readme tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadMeDetails {
    pub module_path: String,
    pub readme_file_path: Option<String>,
    pub readme_contents: Option<String>,
}

/// Contents of the subdirectories and packages tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryDetails {
    pub module_path: String,
    pub version: String,
    pub path: String,
    pub packages: Vec<PackageHeader>,
}

/// One entry of the versions tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSummary {
    pub module_path: String,
    pub version: String,
    pub commit_time: String,
    pub url: String,
}

/// Contents of the versions tab, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionsDetails {
    pub versions: Vec<VersionSummary>,
}

/// Contents of the imports tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportsDetails {
    pub module_path: String,
    /// Imports outside the standard library, sorted.
    pub external_imports: Vec<String>,
    /// Standard library imports, sorted.
    pub std_lib: Vec<String>,
}

/// Contents of the imported-by tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedByDetails {
    pub module_path: String,
    pub imported_by: Vec<String>,
    /// Whether the list was cut off at the configured limit.
    pub truncated: bool,
}

/// A license file as shown on the licenses tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseDetail {
    #[serde(rename = "type")]
    pub license_type: String,
    pub file_path: String,
    /// Where the file can be found, see [`file_source`].
    pub source: String,
    pub contents: String,
}

/// Contents of the licenses tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicensesDetails {
    pub licenses: Vec<LicenseDetail>,
}

/// The payload of whichever tab is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Details {
    Documentation(DocumentationDetails),
    ReadMe(ReadMeDetails),
    Directory(DirectoryDetails),
    Versions(VersionsDetails),
    Imports(ImportsDetails),
    ImportedBy(ImportedByDetails),
    Licenses(LicensesDetails),
}

// -- Page model ---------------------------------------------------------------

/// Everything a renderer needs to draw a details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailsPage {
    pub title: String,
    /// Settings of the selected tab.
    pub settings: TabSettings,
    /// Omitted when the entity is not redistributable and the tab is not
    /// always visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
    pub header: Header,
    pub breadcrumb_path: String,
    /// All tabs available for this kind of page.
    pub tabs: &'static [TabSettings],
    pub namespace: Namespace,
    pub can_show_details: bool,
}

/// Build the page for a package, selecting `requested_tab` or the default.
///
/// # Errors
///
/// Returns [`DetailsError`] if fetching the tab contents fails.
pub async fn package_details_page(
    ctx: DetailsContext<'_>,
    pkg: &VersionedPackage,
    requested_tab: Option<&str>,
) -> Result<DetailsPage, DetailsError> {
    let header = create_package_header(&pkg.package, &pkg.version_info, ctx.policy, ctx.now);
    let tab = PackageTab::select(requested_tab, header.is_redistributable);
    let settings = tab.settings();
    let can_show_details = header.is_redistributable || settings.always_show_details;

    let details = if can_show_details {
        Some(fetch_details_for_package(ctx, tab, pkg).await?)
    } else {
        tracing::debug!(path = pkg.path(), %tab, "package not redistributable; details hidden");
        None
    };

    Ok(DetailsPage {
        title: package_title(&pkg.package.name, pkg.path()),
        settings,
        details,
        breadcrumb_path: breadcrumb_path(
            &header.path,
            &header.module.path,
            &Version::parse(&header.module.version),
        ),
        header: Header::Package(header),
        tabs: &PACKAGE_TAB_SETTINGS,
        namespace: Namespace::Package,
        can_show_details,
    })
}

/// Build the page for a module version, selecting `requested_tab` or
/// `readme`.
///
/// # Errors
///
/// Returns [`DetailsError`] if the module licenses or tab contents cannot
/// be fetched.
pub async fn module_details_page(
    ctx: DetailsContext<'_>,
    vi: &VersionInfo,
    requested_tab: Option<&str>,
) -> Result<DetailsPage, DetailsError> {
    let licenses = ctx
        .ds
        .get_module_licenses(&vi.module_path, &vi.version)
        .await?;
    let records: Vec<LicenseRecord> = licenses.iter().map(|l| l.record.clone()).collect();
    let header = create_module_header(vi, records, ctx.policy, ctx.now);

    let tab = ModuleTab::select(requested_tab);
    let settings = tab.settings();
    let can_show_details = header.is_redistributable || settings.always_show_details;

    let details = if can_show_details {
        Some(fetch_details_for_module(ctx, tab, vi, &licenses).await?)
    } else {
        tracing::debug!(module = %vi.module_path, %tab, "module not redistributable; details hidden");
        None
    };

    Ok(DetailsPage {
        title: module_title(&vi.module_path),
        settings,
        details,
        header: Header::Module(header),
        breadcrumb_path: String::new(),
        tabs: &MODULE_TAB_SETTINGS,
        namespace: Namespace::Module,
        can_show_details,
    })
}

/// Build the page for a path that is not a package but contains packages.
///
/// Directory pages only list the packages below the path, which is always
/// visible.
///
/// # Errors
///
/// Returns [`DetailsError`] if the module licenses cannot be fetched.
pub async fn directory_details_page(
    ctx: DetailsContext<'_>,
    dir: &Directory,
) -> Result<DetailsPage, DetailsError> {
    let vi = &dir.version_info;
    let licenses = ctx
        .ds
        .get_module_licenses(&vi.module_path, &vi.version)
        .await?;
    let root: Vec<LicenseRecord> = licenses
        .into_iter()
        .map(|l| l.record)
        .filter(|r| r.directory() == pkgdocs_core::license::ROOT_DIR)
        .collect();
    let module = create_module_header(vi, root, ctx.policy, ctx.now);
    let version = Version::parse(&vi.version);
    let settings = PackageTab::Subdirectories.settings();

    Ok(DetailsPage {
        title: format!("Directory {}", dir.path),
        settings,
        details: Some(Details::Directory(directory_details(
            ctx,
            &dir.path,
            vi,
            &dir.packages,
        ))),
        breadcrumb_path: breadcrumb_path(&dir.path, &vi.module_path, &version),
        header: Header::Directory(DirectoryHeader {
            path: dir.path.clone(),
            url: construct_package_url(&dir.path, &vi.module_path, &version),
            module,
        }),
        tabs: &DIRECTORY_TAB_SETTINGS,
        namespace: Namespace::Package,
        can_show_details: true,
    })
}

/// Fetch the payload of a package tab.
///
/// # Errors
///
/// Returns [`DetailsError`] if a data source lookup fails.
pub async fn fetch_details_for_package(
    ctx: DetailsContext<'_>,
    tab: PackageTab,
    pkg: &VersionedPackage,
) -> Result<Details, DetailsError> {
    let vi = &pkg.version_info;
    let details = match tab {
        PackageTab::Doc => Details::Documentation(DocumentationDetails {
            module_path: vi.module_path.clone(),
            documentation_html: pkg.package.documentation_html.clone(),
        }),
        PackageTab::ReadMe => Details::ReadMe(readme_details(vi)),
        PackageTab::Subdirectories => {
            let packages = ctx
                .ds
                .get_packages_in_version(&vi.module_path, &vi.version)
                .await?;
            let below: Vec<Package> = packages
                .into_iter()
                .filter(|p| p.path != pkg.path() && is_below(&p.path, pkg.path()))
                .collect();
            Details::Directory(directory_details(ctx, pkg.path(), vi, &below))
        }
        PackageTab::Versions => {
            let versions = ctx.ds.get_package_versions(pkg.path()).await?;
            Details::Versions(versions_details(ctx, &versions, |v| {
                construct_package_url(pkg.path(), &v.module_path, &Version::parse(&v.version))
            }))
        }
        PackageTab::Imports => Details::Imports(imports_details(pkg)),
        PackageTab::ImportedBy => {
            // One extra entry tells whether the limit cut the list off.
            let mut imported_by = ctx
                .ds
                .get_imported_by(
                    pkg.path(),
                    &vi.module_path,
                    ctx.imported_by_limit.saturating_add(1),
                )
                .await?;
            let truncated = imported_by.len() > ctx.imported_by_limit;
            imported_by.truncate(ctx.imported_by_limit);
            Details::ImportedBy(ImportedByDetails {
                module_path: vi.module_path.clone(),
                imported_by,
                truncated,
            })
        }
        PackageTab::Licenses => {
            let licenses = ctx
                .ds
                .get_package_licenses(pkg.path(), &vi.module_path, &vi.version)
                .await?;
            Details::Licenses(licenses_details(&vi.module_path, &vi.version, &licenses))
        }
    };
    Ok(details)
}

/// Fetch the payload of a module tab. `licenses` are the module's license
/// files, already loaded for the header.
///
/// # Errors
///
/// Returns [`DetailsError`] if a data source lookup fails.
pub async fn fetch_details_for_module(
    ctx: DetailsContext<'_>,
    tab: ModuleTab,
    vi: &VersionInfo,
    licenses: &[License],
) -> Result<Details, DetailsError> {
    let details = match tab {
        ModuleTab::ReadMe => Details::ReadMe(readme_details(vi)),
        ModuleTab::Packages => {
            let packages = ctx
                .ds
                .get_packages_in_version(&vi.module_path, &vi.version)
                .await?;
            Details::Directory(directory_details(ctx, &vi.module_path, vi, &packages))
        }
        ModuleTab::Versions => {
            let versions = ctx.ds.get_module_versions(&vi.module_path).await?;
            Details::Versions(versions_details(ctx, &versions, |v| {
                construct_module_url(&v.module_path, &Version::parse(&v.version))
            }))
        }
        ModuleTab::Licenses => {
            Details::Licenses(licenses_details(&vi.module_path, &vi.version, licenses))
        }
    };
    Ok(details)
}

fn is_below(path: &str, dir: &str) -> bool {
    path.strip_prefix(dir)
        .is_some_and(|rest| rest.starts_with('/'))
}

fn readme_details(vi: &VersionInfo) -> ReadMeDetails {
    ReadMeDetails {
        module_path: vi.module_path.clone(),
        readme_file_path: vi.readme_file_path.clone(),
        readme_contents: vi.readme_contents.clone(),
    }
}

fn directory_details(
    ctx: DetailsContext<'_>,
    path: &str,
    vi: &VersionInfo,
    packages: &[Package],
) -> DirectoryDetails {
    DirectoryDetails {
        module_path: vi.module_path.clone(),
        version: vi.version.clone(),
        path: path.to_string(),
        packages: packages
            .iter()
            .map(|p| create_package_header(p, vi, ctx.policy, ctx.now))
            .collect(),
    }
}

fn versions_details(
    ctx: DetailsContext<'_>,
    versions: &[VersionInfo],
    url: impl Fn(&VersionInfo) -> String,
) -> VersionsDetails {
    VersionsDetails {
        versions: versions
            .iter()
            .map(|v| VersionSummary {
                module_path: v.module_path.clone(),
                version: v.version.clone(),
                commit_time: elapsed_time(v.commit_time, ctx.now),
                url: url(v),
            })
            .collect(),
    }
}

fn imports_details(pkg: &VersionedPackage) -> ImportsDetails {
    let (mut std_lib, mut external_imports): (Vec<String>, Vec<String>) = pkg
        .package
        .imports
        .iter()
        .cloned()
        .partition(|i| in_std_lib(i));
    std_lib.sort();
    external_imports.sort();
    ImportsDetails {
        module_path: pkg.module_path().to_string(),
        external_imports,
        std_lib,
    }
}

fn licenses_details(module_path: &str, version: &str, licenses: &[License]) -> LicensesDetails {
    LicensesDetails {
        licenses: licenses
            .iter()
            .map(|l| LicenseDetail {
                license_type: l.record.license_type.clone(),
                file_path: l.record.file_path.clone(),
                source: file_source(module_path, version, &l.record.file_path),
                contents: l.contents.clone(),
            })
            .collect(),
    }
}
