//! # Details Tabs
//!
//! The closed set of tabs shown on package and module pages. Each tab has
//! static display settings and maps to exactly one detail fetcher in
//! [`details`](crate::details); the mapping is an exhaustive `match`, so a
//! tab without a fetcher cannot be expressed.
//!
//! Tabs marked `always_show_details` display their contents even when the
//! package or module is not redistributable. Other tabs show navigation and
//! metadata only.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

/// Display metadata for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabSettings {
    /// Name used in the `tab` query parameter.
    pub name: &'static str,
    /// Label shown in the tab bar.
    pub display_name: &'static str,
    /// Whether contents are shown even for non-redistributable entities.
    pub always_show_details: bool,
    /// Template that renders the tab.
    pub template_name: &'static str,
}

const DOC: TabSettings = TabSettings {
    name: "doc",
    display_name: "Doc",
    always_show_details: false,
    template_name: "pkg_doc.tmpl",
};

const README: TabSettings = TabSettings {
    name: "readme",
    display_name: "README",
    always_show_details: false,
    template_name: "readme.tmpl",
};

const SUBDIRECTORIES: TabSettings = TabSettings {
    name: "subdirectories",
    display_name: "Subdirectories",
    always_show_details: true,
    template_name: "subdirectories.tmpl",
};

const PACKAGES: TabSettings = TabSettings {
    name: "packages",
    display_name: "Packages",
    always_show_details: true,
    template_name: "subdirectories.tmpl",
};

const VERSIONS: TabSettings = TabSettings {
    name: "versions",
    display_name: "Versions",
    always_show_details: true,
    template_name: "versions.tmpl",
};

const IMPORTS: TabSettings = TabSettings {
    name: "imports",
    display_name: "Imports",
    always_show_details: true,
    template_name: "pkg_imports.tmpl",
};

const IMPORTED_BY: TabSettings = TabSettings {
    name: "importedby",
    display_name: "Imported By",
    always_show_details: true,
    template_name: "pkg_importedby.tmpl",
};

const LICENSES: TabSettings = TabSettings {
    name: "licenses",
    display_name: "Licenses",
    always_show_details: false,
    template_name: "licenses.tmpl",
};

/// Settings of every package tab, in display order.
pub static PACKAGE_TAB_SETTINGS: [TabSettings; 7] =
    [DOC, README, SUBDIRECTORIES, VERSIONS, IMPORTS, IMPORTED_BY, LICENSES];

/// Settings of every module tab, in display order.
pub static MODULE_TAB_SETTINGS: [TabSettings; 4] = [README, PACKAGES, VERSIONS, LICENSES];

/// Directory pages only list the packages they contain.
pub static DIRECTORY_TAB_SETTINGS: [TabSettings; 1] = [SUBDIRECTORIES];

static PACKAGE_TAB_LOOKUP: LazyLock<HashMap<&'static str, PackageTab>> =
    LazyLock::new(|| PackageTab::all().iter().map(|t| (t.name(), *t)).collect());

static MODULE_TAB_LOOKUP: LazyLock<HashMap<&'static str, ModuleTab>> =
    LazyLock::new(|| ModuleTab::all().iter().map(|t| (t.name(), *t)).collect());

/// A tab on a package page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageTab {
    /// Rendered package documentation.
    Doc,
    /// README of the containing module.
    ReadMe,
    /// Packages below this one.
    Subdirectories,
    /// Versions of the package.
    Versions,
    /// Packages this one imports.
    Imports,
    /// Packages importing this one.
    ImportedBy,
    /// License files applying to the package.
    Licenses,
}

impl PackageTab {
    /// All package tabs in display order.
    pub fn all() -> &'static [PackageTab] {
        &[
            Self::Doc,
            Self::ReadMe,
            Self::Subdirectories,
            Self::Versions,
            Self::Imports,
            Self::ImportedBy,
            Self::Licenses,
        ]
    }

    /// Display settings.
    pub fn settings(self) -> TabSettings {
        match self {
            Self::Doc => DOC,
            Self::ReadMe => README,
            Self::Subdirectories => SUBDIRECTORIES,
            Self::Versions => VERSIONS,
            Self::Imports => IMPORTS,
            Self::ImportedBy => IMPORTED_BY,
            Self::Licenses => LICENSES,
        }
    }

    /// Query parameter name.
    pub fn name(self) -> &'static str {
        self.settings().name
    }

    /// Look a tab up by query parameter name.
    pub fn from_name(name: &str) -> Option<Self> {
        PACKAGE_TAB_LOOKUP.get(name).copied()
    }

    /// The requested tab, or the default for a package with the given
    /// redistributability: `doc` when it can be shown, `subdirectories`
    /// otherwise.
    pub fn select(requested: Option<&str>, redistributable: bool) -> Self {
        match requested.and_then(Self::from_name) {
            Some(tab) => tab,
            None if redistributable => Self::Doc,
            None => Self::Subdirectories,
        }
    }
}

impl std::fmt::Display for PackageTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A tab on a module page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleTab {
    /// README of the module.
    ReadMe,
    /// Packages in the module.
    Packages,
    /// Versions of the module.
    Versions,
    /// License files of the module.
    Licenses,
}

impl ModuleTab {
    /// All module tabs in display order.
    pub fn all() -> &'static [ModuleTab] {
        &[Self::ReadMe, Self::Packages, Self::Versions, Self::Licenses]
    }

    /// Display settings.
    pub fn settings(self) -> TabSettings {
        match self {
            Self::ReadMe => README,
            Self::Packages => PACKAGES,
            Self::Versions => VERSIONS,
            Self::Licenses => LICENSES,
        }
    }

    /// Query parameter name.
    pub fn name(self) -> &'static str {
        self.settings().name
    }

    /// Look a tab up by query parameter name.
    pub fn from_name(name: &str) -> Option<Self> {
        MODULE_TAB_LOOKUP.get(name).copied()
    }

    /// The requested tab, or `readme`.
    pub fn select(requested: Option<&str>) -> Self {
        requested.and_then(Self::from_name).unwrap_or(Self::ReadMe)
    }
}

impl std::fmt::Display for ModuleTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registries_match_enum_order() {
        let names: Vec<_> = PackageTab::all().iter().map(|t| t.name()).collect();
        let settings: Vec<_> = PACKAGE_TAB_SETTINGS.iter().map(|s| s.name).collect();
        assert_eq!(names, settings);
        let names: Vec<_> = ModuleTab::all().iter().map(|t| t.name()).collect();
        let settings: Vec<_> = MODULE_TAB_SETTINGS.iter().map(|s| s.name).collect();
        assert_eq!(names, settings);
    }

    #[test]
    fn every_package_tab_round_trips_by_name() {
        for tab in PackageTab::all() {
            assert_eq!(PackageTab::from_name(tab.name()), Some(*tab));
        }
        for tab in ModuleTab::all() {
            assert_eq!(ModuleTab::from_name(tab.name()), Some(*tab));
        }
    }

    #[test]
    fn package_default_depends_on_redistributability() {
        assert_eq!(PackageTab::select(None, true), PackageTab::Doc);
        assert_eq!(PackageTab::select(None, false), PackageTab::Subdirectories);
        assert_eq!(PackageTab::select(Some("bogus"), true), PackageTab::Doc);
        assert_eq!(
            PackageTab::select(Some("licenses"), false),
            PackageTab::Licenses
        );
        // Module-only tab names are unknown on package pages.
        assert_eq!(PackageTab::select(Some("packages"), true), PackageTab::Doc);
    }

    #[test]
    fn module_default_is_readme() {
        assert_eq!(ModuleTab::select(None), ModuleTab::ReadMe);
        assert_eq!(ModuleTab::select(Some("doc")), ModuleTab::ReadMe);
        assert_eq!(ModuleTab::select(Some("versions")), ModuleTab::Versions);
    }

    #[test]
    fn always_visible_tabs() {
        let always: Vec<_> = PACKAGE_TAB_SETTINGS
            .iter()
            .filter(|s| s.always_show_details)
            .map(|s| s.name)
            .collect();
        assert_eq!(
            always,
            vec!["subdirectories", "versions", "imports", "importedby"]
        );
        assert!(!ModuleTab::ReadMe.settings().always_show_details);
        assert!(ModuleTab::Packages.settings().always_show_details);
        assert_eq!(ModuleTab::Packages.settings().template_name, "subdirectories.tmpl");
    }

    #[test]
    fn settings_serialize_for_templates() {
        let json = serde_json::to_value(PackageTab::ImportedBy.settings()).unwrap();
        assert_eq!(json["name"], "importedby");
        assert_eq!(json["display_name"], "Imported By");
        assert_eq!(json["template_name"], "pkg_importedby.tmpl");
    }
}
