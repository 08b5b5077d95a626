//! # License Redistributability
//!
//! Decides, from per-file license classifications, whether content derived
//! from those files may be displayed publicly.
//!
//! ## Rule
//!
//! Records are grouped by directory (the file path minus its final segment;
//! root files belong to `.`). A directory is *compliant* if at least one of
//! its records has a license type on the policy's allow-list. Content is
//! redistributable iff:
//!
//! 1. at least one license record exists, and
//! 2. every directory that holds records is compliant.
//!
//! Directories without license files are not evaluated. Absence of license
//! information never defaults to "open": an empty record set is not
//! redistributable even though condition 2 holds vacuously.
//!
//! Packages nested in a module are evaluated with only the records found in
//! their own directory or its ancestors, see
//! [`RedistributionPolicy::evaluate_package`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Directory name for files at the root of a module or package.
pub const ROOT_DIR: &str = ".";

/// License types accepted for display when no explicit list is configured.
pub const DEFAULT_REDISTRIBUTABLE_LICENSES: &[&str] = &[
    "0BSD",
    "Apache-2.0",
    "Artistic-2.0",
    "BlueOak-1.0.0",
    "BSD-0-Clause",
    "BSD-2-Clause",
    "BSD-2-Clause-FreeBSD",
    "BSD-3-Clause",
    "BSL-1.0",
    "CC-BY-4.0",
    "CC0-1.0",
    "EPL-2.0",
    "GPL-2.0",
    "GPL-3.0",
    "ISC",
    "LGPL-2.1",
    "LGPL-3.0",
    "MIT",
    "MIT-0",
    "MPL-2.0",
    "NCSA",
    "OpenSSL",
    "PostgreSQL",
    "Unlicense",
    "Zlib",
];

/// A detected license file: its classified type and location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// License identifier, e.g. `MIT`.
    #[serde(rename = "type")]
    pub license_type: String,
    /// Path of the license file relative to the module root.
    pub file_path: String,
}

impl LicenseRecord {
    /// Create a record.
    pub fn new(license_type: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            license_type: license_type.into(),
            file_path: file_path.into(),
        }
    }

    /// Directory containing the license file.
    pub fn directory(&self) -> &str {
        directory_of(&self.file_path)
    }
}

impl AsRef<LicenseRecord> for LicenseRecord {
    fn as_ref(&self) -> &LicenseRecord {
        self
    }
}

/// A license record together with the license text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Type and location.
    #[serde(flatten)]
    pub record: LicenseRecord,
    /// Full text of the license file.
    #[serde(default)]
    pub contents: String,
}

impl AsRef<LicenseRecord> for License {
    fn as_ref(&self) -> &LicenseRecord {
        &self.record
    }
}

/// Directory portion of a slash-separated file path.
///
/// `LICENSE` and `./LICENSE` yield `.`, `a/b/LICENSE` yields `a/b`.
pub fn directory_of(file_path: &str) -> &str {
    let trimmed = file_path.strip_prefix("./").unwrap_or(file_path);
    match trimmed.rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => dir,
        _ => ROOT_DIR,
    }
}

/// Whether the directory `ancestor` is `dir` itself or one of its parents.
///
/// Both are relative to the module root; `.` is above everything.
pub fn is_at_or_above(ancestor: &str, dir: &str) -> bool {
    ancestor == ROOT_DIR
        || ancestor == dir
        || dir
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Compliance of one directory that contains license files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryVerdict {
    /// Directory relative to the module root.
    pub directory: String,
    /// Whether at least one license in the directory is allow-listed.
    pub compliant: bool,
    /// License types found in the directory, sorted and deduplicated.
    pub license_types: Vec<String>,
}

/// Aggregate redistributability plus the per-directory breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedistributabilityReport {
    /// Whether the whole entity may be displayed.
    pub redistributable: bool,
    /// One entry per directory holding license files, sorted by directory.
    pub directories: Vec<DirectoryVerdict>,
}

/// The set of license types whose content may be redistributed.
///
/// Matching is by exact string identity. The list is injected so that
/// deployments can tighten or extend it without touching the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedistributionPolicy {
    allowed: BTreeSet<String>,
    /// When set, a compliant license must also exist at the root directory.
    #[serde(default)]
    require_root_license: bool,
}

impl Default for RedistributionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_REDISTRIBUTABLE_LICENSES.iter().copied())
    }
}

impl RedistributionPolicy {
    /// Build a policy from an allow-list of license types.
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            require_root_license: false,
        }
    }

    /// Require a license file at the root directory in addition to the
    /// per-directory rule.
    pub fn with_root_license_required(mut self, required: bool) -> Self {
        self.require_root_license = required;
        self
    }

    /// Whether `license_type` is on the allow-list.
    pub fn allows(&self, license_type: &str) -> bool {
        self.allowed.contains(license_type)
    }

    /// Evaluate all records, returning the verdict and per-directory detail.
    pub fn evaluate<R: AsRef<LicenseRecord>>(&self, records: &[R]) -> RedistributabilityReport {
        let mut by_dir: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for record in records {
            let record: &LicenseRecord = record.as_ref();
            by_dir
                .entry(record.directory())
                .or_default()
                .insert(record.license_type.as_str());
        }

        let directories: Vec<DirectoryVerdict> = by_dir
            .into_iter()
            .map(|(dir, types)| DirectoryVerdict {
                directory: dir.to_string(),
                compliant: types.iter().any(|t| self.allows(t)),
                license_types: types.into_iter().map(str::to_string).collect(),
            })
            .collect();

        let has_any_license = !directories.is_empty();
        let all_compliant = directories.iter().all(|d| d.compliant);
        let root_ok = !self.require_root_license
            || directories.iter().any(|d| d.directory == ROOT_DIR);

        RedistributabilityReport {
            redistributable: has_any_license && all_compliant && root_ok,
            directories,
        }
    }

    /// Whether content covered by `records` is redistributable.
    pub fn is_redistributable<R: AsRef<LicenseRecord>>(&self, records: &[R]) -> bool {
        self.evaluate(records).redistributable
    }

    /// Evaluate a package whose directory within its module is
    /// `package_dir`, using only records at or above that directory.
    ///
    /// License files in sibling or nested directories belong to other
    /// packages and do not affect this one.
    pub fn evaluate_package<R: AsRef<LicenseRecord>>(
        &self,
        records: &[R],
        package_dir: &str,
    ) -> RedistributabilityReport {
        let package_dir = normalize_dir(package_dir);
        let scoped: Vec<&LicenseRecord> = records
            .iter()
            .map(|r| AsRef::<LicenseRecord>::as_ref(r))
            .filter(|r| is_at_or_above(r.directory(), package_dir))
            .collect();
        self.evaluate(&scoped)
    }
}

fn normalize_dir(dir: &str) -> &str {
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
        ROOT_DIR
    } else {
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lic(t: &str, p: &str) -> LicenseRecord {
        LicenseRecord::new(t, p)
    }

    fn policy() -> RedistributionPolicy {
        RedistributionPolicy::new(["MIT", "BSD-3-Clause", "BSD-0-Clause", "Apache-2.0"])
    }

    #[test]
    fn no_records_is_not_redistributable() {
        let records: Vec<LicenseRecord> = vec![];
        assert!(!policy().is_redistributable(&records));
        assert!(policy().evaluate(&records).directories.is_empty());
    }

    #[test]
    fn single_root_license() {
        assert!(policy().is_redistributable(&[lic("MIT", "LICENSE")]));
    }

    #[test]
    fn non_redistributable_root_license() {
        assert!(!policy().is_redistributable(&[lic("AGPL-3.0", "LICENSE")]));
    }

    #[test]
    fn non_compliant_subdirectory_blocks_entity() {
        let records = [lic("MIT", "LICENSE"), lic("AGPL-3.0", "sub/LICENSE")];
        let report = policy().evaluate(&records);
        assert!(!report.redistributable);
        let blocking: Vec<_> = report
            .directories
            .iter()
            .filter(|d| !d.compliant)
            .map(|d| d.directory.as_str())
            .collect();
        assert_eq!(blocking, vec!["sub"]);
    }

    #[test]
    fn compliant_subdirectory() {
        let records = [lic("MIT", "LICENSE"), lic("MIT", "sub/LICENSE")];
        assert!(policy().is_redistributable(&records));
    }

    #[test]
    fn multiple_redistributable_directories() {
        let records = [lic("BSD-3-Clause", "LICENSE"), lic("MIT", "bar/LICENSE")];
        assert!(policy().is_redistributable(&records));
    }

    #[test]
    fn not_all_redistributable() {
        let records = [
            lic("BSD-3-Clause", "LICENSE"),
            lic("AGPL-3.0", "foo/LICENSE"),
            lic("MIT", "foo/bar/LICENSE"),
        ];
        assert!(!policy().is_redistributable(&records));
    }

    #[test]
    fn one_allowed_license_per_directory_suffices() {
        let records = [
            lic("BSD-3-Clause", "LICENSE"),
            lic("BSD-0-Clause", "LICENSE.txt"),
            lic("AGPL-3.0", "foo/LICENSE"),
            lic("MIT", "foo/COPYING"),
        ];
        let report = policy().evaluate(&records);
        assert!(report.redistributable);
        assert_eq!(report.directories.len(), 2);
        assert_eq!(
            report.directories[1].license_types,
            vec!["AGPL-3.0".to_string(), "MIT".to_string()]
        );
    }

    #[test]
    fn license_only_in_subdirectory() {
        let records = [lic("MIT", "bar/LICENSE")];
        assert!(policy().is_redistributable(&records));
        assert!(!policy()
            .with_root_license_required(true)
            .is_redistributable(&records));
    }

    #[test]
    fn type_matching_is_exact() {
        assert!(!policy().is_redistributable(&[lic("mit", "LICENSE")]));
        assert!(!policy().is_redistributable(&[lic("MIT ", "LICENSE")]));
    }

    #[test]
    fn package_scope_ignores_sibling_directories() {
        let records = [
            lic("MIT", "LICENSE"),
            lic("AGPL-3.0", "a/LICENSE"),
            lic("Apache-2.0", "b/c/LICENSE"),
        ];
        let scoped = |dir: &str| policy().evaluate_package(&records, dir).redistributable;
        assert!(!policy().is_redistributable(&records));
        assert!(scoped("b/c"));
        assert!(scoped("b/c/d"));
        assert!(scoped("."));
        assert!(scoped(""));
        assert!(!scoped("a"));
        assert!(!scoped("a/x"));
        // "ab" is not inside "a".
        assert!(scoped("ab"));

        let dirs: Vec<_> = policy()
            .evaluate_package(&records, "b/c")
            .directories
            .into_iter()
            .map(|d| d.directory)
            .collect();
        assert_eq!(dirs, vec![".".to_string(), "b/c".to_string()]);
    }

    #[test]
    fn directory_of_paths() {
        assert_eq!(directory_of("LICENSE"), ".");
        assert_eq!(directory_of("./LICENSE"), ".");
        assert_eq!(directory_of("a/LICENSE"), "a");
        assert_eq!(directory_of("a/b/LICENSE"), "a/b");
    }

    #[test]
    fn default_policy_covers_common_licenses() {
        let policy = RedistributionPolicy::default();
        for t in ["MIT", "Apache-2.0", "BSD-3-Clause", "ISC"] {
            assert!(policy.allows(t), "{t} should be allowed by default");
        }
        assert!(!policy.allows("UNKNOWN"));
    }

    #[test]
    fn license_serde_uses_type_key() {
        let license = License {
            record: lic("MIT", "LICENSE"),
            contents: "text".into(),
        };
        let json = serde_json::to_value(&license).unwrap();
        assert_eq!(json["type"], "MIT");
        assert_eq!(json["file_path"], "LICENSE");
        assert_eq!(json["contents"], "text");
    }
}
