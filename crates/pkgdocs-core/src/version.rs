//! # Versions
//!
//! Requested versions are either the [`Version::Latest`] sentinel or a
//! concrete version string taken verbatim from the URL. Concrete versions
//! are not validated at parse time; the fetch policy rejects invalid ones
//! with a user-facing message.
//!
//! ## Semantic version syntax
//!
//! Versions follow the Go module convention: a mandatory `v` prefix, a
//! numeric major component, and optional minor and patch components.
//! The shorthands `vX` and `vX.Y` are accepted only without prerelease or
//! build metadata. The numeric core and metadata rules are checked by the
//! `semver` crate after normalizing to a full `X.Y.Z` triple.
//!
//! Core components are unbounded decimal numbers. `semver` stores them as
//! `u64`, so a component too wide for that is narrowed before the syntax
//! check. Such versions are valid but carry no precedence: [`compare`] and
//! [`latest_order`] rank them with the unparseable ones.

use serde::{Deserialize, Serialize};

/// URL literal selecting the latest available version.
pub const LATEST: &str = "latest";

/// A version as requested by a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Version {
    /// The latest version available for the path.
    Latest,
    /// A specific version string, unvalidated.
    Specific(String),
}

impl Version {
    /// Interpret a URL version segment. The literal `latest` maps to
    /// [`Version::Latest`]; anything else is kept verbatim.
    pub fn parse(raw: &str) -> Self {
        if raw == LATEST {
            Self::Latest
        } else {
            Self::Specific(raw.to_string())
        }
    }

    /// Whether this is the latest-version sentinel.
    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }

    /// The string form used in URLs.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Latest => LATEST,
            Self::Specific(v) => v,
        }
    }

    /// Whether the version is the sentinel or a valid semantic version.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Latest => true,
            Self::Specific(v) => is_valid_semver(v),
        }
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        if s == LATEST {
            Self::Latest
        } else {
            Self::Specific(s)
        }
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        match v {
            Version::Latest => LATEST.to_string(),
            Version::Specific(s) => s,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `v` is a valid Go-style semantic version (`v1`, `v1.2`,
/// `v1.2.3`, `v1.2.3-pre.1+build`).
pub fn is_valid_semver(v: &str) -> bool {
    parse_semver(v).is_some()
        || narrow_wide_core(v).is_some_and(|narrowed| parse_semver(&narrowed).is_some())
}

/// `v` with each core component too wide for `u64` replaced by `1`, or
/// `None` when no component needed it.
fn narrow_wide_core(v: &str) -> Option<String> {
    let rest = v.strip_prefix('v')?;
    let (core, tail) = rest.split_at(rest.find(['-', '+']).unwrap_or(rest.len()));
    let mut narrowed = false;
    let parts: Vec<&str> = core
        .split('.')
        .map(|part| {
            let wide = !part.is_empty()
                && !part.starts_with('0')
                && part.bytes().all(|b| b.is_ascii_digit())
                && part.parse::<u64>().is_err();
            if wide {
                narrowed = true;
                "1"
            } else {
                part
            }
        })
        .collect();
    narrowed.then(|| format!("v{}{tail}", parts.join(".")))
}

/// Order two versions for "latest" selection.
///
/// Releases sort above prereleases, which sort above pseudo-versions; within
/// a class, semantic version precedence applies. Invalid versions sort below
/// every valid one.
pub fn latest_order(a: &str, b: &str) -> std::cmp::Ordering {
    fn key(v: &str) -> (u8, Option<semver::Version>) {
        let rank = match VersionType::of(v) {
            Some(VersionType::Release) => 3,
            Some(VersionType::Prerelease) => 2,
            Some(VersionType::Pseudo) => 1,
            None => 0,
        };
        (rank, parse_semver(v))
    }
    key(a).cmp(&key(b))
}

/// Order two versions by semantic version precedence alone.
///
/// Invalid versions sort below every valid one and compare equal to each
/// other.
pub fn compare(a: &str, b: &str) -> std::cmp::Ordering {
    parse_semver(a).cmp(&parse_semver(b))
}

/// Parse a Go-style semantic version into its canonical `semver` form.
pub(crate) fn parse_semver(v: &str) -> Option<semver::Version> {
    let rest = v.strip_prefix('v')?;
    if rest.contains(['-', '+']) {
        return semver::Version::parse(rest).ok();
    }
    let mut normalized = rest.to_string();
    match rest.split('.').count() {
        1 => normalized.push_str(".0.0"),
        2 => normalized.push_str(".0"),
        _ => {}
    }
    semver::Version::parse(&normalized).ok()
}

/// Classification of a module version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    /// A tagged release such as `v1.2.3`.
    Release,
    /// A tagged prerelease such as `v1.2.3-beta.1`.
    Prerelease,
    /// A pseudo-version derived from a commit, e.g.
    /// `v0.0.0-20190101000000-abcdef123456`.
    Pseudo,
}

impl VersionType {
    /// Classify a valid semantic version. Returns `None` for invalid input.
    pub fn of(v: &str) -> Option<Self> {
        let parsed = parse_semver(v)?;
        if parsed.pre.is_empty() {
            return Some(Self::Release);
        }
        if is_pseudo_prerelease(parsed.pre.as_str()) {
            Some(Self::Pseudo)
        } else {
            Some(Self::Prerelease)
        }
    }
}

/// Pseudo-version prereleases end in `<14-digit timestamp>-<12 hex chars>`,
/// optionally preceded by `0.` or a prerelease identifier and a dot.
fn is_pseudo_prerelease(pre: &str) -> bool {
    let Some((head, rev)) = pre.rsplit_once('-') else {
        return false;
    };
    let timestamp = head.rsplit('.').next().unwrap_or(head);
    rev.len() == 12
        && rev.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
        && timestamp.len() == 14
        && timestamp.bytes().all(|b| b.is_ascii_digit())
}
