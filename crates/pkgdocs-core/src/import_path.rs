//! # Import Paths
//!
//! Syntactic validation of import paths and the standard-library
//! heuristic used when resolving URLs.
//!
//! The rules match the Go module tooling's import path check: ASCII
//! letters, digits and `-._~` only, no empty or all-dot elements, no
//! trailing dots, and no element that would collide with a reserved
//! Windows device name or a short-name alias.

use crate::error::ValidationError;

/// Element stems that are reserved device names on Windows.
const BAD_WINDOWS_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Check that `path` is a syntactically well-formed import path.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidImportPath`] naming the violated rule.
pub fn check_import_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::import_path(path, "empty string"));
    }
    if path.starts_with('-') {
        return Err(ValidationError::import_path(path, "leading dash"));
    }
    if path.contains("//") {
        return Err(ValidationError::import_path(path, "double slash"));
    }
    if path.ends_with('/') {
        return Err(ValidationError::import_path(path, "trailing slash"));
    }
    for elem in path.split('/') {
        check_elem(path, elem)?;
    }
    Ok(())
}

fn check_elem(path: &str, elem: &str) -> Result<(), ValidationError> {
    if elem.is_empty() {
        return Err(ValidationError::import_path(path, "empty path element"));
    }
    if elem.bytes().all(|b| b == b'.') {
        return Err(ValidationError::import_path(
            path,
            format!("invalid path element \"{elem}\""),
        ));
    }
    if elem.starts_with('.') {
        return Err(ValidationError::import_path(
            path,
            "leading dot in path element",
        ));
    }
    if elem.ends_with('.') {
        return Err(ValidationError::import_path(
            path,
            "trailing dot in path element",
        ));
    }
    if let Some(c) = elem.chars().find(|c| !import_path_ok(*c)) {
        return Err(ValidationError::import_path(
            path,
            format!("invalid char {c:?}"),
        ));
    }

    let stem = elem.split('.').next().unwrap_or(elem);
    if BAD_WINDOWS_NAMES
        .iter()
        .any(|bad| bad.eq_ignore_ascii_case(stem))
    {
        return Err(ValidationError::import_path(
            path,
            format!("\"{stem}\" disallowed as path element component on Windows"),
        ));
    }
    if let Some(i) = stem.rfind('~') {
        let suffix = &stem[i + 1..];
        if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::import_path(
                path,
                format!("trailing tilde and digits in path element \"{elem}\""),
            ));
        }
    }
    Ok(())
}

fn import_path_ok(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// Whether `path` is assumed to belong to the standard library.
///
/// Import paths whose first element contains a dot are hosted elsewhere;
/// those without are treated as standard-library paths. This is a syntactic
/// approximation, not a registry lookup.
pub fn in_std_lib(path: &str) -> bool {
    let first = path.split('/').next().unwrap_or(path);
    !first.contains('.')
}

/// Split a path into its prefix and major-version suffix.
///
/// `github.com/a/b/v2` splits into `("github.com/a/b", "/v2")`,
/// `gopkg.in/yaml.v2` into `("gopkg.in/yaml", ".v2")`. Paths without a
/// major-version suffix are returned whole with an empty suffix.
pub fn split_path_version(path: &str) -> (&str, &str) {
    if path.starts_with("gopkg.in/") {
        if let Some(i) = path.rfind(".v") {
            if is_major(&path[i + 2..], true) {
                return (&path[..i], &path[i..]);
            }
        }
        return (path, "");
    }
    if let Some(i) = path.rfind("/v") {
        if is_major(&path[i + 2..], false) {
            return (&path[..i], &path[i..]);
        }
    }
    (path, "")
}

/// Whether `s` is a major version number usable as a path suffix.
///
/// `/v0` and `/v1` are never valid suffixes outside gopkg.in.
fn is_major(s: &str, allow_v0_v1: bool) -> bool {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if s.len() > 1 && s.starts_with('0') {
        return false;
    }
    allow_v0_v1 || !(s == "0" || s == "1")
}
