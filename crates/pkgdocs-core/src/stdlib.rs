//! Standard library constants and release tag mapping.

use crate::error::ValidationError;
use crate::version::parse_semver;

/// Module path under which the standard library is stored.
pub const MODULE_PATH: &str = "std";

/// Source repository of the standard library.
pub const GO_REPO_URL: &str = "https://go.googlesource.com/go";

/// Map a standard library module version to its repository release tag.
///
/// `v1.13.0` becomes `go1.13`, `v1.13.2` becomes `go1.13.2`, and
/// `v1.14.0-beta.1` becomes `go1.14beta1`.
///
/// # Errors
///
/// Returns [`ValidationError::NoStdlibTag`] if `version` is not a valid
/// semantic version.
pub fn tag_for_version(version: &str) -> Result<String, ValidationError> {
    let v = parse_semver(version)
        .ok_or_else(|| ValidationError::NoStdlibTag(version.to_string()))?;

    let mut tag = format!("go{}", v.major);
    if v.minor != 0 || v.patch != 0 {
        tag.push_str(&format!(".{}", v.minor));
    }
    if v.patch != 0 {
        tag.push_str(&format!(".{}", v.patch));
    }
    if !v.pre.is_empty() {
        tag.push_str(&v.pre.as_str().replace('.', ""));
    }
    Ok(tag)
}
