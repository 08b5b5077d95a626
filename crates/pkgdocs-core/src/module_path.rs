//! # Module Path Resolution Outcome
//!
//! The module boundary of a requested package can be known from the URL,
//! unknowable until the package is looked up, or fixed because the path
//! belongs to the standard library. Modelling the three cases as variants
//! keeps callers from comparing against sentinel strings.

use serde::{Deserialize, Serialize};

use crate::stdlib;

/// Module path of a requested package, as far as the URL reveals it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ModulePath {
    /// The URL named the module explicitly (`<module>@<version>/<suffix>`).
    Known(String),
    /// The boundary between module and package suffix cannot be determined
    /// from the URL; the package must be looked up to find its module.
    Unknown,
    /// The path belongs to the standard library.
    StdLib,
}

impl ModulePath {
    /// The explicit module path, if known.
    pub fn known(&self) -> Option<&str> {
        match self {
            Self::Known(p) => Some(p),
            Self::Unknown | Self::StdLib => None,
        }
    }
}

impl std::fmt::Display for ModulePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(p) => f.write_str(p),
            Self::Unknown => f.write_str("<unknown>"),
            Self::StdLib => f.write_str(stdlib::MODULE_PATH),
        }
    }
}
