//! # Presentation Helpers
//!
//! URL construction, breadcrumb markup, titles and the other small
//! string-producing helpers that feed the page model. All functions are
//! pure; the current time is passed in explicitly.

use chrono::{DateTime, Utc};
use url::form_urlencoded;

use pkgdocs_core::{split_path_version, stdlib, Version};

/// URL of a module page. Standard library pages live at `/std`, every
/// other module under `/mod/`.
pub fn construct_module_url(module_path: &str, version: &Version) -> String {
    let mut url = String::from("/");
    if module_path != stdlib::MODULE_PATH {
        url.push_str("mod/");
    }
    url.push_str(module_path);
    if let Version::Specific(v) = version {
        url.push('@');
        url.push_str(v);
    }
    url
}

/// URL of a package page at `version`.
///
/// Packages nested in a module place the version after the module path:
/// `/<module>@<version>/<suffix>`.
pub fn construct_package_url(pkg_path: &str, module_path: &str, version: &Version) -> String {
    let Version::Specific(v) = version else {
        return format!("/{pkg_path}");
    };
    if pkg_path == module_path || module_path == stdlib::MODULE_PATH {
        return format!("/{pkg_path}@{v}");
    }
    let suffix = pkg_path
        .strip_prefix(module_path)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(pkg_path);
    format!("/{module_path}@{v}/{suffix}")
}

/// Go's `path.Dir` for clean, relative paths.
fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..i],
        None => ".",
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// HTML for the breadcrumb trail of `pkg_path`.
///
/// Every ancestor down to the module path (for the standard library, down
/// to the first element) becomes a link; the current element is plain text.
pub fn breadcrumb_path(pkg_path: &str, module_path: &str, version: &Version) -> String {
    let min_len = if module_path == stdlib::MODULE_PATH {
        1
    } else {
        module_path.len().saturating_sub(1)
    };

    let mut dirs: Vec<&str> = Vec::new();
    let mut dir = pkg_path;
    while dir.len() > min_len && parent_dir(dir).len() < dir.len() {
        dirs.push(dir);
        dir = parent_dir(dir);
    }
    if dirs.is_empty() {
        dirs.push(pkg_path);
    }

    let mut elems: Vec<String> = Vec::with_capacity(dirs.len());
    let last = dirs.len() - 1;
    for (i, d) in dirs.iter().enumerate().rev() {
        if i == 0 {
            let current = if last > 0 { base_name(d) } else { d };
            elems.push(format!(
                r#"<span class="DetailsHeader-breadcrumbCurrent">{}</span>"#,
                escape_html(current)
            ));
            continue;
        }
        let mut href = format!("/{d}");
        if let Version::Specific(v) = version {
            href.push('@');
            href.push_str(v);
        }
        let text = if i == last { d } else { base_name(d) };
        elems.push(format!(
            r#"<a href="{}">{}</a>"#,
            escape_html(&href),
            escape_html(text)
        ));
    }

    format!(
        r#"<div class="DetailsHeader-breadcrumb">{}</div>"#,
        elems.join(r#"<span class="DetailsHeader-breadcrumbDivider">/</span>"#)
    )
}

/// Package name, or for commands the last element of the path without any
/// major-version suffix.
pub fn effective_name(name: &str, pkg_path: &str) -> String {
    if name != "main" {
        return name.to_string();
    }
    let prefix = match pkg_path.strip_suffix("/v1") {
        Some(p) => p,
        None => split_path_version(pkg_path).0,
    };
    base_name(prefix).to_string()
}

/// Title of a package page.
pub fn package_title(name: &str, pkg_path: &str) -> String {
    if name == "main" {
        format!("Command {}", effective_name(name, pkg_path))
    } else {
        format!("Package {name}")
    }
}

/// Title of a module page.
pub fn module_title(module_path: &str) -> String {
    if module_path == stdlib::MODULE_PATH {
        "Standard library".to_string()
    } else {
        format!("Module {module_path}")
    }
}

/// Human-readable age of `date` relative to `now`.
///
/// Under six hours the age is given in hours, under a day as `today`, under
/// six days in days, and otherwise as a date like `Jan  2, 2006`.
pub fn elapsed_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - date).num_hours();
    if hours == 1 {
        return "1 hour ago".to_string();
    }
    if hours < 6 {
        return format!("{hours} hours ago");
    }
    let days = hours / 24;
    match days {
        0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        2..=5 => format!("{days} days ago"),
        _ => date.format("%b %e, %Y").to_string(),
    }
}

/// Where `file_path` can be found: inside the module zip, or for the
/// standard library, in the Go source repository at the release tag.
pub fn file_source(module_path: &str, version: &str, file_path: &str) -> String {
    if module_path != stdlib::MODULE_PATH {
        return format!("{module_path}@{version}/{file_path}");
    }
    let root = stdlib::GO_REPO_URL
        .strip_prefix("https://")
        .unwrap_or(stdlib::GO_REPO_URL);
    match stdlib::tag_for_version(version) {
        Ok(tag) => format!("{root}/+/refs/tags/{tag}/{file_path}"),
        Err(err) => {
            tracing::error!(version, error = %err, "no release tag for standard library version");
            format!("{root}/+/refs/heads/master/{file_path}")
        }
    }
}

/// Secondary message suggesting a search for `path`.
pub fn suggested_search(path: &str) -> String {
    format!(
        r#"To search for packages like {}, <a href="/search?q={}">click here</a>.</p>"#,
        escape_html(path),
        form_urlencoded::byte_serialize(path.as_bytes()).collect::<String>()
    )
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
