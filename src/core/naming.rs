//! core::naming
//!
//! Branch naming rules.
//!
//! # Features
//!
//! - Sanitize free-form input into a usable branch name
//! - Compose `type/area/name` branch names for the branch action

use thiserror::Error;

/// Errors from branch naming.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NamingError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),
}

/// Area value that composes `type/name` instead of `type/area/name`.
pub const NO_AREA: &str = "other";

fn is_branch_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/'
}

/// Sanitize a branch name.
///
/// Every character outside `[A-Za-z0-9-_/]` becomes `-`, then leading and
/// trailing `-` and `/` are trimmed.
///
/// # Errors
///
/// [`NamingError::InvalidBranchName`] if nothing is left.
///
/// # Example
///
/// ```
/// use gitkit::core::naming::sanitize_branch_name;
///
/// assert_eq!(
///     sanitize_branch_name("feature/test@branch#123").unwrap(),
///     "feature/test-branch-123"
/// );
/// assert!(sanitize_branch_name("###").is_err());
/// ```
pub fn sanitize_branch_name(name: &str) -> Result<String, NamingError> {
    let replaced: String = name
        .chars()
        .map(|c| if is_branch_char(c) { c } else { '-' })
        .collect();

    let trimmed = replaced.trim_matches(|c| c == '-' || c == '/');
    if trimmed.is_empty() {
        return Err(NamingError::InvalidBranchName(name.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Compose a branch name from its parts.
///
/// The name is sanitized and any `<prefix>/` or `<area>/` already typed
/// into it is removed. An area of [`NO_AREA`] (or an empty area) yields
/// `type/name`; anything else yields `type/area/name`.
///
/// # Example
///
/// ```
/// use gitkit::core::naming::format_branch_name;
///
/// assert_eq!(
///     format_branch_name("Login Page", "feature", "api", "").unwrap(),
///     "feature/api/Login-Page"
/// );
/// assert_eq!(
///     format_branch_name("crash", "fix", "other", "").unwrap(),
///     "fix/crash"
/// );
/// ```
pub fn format_branch_name(
    name: &str,
    kind: &str,
    area: &str,
    prefix: &str,
) -> Result<String, NamingError> {
    let original = name;
    let mut name = sanitize_branch_name(name)?;
    let area = sanitize_branch_name(area).unwrap_or_default();
    let prefix = prefix.trim().trim_matches('/');

    for strip in [prefix, area.as_str()] {
        if !strip.is_empty() {
            name = name.replace(&format!("{}/", strip), "");
        }
    }

    let name = collapse_slashes(&name);
    let name = name.trim_matches('/');
    if name.is_empty() {
        return Err(NamingError::InvalidBranchName(original.to_string()));
    }

    let kind = sanitize_branch_name(kind)?;
    if area.is_empty() || area == NO_AREA {
        Ok(format!("{}/{}", kind, name))
    } else {
        Ok(format!("{}/{}/{}", kind, area, name))
    }
}

fn collapse_slashes(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_slash = false;
    for c in name.chars() {
        if c == '/' {
            if !last_slash {
                out.push(c);
            }
            last_slash = true;
        } else {
            out.push(c);
            last_slash = false;
        }
    }
    out
}
