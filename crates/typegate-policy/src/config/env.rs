//! Environment-backed configuration.
//!
//! Each setting is a single variable; list values are comma-separated and
//! every element is trimmed.

use typegate_core::error::{Result, TypeGateError};

use super::schema::WhitelistConfig;

pub const ALLOW_ALL_VAR: &str = "TYPEGATE_ALLOW_ALL";
pub const ALLOWED_TYPES_VAR: &str = "TYPEGATE_ALLOWED_TYPES";
pub const ALLOWED_PACKAGES_VAR: &str = "TYPEGATE_ALLOWED_PACKAGES";
pub const ALLOWED_PATTERNS_VAR: &str = "TYPEGATE_ALLOWED_PATTERNS";

impl WhitelistConfig {
    /// Read the `TYPEGATE_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns `None` for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let allow_all = match lookup(ALLOW_ALL_VAR) {
            Some(v) => parse_bool(ALLOW_ALL_VAR, &v)?,
            None => false,
        };
        Ok(Self {
            allow_all,
            allowed_types: split_list(lookup(ALLOWED_TYPES_VAR).as_deref()),
            allowed_packages: split_list(lookup(ALLOWED_PACKAGES_VAR).as_deref()),
            allowed_patterns: split_list(lookup(ALLOWED_PATTERNS_VAR).as_deref()),
        })
    }
}

/// Split a comma-separated value, trimming elements and dropping empty ones.
///
/// Patterns containing a literal comma (e.g. `a{1,3}`) cannot be expressed
/// this way; use a YAML config file for those.
pub fn split_list(value: Option<&str>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `true`/`false`, case-insensitive, surrounding whitespace ignored.
pub fn parse_bool(key: &str, value: &str) -> Result<bool> {
    let v = value.trim();
    if v.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if v.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(TypeGateError::InvalidArgument(format!(
            "{key} must be true or false, got `{v}`"
        )))
    }
}
