use serde::Deserialize;
use typegate_core::error::{Result, TypeGateError};

/// Seed rules for a [`crate::policy::TypeWhitelist`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhitelistConfig {
    #[serde(default)]
    pub allow_all: bool,

    #[serde(default)]
    pub allowed_types: Vec<String>,

    #[serde(default)]
    pub allowed_packages: Vec<String>,

    /// Regex sources, compiled with full-string match semantics.
    #[serde(default)]
    pub allowed_patterns: Vec<String>,
}

impl WhitelistConfig {
    pub fn validate(&self) -> Result<()> {
        check_entries("allowed_types", &self.allowed_types)?;
        check_entries("allowed_packages", &self.allowed_packages)?;
        check_entries("allowed_patterns", &self.allowed_patterns)?;
        Ok(())
    }
}

fn check_entries(field: &str, entries: &[String]) -> Result<()> {
    if let Some(i) = entries.iter().position(|e| e.trim().is_empty()) {
        return Err(TypeGateError::InvalidArgument(format!(
            "{field}[{i}] must not be blank"
        )));
    }
    Ok(())
}
