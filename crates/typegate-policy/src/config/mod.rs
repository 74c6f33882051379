//! Whitelist config loaders (strict YAML, environment).

pub mod env;
pub mod schema;

use std::fs;

use typegate_core::error::{Result, TypeGateError};

pub use schema::WhitelistConfig;

pub fn load_from_file(path: &str) -> Result<WhitelistConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TypeGateError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<WhitelistConfig> {
    let cfg: WhitelistConfig = serde_yaml::from_str(s)
        .map_err(|e| TypeGateError::InvalidArgument(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
