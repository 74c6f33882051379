//! Top-level facade crate for typegate.
//!
//! Re-exports core types and the policy library so users can depend on a single crate.

pub mod core {
    pub use typegate_core::*;
}

pub mod policy {
    pub use typegate_policy::*;
}

pub use typegate_core::{Result, TypeGateError};
pub use typegate_policy::{TypeGuard, TypeWhitelist, WhitelistConfig};
