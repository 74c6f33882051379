//! typegate policy library entry.
//!
//! This crate wires configuration loading and the type whitelist engine
//! together. It is consumed by the `typegate-check` binary, by integration
//! tests, and by deserializers through the [`policy::TypeGuard`] seam.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod policy;

pub use config::WhitelistConfig;
pub use policy::{TypeGuard, TypeWhitelist};
