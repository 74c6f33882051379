//! typegate core: error taxonomy and type-name primitives.
//!
//! This crate defines the error surface and the name model shared by the
//! policy engine and its callers (deserializers consulting the policy). It
//! intentionally carries no regex, I/O or logging dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `TypeGateError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod name;

/// Shared result type.
pub use error::{ErrorCode, Result, TypeGateError};
pub use name::{
    parse_package_name, Package, PackageEntry, PackageHandle, RuleEntry, RustType, TypeEntry,
    TypeHandle, DEFAULT_PACKAGE_NAME,
};
