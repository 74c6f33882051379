//! Policy layer (type whitelist and pattern rules).
//!
//! Compiles whitelist configuration into lookup structures that deserializers
//! consult before instantiating a type.

pub mod rules;
pub mod whitelist;

pub use rules::PatternRule;
pub use whitelist::{Lifecycle, TypeGuard, TypeWhitelist};
