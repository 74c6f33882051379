//! Type whitelist: the decision engine consulted before a type is
//! instantiated from a serialized document.
//!
//! A whitelist starts `Configurable`, takes rules from trusted setup code
//! through `&mut self` mutators, and is then frozen and shared read-only
//! (typically as `Arc<TypeWhitelist>`). There is no interior mutability, so
//! once frozen any number of threads may query it without synchronization.
//!
//! Matching order is exact type, then package, then patterns in insertion
//! order. Every rule kind independently implies "allowed", so the order only
//! affects evaluation cost, never the outcome.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, trace, warn, Level};
use typegate_core::error::{Result, TypeGateError};
use typegate_core::name::{
    parse_package_name, PackageEntry, RuleEntry, RustType, TypeEntry, TypeHandle,
};

use super::rules::{compile_patterns, first_match, PatternRule};
use crate::config::WhitelistConfig;

/// Lifecycle of a whitelist. The only transition is `Configurable -> Frozen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Configurable,
    Frozen,
}

/// Seam consumed by deserializers.
pub trait TypeGuard: Send + Sync {
    fn is_allowed(&self, name: &str) -> bool;

    fn ensure_allowed(&self, name: &str) -> Result<()> {
        if self.is_allowed(name) {
            Ok(())
        } else {
            Err(TypeGateError::TypeNotAllowed(name.to_string()))
        }
    }
}

#[derive(Debug)]
pub struct TypeWhitelist {
    allow_all: bool,
    allowed_types: HashSet<String>,
    allowed_packages: HashSet<String>,
    allowed_patterns: Vec<PatternRule>,
    state: Lifecycle,
}

impl Default for TypeWhitelist {
    fn default() -> Self {
        Self {
            allow_all: false,
            allowed_types: HashSet::new(),
            allowed_packages: HashSet::new(),
            allowed_patterns: Vec::new(),
            state: Lifecycle::Configurable,
        }
    }
}

impl TypeWhitelist {
    /// Build a configurable whitelist seeded from `config`.
    ///
    /// Fails with `PatternCompilation` naming the first pattern that does not
    /// compile. List entries are trimmed; blank ones are ignored.
    pub fn new(config: &WhitelistConfig) -> Result<Self> {
        let mut wl = Self {
            allow_all: config.allow_all,
            ..Self::default()
        };
        if wl.allow_all {
            warn!("all types are allowed");
        }

        wl.allowed_types.extend(trimmed(&config.allowed_types));
        wl.allowed_packages.extend(trimmed(&config.allowed_packages));
        let sources: Vec<String> = trimmed(&config.allowed_patterns).collect();
        wl.allowed_patterns = compile_patterns(&sources)?;

        if tracing::enabled!(Level::TRACE) {
            for name in sorted(&wl.allowed_types) {
                trace!(type_name = %name, "default allowed type");
            }
            for name in sorted(&wl.allowed_packages) {
                trace!(package = %name, "default allowed package");
            }
            for pattern in &wl.allowed_patterns {
                trace!(%pattern, "default allowed pattern");
            }
        }

        Ok(wl)
    }

    /// Build from the `TYPEGATE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&WhitelistConfig::from_env()?)
    }

    // ---- lifecycle ----

    pub fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    pub fn is_frozen(&self) -> bool {
        self.state == Lifecycle::Frozen
    }

    /// Make the rule set immutable. Freezing twice is an error.
    pub fn freeze(&mut self) -> Result<()> {
        if self.is_frozen() {
            return Err(TypeGateError::AlreadyFrozen);
        }
        self.state = Lifecycle::Frozen;
        debug!(
            types = self.allowed_types.len(),
            packages = self.allowed_packages.len(),
            patterns = self.allowed_patterns.len(),
            allow_all = self.allow_all,
            "type whitelist frozen"
        );
        Ok(())
    }

    /// Freeze (if still configurable) and wrap for sharing across threads.
    pub fn into_shared(mut self) -> Result<Arc<Self>> {
        if !self.is_frozen() {
            self.freeze()?;
        }
        Ok(Arc::new(self))
    }

    fn ensure_configurable(&self) -> Result<()> {
        match self.state {
            Lifecycle::Configurable => Ok(()),
            Lifecycle::Frozen => Err(TypeGateError::PolicyFrozen),
        }
    }

    // ---- mutation ----

    /// Allow exact type names. `None` entries are skipped.
    pub fn allow_type<I>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: RuleEntry,
    {
        self.ensure_configurable()?;
        for name in collect_names(names) {
            trace!(type_name = %name, "allow type");
            self.allowed_types.insert(name);
        }
        Ok(())
    }

    /// Allow types by handle, using their canonical names. `None` entries
    /// are skipped.
    pub fn allow_type_handles<I>(&mut self, handles: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: TypeEntry,
    {
        self.ensure_configurable()?;
        let names: Vec<String> = handles
            .into_iter()
            .filter_map(|h| h.type_entry().map(Cow::into_owned))
            .collect();
        self.allow_type(names)
    }

    pub fn allow_type_of<T: ?Sized>(&mut self) -> Result<()> {
        self.allow_type_handles([RustType::of::<T>()])
    }

    /// Allow every type directly inside the named packages (not sub-packages).
    pub fn allow_package<I>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: RuleEntry,
    {
        self.ensure_configurable()?;
        for name in collect_names(names) {
            trace!(package = %name, "allow package");
            self.allowed_packages.insert(name);
        }
        Ok(())
    }

    pub fn allow_package_handles<I>(&mut self, packages: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: PackageEntry,
    {
        self.ensure_configurable()?;
        let names: Vec<String> = packages
            .into_iter()
            .filter_map(|p| p.package_entry().map(Cow::into_owned))
            .collect();
        self.allow_package(names)
    }

    /// Allow the package `T` lives in.
    pub fn allow_package_of<T: ?Sized>(&mut self) -> Result<()> {
        self.allow_package_handles([RustType::of::<T>().package()])
    }

    /// Append pattern rules in call order. Either every source compiles and
    /// all are appended, or none is.
    pub fn allow_pattern<I>(&mut self, sources: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: RuleEntry,
    {
        self.ensure_configurable()?;
        let mut compiled = Vec::new();
        for item in sources {
            if let Some(source) = item.entry() {
                compiled.push(PatternRule::compile(source)?);
            }
        }
        self.push_patterns(compiled);
        Ok(())
    }

    /// Append already compiled regexes (re-anchored for full-string match).
    pub fn allow_regex<'a, I>(&mut self, regexes: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Regex>,
    {
        self.ensure_configurable()?;
        let compiled = regexes
            .into_iter()
            .map(PatternRule::from_regex)
            .collect::<Result<Vec<_>>>()?;
        self.push_patterns(compiled);
        Ok(())
    }

    fn push_patterns(&mut self, compiled: Vec<PatternRule>) {
        for pattern in compiled {
            trace!(%pattern, "allow pattern");
            self.allowed_patterns.push(pattern);
        }
    }

    // ---- query ----

    pub fn is_allowed(&self, name: &str) -> bool {
        if self.allow_all {
            trace!(type_name = name, "all types allowed");
            return true;
        }

        if self.allowed_types.contains(name) {
            trace!(type_name = name, "type allowed");
            return true;
        }

        let package = parse_package_name(name);
        if self.allowed_packages.contains(package) {
            trace!(type_name = name, package, "package allowed");
            return true;
        }

        if let Some(pattern) = first_match(&self.allowed_patterns, name) {
            trace!(type_name = name, %pattern, "type allowed by pattern");
            return true;
        }

        warn!(type_name = name, "type NOT allowed");
        false
    }

    pub fn is_type_allowed<H: TypeHandle>(&self, handle: &H) -> bool {
        self.is_allowed(&handle.canonical_name())
    }

    /// Fail with `TypeNotAllowed` carrying `name` when it is denied.
    pub fn ensure_allowed(&self, name: &str) -> Result<()> {
        if self.is_allowed(name) {
            Ok(())
        } else {
            Err(TypeGateError::TypeNotAllowed(name.to_string()))
        }
    }

    pub fn ensure_type_allowed<H: TypeHandle>(&self, handle: &H) -> Result<()> {
        self.ensure_allowed(&handle.canonical_name())
    }

    // ---- snapshots ----

    pub fn is_allow_all(&self) -> bool {
        self.allow_all
    }

    /// Allowed exact type names, sorted.
    pub fn allowed_types(&self) -> Vec<String> {
        sorted(&self.allowed_types)
    }

    /// Allowed package names, sorted.
    pub fn allowed_packages(&self) -> Vec<String> {
        sorted(&self.allowed_packages)
    }

    /// Pattern sources in evaluation order.
    pub fn allowed_patterns(&self) -> Vec<&str> {
        self.allowed_patterns.iter().map(PatternRule::source).collect()
    }
}

impl TypeGuard for TypeWhitelist {
    fn is_allowed(&self, name: &str) -> bool {
        TypeWhitelist::is_allowed(self, name)
    }
}

impl<G: TypeGuard + ?Sized> TypeGuard for Arc<G> {
    fn is_allowed(&self, name: &str) -> bool {
        (**self).is_allowed(name)
    }

    fn ensure_allowed(&self, name: &str) -> Result<()> {
        (**self).ensure_allowed(name)
    }
}

impl fmt::Display for TypeWhitelist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TypeWhitelist{{allow_all={}, allowed_types={:?}, allowed_packages={:?}, allowed_patterns={:?}}}",
            self.allow_all,
            self.allowed_types(),
            self.allowed_packages(),
            self.allowed_patterns(),
        )
    }
}

fn collect_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: RuleEntry,
{
    names
        .into_iter()
        .filter_map(|item| item.entry().map(str::to_string))
        .collect()
}

fn trimmed(raw: &[String]) -> impl Iterator<Item = String> + '_ {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn sorted(set: &HashSet<String>) -> Vec<String> {
    let mut v: Vec<String> = set.iter().cloned().collect();
    v.sort();
    v
}
