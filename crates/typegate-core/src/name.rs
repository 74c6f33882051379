//! Type and package name primitives.
//!
//! Type names are dot-separated (`a.b.C`). Rust paths (`a::b::C`) are
//! normalized to that form by the handle types below so that rules written
//! against dotted names also apply to types registered by handle.

use std::any::type_name;
use std::borrow::Cow;

/// Package label for names without a package qualifier.
///
/// Adding this label as an allowed package permits every package-less name.
/// A real package literally named `<default>` would collide with it.
pub const DEFAULT_PACKAGE_NAME: &str = "<default>";

/// Package portion of `name`: everything before the last `.`, or
/// [`DEFAULT_PACKAGE_NAME`] when there is no separator.
pub fn parse_package_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((package, _)) => package,
        None => DEFAULT_PACKAGE_NAME,
    }
}

/// Rewrite a Rust path into dotted form, dropping generic arguments.
pub fn normalize_path(path: &str) -> String {
    let base = match path.find('<') {
        Some(i) => &path[..i],
        None => path,
    };
    base.trim().replace("::", ".")
}

/// Anything that resolves to a canonical type name.
pub trait TypeHandle {
    fn canonical_name(&self) -> Cow<'_, str>;
}

/// Anything that resolves to a package name.
pub trait PackageHandle {
    fn package_name(&self) -> Cow<'_, str>;
}

/// Handle for a concrete Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RustType {
    name: String,
}

impl RustType {
    pub fn of<T: ?Sized>() -> Self {
        Self {
            name: normalize_path(type_name::<T>()),
        }
    }

    /// Package (module path) the type lives in.
    pub fn package(&self) -> Package {
        Package {
            name: parse_package_name(&self.name).to_string(),
        }
    }
}

impl TypeHandle for RustType {
    fn canonical_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

/// Handle for a package, usually built from `module_path!()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Package {
    name: String,
}

impl Package {
    pub fn new(path: &str) -> Self {
        Self {
            name: normalize_path(path),
        }
    }

    pub fn of<T: ?Sized>() -> Self {
        RustType::of::<T>().package()
    }
}

impl PackageHandle for Package {
    fn package_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

impl<H: TypeHandle + ?Sized> TypeHandle for &H {
    fn canonical_name(&self) -> Cow<'_, str> {
        (**self).canonical_name()
    }
}

impl<H: PackageHandle + ?Sized> PackageHandle for &H {
    fn package_name(&self) -> Cow<'_, str> {
        (**self).package_name()
    }
}

/// Optional type handle. `None` entries are skipped.
pub trait TypeEntry {
    fn type_entry(&self) -> Option<Cow<'_, str>>;
}

impl<H: TypeHandle> TypeEntry for H {
    fn type_entry(&self) -> Option<Cow<'_, str>> {
        Some(self.canonical_name())
    }
}

impl<H: TypeHandle> TypeEntry for Option<H> {
    fn type_entry(&self) -> Option<Cow<'_, str>> {
        self.as_ref().map(|h| h.canonical_name())
    }
}

/// Optional package handle. `None` entries are skipped.
pub trait PackageEntry {
    fn package_entry(&self) -> Option<Cow<'_, str>>;
}

impl<H: PackageHandle> PackageEntry for H {
    fn package_entry(&self) -> Option<Cow<'_, str>> {
        Some(self.package_name())
    }
}

impl<H: PackageHandle> PackageEntry for Option<H> {
    fn package_entry(&self) -> Option<Cow<'_, str>> {
        self.as_ref().map(|h| h.package_name())
    }
}

/// One element of a rule-adding call. `None` elements are skipped.
pub trait RuleEntry {
    fn entry(&self) -> Option<&str>;
}

impl RuleEntry for &str {
    fn entry(&self) -> Option<&str> {
        Some(*self)
    }
}

impl RuleEntry for String {
    fn entry(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl RuleEntry for &String {
    fn entry(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl RuleEntry for Cow<'_, str> {
    fn entry(&self) -> Option<&str> {
        Some(self.as_ref())
    }
}

impl<T: RuleEntry> RuleEntry for Option<T> {
    fn entry(&self) -> Option<&str> {
        self.as_ref().and_then(|t| t.entry())
    }
}
