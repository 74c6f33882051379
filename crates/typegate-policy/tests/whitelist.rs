//! Matching behavior of the type whitelist.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use regex::Regex;
use typegate_core::{ErrorCode, Package, RustType, DEFAULT_PACKAGE_NAME};
use typegate_policy::{TypeGuard, TypeWhitelist, WhitelistConfig};

mod model {
    pub struct FooResource;
    pub struct BarResource;
}

fn empty() -> TypeWhitelist {
    TypeWhitelist::new(&WhitelistConfig::default()).unwrap()
}

fn config(types: &[&str], packages: &[&str], patterns: &[&str]) -> WhitelistConfig {
    let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    WhitelistConfig {
        allow_all: false,
        allowed_types: owned(types),
        allowed_packages: owned(packages),
        allowed_patterns: owned(patterns),
    }
}

#[test]
fn seeded_from_config() {
    let wl = TypeWhitelist::new(&config(
        &["test.Foo", " test.Bar "],
        &["test2", "test3"],
        &[r"org\.sonatype\..*DTO"],
    ))
    .unwrap();

    assert!(wl.is_allowed("test.Foo"));
    assert!(wl.is_allowed("test.Bar"));
    assert!(wl.is_allowed("test2.A"));
    assert!(wl.is_allowed("test2.B"));
    assert!(wl.is_allowed("test3.A"));
    assert!(wl.is_allowed("test3.C"));
    assert!(wl.is_allowed("org.sonatype.foo.FooDTO"));

    assert!(!wl.is_allowed("test.Baz"));
    assert!(!wl.is_allowed("test4.A"));
    assert!(!wl.is_allowed("org.sonatype.foo.Foo"));
}

#[test]
fn bad_seed_pattern_fails_construction() {
    let err = TypeWhitelist::new(&config(&[], &[], &["ok\\..*", "(unclosed"])).unwrap_err();
    assert_eq!(err.code(), ErrorCode::PatternCompilation);
    assert!(err.to_string().contains("(unclosed"));
}

#[test]
fn allow_all_overrides_everything() {
    let wl = TypeWhitelist::new(&WhitelistConfig {
        allow_all: true,
        ..WhitelistConfig::default()
    })
    .unwrap();

    assert!(wl.is_allow_all());
    assert!(wl.is_allowed("test.Foo"));
    assert!(wl.is_allowed("Anything"));
    assert!(wl.is_allowed(""));
    assert!(wl.allowed_types().is_empty());
}

#[test]
fn default_denies() {
    let wl = empty();
    assert!(!wl.is_allow_all());
    assert!(!wl.is_allowed("test.Foo"));
    assert!(!wl.is_allowed("any.Type"));
}

#[test]
fn allow_type_is_exact() {
    let mut wl = empty();
    wl.allow_type(["test.Bar"]).unwrap();

    assert!(!wl.is_allowed("test.Foo"));
    assert!(wl.is_allowed("test.Bar"));
    assert!(!wl.is_allowed("test.bar"));
    assert!(!wl.is_allowed("test.Bar2"));

    assert_eq!(wl.allowed_types(), vec!["test.Bar"]);
    assert!(wl.allowed_packages().is_empty());
}

#[test]
fn allow_type_dedupes_and_skips_none() {
    let mut wl = empty();
    wl.allow_type([Some("a.B"), None, Some("a.B")]).unwrap();
    wl.allow_type(vec![String::from("a.B"), String::from("a.A")]).unwrap();
    assert_eq!(wl.allowed_types(), vec!["a.A", "a.B"]);
}

#[test]
fn empty_names_are_plain_rules() {
    let mut wl = empty();
    wl.allow_type(["a.B", ""]).unwrap();
    assert!(wl.is_allowed("a.B"));
    assert!(wl.is_allowed(""));
    assert!(!wl.is_allowed(" "));
    assert_eq!(wl.allowed_types(), vec!["", "a.B"]);

    // "" is the package of ".Foo".
    wl.allow_package([""]).unwrap();
    assert!(wl.is_allowed(".Foo"));
    assert!(!wl.is_allowed("Foo"));
}

#[test]
fn empty_pattern_matches_only_empty_name() {
    let mut wl = empty();
    wl.allow_pattern([""]).unwrap();
    assert_eq!(wl.allowed_patterns(), vec![""]);
    assert!(wl.is_allowed(""));
    assert!(!wl.is_allowed("a.B"));
}

#[test]
fn allow_package_is_not_hierarchical() {
    let mut wl = empty();
    wl.allow_package(["test"]).unwrap();

    assert!(wl.is_allowed("test.Foo"));
    assert!(wl.is_allowed("test.Bar"));
    assert!(!wl.is_allowed("sub.A"));
    assert!(!wl.is_allowed("test.sub.A"));
    assert!(!wl.is_allowed("test"));

    assert_eq!(wl.allowed_packages(), vec!["test"]);
    assert!(wl.allowed_types().is_empty());
}

#[test]
fn allow_default_package() {
    let mut wl = empty();
    wl.allow_package([DEFAULT_PACKAGE_NAME]).unwrap();
    assert!(wl.is_allowed("A"));
    assert!(!wl.is_allowed("test.Foo"));
}

#[test]
fn allow_pattern_requires_full_match() {
    let mut wl = empty();
    wl.allow_pattern([r"org\.sonatype\..*DTO"]).unwrap();

    assert!(wl.is_allowed("org.sonatype.foo.FooDTO"));
    assert!(wl.is_allowed("org.sonatype.foo.BarDTO"));
    assert!(!wl.is_allowed("org.sonatype.foo.Foo"));
    assert!(!wl.is_allowed("org.sonatype.foo.FooDTOx"));
    assert!(!wl.is_allowed("x.org.sonatype.foo.FooDTO"));
}

#[test]
fn alternation_is_anchored_as_a_whole() {
    let mut wl = empty();
    wl.allow_pattern(["a|b"]).unwrap();
    assert!(wl.is_allowed("a"));
    assert!(wl.is_allowed("b"));
    assert!(!wl.is_allowed("ab"));
    assert!(!wl.is_allowed("xb"));
}

#[test]
fn model_patterns() {
    let mut wl = empty();
    wl.allow_pattern([
        r"^(org|com)\.sonatype\..*\.model\..*",
        r"^(org|com)\.sonatype\..*\.dto\..*",
    ])
    .unwrap();

    assert!(wl.is_allowed("org.sonatype.foo.model.FooResourceResponse"));
    assert!(wl.is_allowed("com.sonatype.foo.model.FooResourceResponse"));
    assert!(wl.is_allowed("org.sonatype.bar.api.dto.BarDTO"));
    assert!(wl.is_allowed("com.sonatype.bar.api.dto.BarDTO"));

    assert!(!wl.is_allowed("org.sonatype.foo.Foo"));
    assert!(!wl.is_allowed("com.sonatype.foo.Foo"));
    assert!(!wl.is_allowed("org.sonatype.bar.Bar"));
    assert!(!wl.is_allowed("com.sonatype.bar.Bar"));
}

#[test]
fn patterns_keep_order_and_duplicates() {
    let mut wl = empty();
    wl.allow_pattern(["b.*", "a.*"]).unwrap();
    wl.allow_pattern([Some("b.*"), None]).unwrap();
    assert_eq!(wl.allowed_patterns(), vec!["b.*", "a.*", "b.*"]);
}

#[test]
fn verbose_pattern_with_trailing_comment() {
    let source = "(?x) a\\.B  # allow a.B";
    assert!(Regex::new(source).is_ok());

    let mut wl = empty();
    wl.allow_pattern([source]).unwrap();
    assert_eq!(wl.allowed_patterns(), vec![source]);
    assert!(wl.is_allowed("a.B"));
    assert!(!wl.is_allowed("a.Bx"));
    assert!(!wl.is_allowed("xa.B"));
    assert!(!wl.is_allowed("aXB"));
}

#[test]
fn verbose_seed_pattern_with_comment() {
    let wl = TypeWhitelist::new(&config(
        &[],
        &[],
        &["(?x) a \\. .* DTO  # data transfer objects", "b\\.C"],
    ))
    .unwrap();
    assert!(wl.is_allowed("a.FooDTO"));
    assert!(!wl.is_allowed("a.FooDTO.x"));
    assert!(wl.is_allowed("b.C"));
}

#[test]
fn bad_pattern_error_names_the_source() {
    let mut wl = empty();
    let err = wl.allow_pattern(["(?x) (a  # open group"]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::PatternCompilation);
    assert!(!err.to_string().contains("^(?:"));
}

#[test]
fn bad_pattern_applies_nothing() {
    let mut wl = empty();
    let err = wl.allow_pattern(["good\\..*", "[bad"]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::PatternCompilation);
    assert!(wl.allowed_patterns().is_empty());
    assert!(!wl.is_allowed("good.Thing"));
}

#[test]
fn compiled_regex_is_reanchored() {
    let mut wl = empty();
    let re = Regex::new(r"a\..*DTO").unwrap();
    wl.allow_regex([&re]).unwrap();
    assert!(wl.is_allowed("a.FooDTO"));
    assert!(!wl.is_allowed("z.a.FooDTO"));
    assert_eq!(wl.allowed_patterns(), vec![r"a\..*DTO"]);
}

#[test]
fn pattern_order_does_not_change_outcome() {
    let patterns = [r"a\..*DTO", r"b\.[A-Z]\w*", r".*\.model\..*", r"c"];
    let names = [
        "a.FooDTO", "a.Foo", "b.Bar", "b.bar", "x.model.Y", "model.Y", "c", "cc",
    ];

    let mut forward = empty();
    forward.allow_pattern(patterns).unwrap();
    let mut reversed = empty();
    reversed.allow_pattern(patterns.iter().rev().copied()).unwrap();

    for name in names {
        assert_eq!(forward.is_allowed(name), reversed.is_allowed(name), "{name}");
    }
}

#[test]
fn rule_kind_order_does_not_change_outcome() {
    let names = ["a.B", "a.C", "p.X", "p.q.X", "z.FooDTO", "Bare"];

    let mut one = empty();
    one.allow_type(["a.B"]).unwrap();
    one.allow_package(["p"]).unwrap();
    one.allow_pattern([r".*DTO"]).unwrap();

    let mut two = empty();
    two.allow_pattern([r".*DTO"]).unwrap();
    two.allow_package(["p"]).unwrap();
    two.allow_type(["a.B"]).unwrap();

    for name in names {
        assert_eq!(one.is_allowed(name), two.is_allowed(name), "{name}");
    }
}

#[test]
fn scenario_from_empty() {
    let mut wl = empty();
    assert!(!wl.is_allowed("any.Type"));

    wl.allow_type(["a.B"]).unwrap();
    assert!(wl.is_allowed("a.B"));
    assert!(!wl.is_allowed("a.C"));

    wl.allow_pattern([r"a\..*DTO"]).unwrap();
    assert!(wl.is_allowed("a.FooDTO"));
    assert!(!wl.is_allowed("a.Foo"));
}

#[test]
fn ensure_allowed_carries_name() {
    let wl = empty();
    let err = wl.ensure_allowed("test.Foo").unwrap_err();
    assert_eq!(err.code(), ErrorCode::TypeNotAllowed);
    assert_eq!(err.rejected_type(), Some("test.Foo"));
    assert_eq!(err.to_string(), "test.Foo");
}

#[test]
fn ensure_allowed_passes() {
    let mut wl = empty();
    wl.allow_type(["test.Foo"]).unwrap();
    wl.allow_package(["other"]).unwrap();
    wl.ensure_allowed("test.Foo").unwrap();
    wl.ensure_allowed("other.Foo").unwrap();
}

#[test]
fn type_handles_resolve_canonical_names() {
    let mut wl = empty();
    wl.allow_type_of::<model::FooResource>().unwrap();

    assert!(wl.is_type_allowed(&RustType::of::<model::FooResource>()));
    assert!(!wl.is_type_allowed(&RustType::of::<model::BarResource>()));
    wl.ensure_type_allowed(&RustType::of::<model::FooResource>())
        .unwrap();

    let expected = format!("{}.model.FooResource", module_path!().replace("::", "."));
    assert_eq!(wl.allowed_types(), vec![expected.clone()]);
    assert!(wl.is_allowed(&expected));
}

#[test]
fn package_handles_resolve_names() {
    let mut wl = empty();
    wl.allow_package_of::<model::FooResource>().unwrap();
    assert!(wl.is_type_allowed(&RustType::of::<model::BarResource>()));

    let mut wl = empty();
    wl.allow_package_handles([Package::new("a::b")]).unwrap();
    assert!(wl.is_allowed("a.b.C"));
    assert!(!wl.is_allowed("a.C"));
}

#[test]
fn handle_variants_skip_none() {
    let mut wl = empty();
    wl.allow_type_handles([None, Some(RustType::of::<model::FooResource>())])
        .unwrap();
    wl.allow_package_handles([Some(Package::new("a::b")), None])
        .unwrap();
    wl.allow_type_handles(Vec::<Option<RustType>>::new()).unwrap();

    assert_eq!(wl.allowed_types().len(), 1);
    assert!(wl.is_type_allowed(&RustType::of::<model::FooResource>()));
    assert!(!wl.is_type_allowed(&RustType::of::<model::BarResource>()));
    assert_eq!(wl.allowed_packages(), vec!["a.b"]);
}

#[test]
fn guard_trait_object() {
    let mut wl = empty();
    wl.allow_type(["a.B"]).unwrap();
    let guard: Box<dyn TypeGuard> = Box::new(wl);

    assert!(guard.is_allowed("a.B"));
    guard.ensure_allowed("a.B").unwrap();
    let err = guard.ensure_allowed("a.C").unwrap_err();
    assert_eq!(err.rejected_type(), Some("a.C"));
}

#[test]
fn display_lists_rules() {
    let mut wl = empty();
    wl.allow_type(["b.T", "a.T"]).unwrap();
    wl.allow_package(["p"]).unwrap();
    wl.allow_pattern(["x.*"]).unwrap();
    assert_eq!(
        wl.to_string(),
        r#"TypeWhitelist{allow_all=false, allowed_types=["a.T", "b.T"], allowed_packages=["p"], allowed_patterns=["x.*"]}"#
    );
}
