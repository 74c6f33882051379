//! Pattern rule compilation and matching.
//!
//! Rules keep the source they were written as and an anchored regex, so a
//! name must match the whole pattern, never a substring of it.

use std::fmt;

use regex::Regex;
use typegate_core::error::{Result, TypeGateError};

/// Compiled pattern rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    source: String,
    anchored: Regex,
}

impl PatternRule {
    /// Compile `source` with full-string match semantics.
    pub fn compile(source: &str) -> Result<Self> {
        Regex::new(source).map_err(|e| compile_error(source, e.to_string()))?;
        let anchored = anchor(source).ok_or_else(|| {
            compile_error(source, "cannot be anchored for full-string match".into())
        })?;
        Ok(Self {
            source: source.to_string(),
            anchored,
        })
    }

    /// Re-anchor an already compiled regex.
    pub fn from_regex(regex: &Regex) -> Result<Self> {
        Self::compile(regex.as_str())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, name: &str) -> bool {
        self.anchored.is_match(name)
    }
}

impl fmt::Display for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn compile_error(source: &str, reason: String) -> TypeGateError {
    TypeGateError::PatternCompilation {
        pattern: source.to_string(),
        reason,
    }
}

/// Wrap an already valid `source` in `^(?:...)$`.
///
/// A source ending in a verbose-mode `#` comment swallows the closing `)$`.
/// The retry ends that comment with a newline; it only parses when verbose
/// mode is active at the end of the source, where the newline is ignored.
fn anchor(source: &str) -> Option<Regex> {
    Regex::new(&format!("^(?:{source})$"))
        .or_else(|_| Regex::new(&format!("^(?:{source}\n)$")))
        .ok()
}

/// Compile every source, failing on the first bad one.
pub fn compile_patterns<S: AsRef<str>>(raw: &[S]) -> Result<Vec<PatternRule>> {
    let mut out = Vec::with_capacity(raw.len());
    for s in raw {
        out.push(PatternRule::compile(s.as_ref())?);
    }
    Ok(out)
}

/// First rule (in order) that fully matches `name`.
pub fn first_match<'a>(rules: &'a [PatternRule], name: &str) -> Option<&'a PatternRule> {
    rules.iter().find(|r| r.matches(name))
}
