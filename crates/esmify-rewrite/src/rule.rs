//! Rewrite rules.
//!
//! A rule is either a single function or an ordered record of
//! `alias -> matcher` entries. Record order is significant: the resolver
//! stops at the first entry that applies.
//!
//! ```text
//! RewriteRule::Function(f)                    f(specifier, origin)
//! RewriteRule::Record { "#lib": /^\.\.\/lib\//,   "../lib/x.ts" -> "#lib/x.ts"
//!                       ".mjs": f }               first function entry is final
//! ```

use crate::error::RuleError;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::Arc;

/// Result of a rewrite function. `Ok(None)` and `Ok(Some(""))` both mean
/// "leave the specifier as it is".
pub type RuleResult = Result<Option<String>, RuleError>;

/// A caller-supplied rewrite function: `(specifier, origin file) -> new specifier`.
///
/// `origin` is the importing source file when rewriting a specifier inside a
/// tree, and `None` when the input is itself an output path.
pub type RewriteFn = Arc<dyn Fn(&str, Option<&str>) -> RuleResult + Send + Sync>;

#[derive(Clone)]
pub enum Matcher {
    /// Replace the first match with the entry's alias.
    Pattern(Regex),
    /// Delegate to a function; ends the record scan when reached.
    Function(RewriteFn),
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Matcher::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Matcher::Function(_) => f.write_str("Function(..)"),
        }
    }
}

#[derive(Clone)]
pub enum RewriteRule {
    Function(RewriteFn),
    Record(IndexMap<String, Matcher>),
}

impl std::fmt::Debug for RewriteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewriteRule::Function(_) => f.write_str("Function(..)"),
            RewriteRule::Record(entries) => f.debug_map().entries(entries.iter()).finish(),
        }
    }
}

impl RewriteRule {
    /// Function-form rule.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> RuleResult + Send + Sync + 'static,
    {
        RewriteRule::Function(Arc::new(f))
    }

    /// Start building a record-form rule.
    pub fn record() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Rule rewriting extensionless and `.js` output references to explicit
    /// `.mjs` ones. See [`explicit_esm_specifier`].
    pub fn explicit_esm() -> Self {
        RewriteRule::Function(explicit_esm_fn())
    }

    /// Number of record entries (a function rule counts as one).
    pub fn len(&self) -> usize {
        match self {
            RewriteRule::Function(_) => 1,
            RewriteRule::Record(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builder for record-form rules. Entries keep insertion order; re-adding an
/// alias replaces its matcher in place.
#[derive(Default)]
pub struct RecordBuilder {
    entries: IndexMap<String, Matcher>,
}

impl RecordBuilder {
    /// Add a pattern entry, compiling `pattern`.
    pub fn pattern(self, alias: impl Into<String>, pattern: &str) -> Result<Self, RuleError> {
        let alias = alias.into();
        match Regex::new(pattern) {
            Ok(regex) => Ok(self.regex(alias, regex)),
            Err(source) => Err(RuleError::InvalidPattern { alias, source }),
        }
    }

    /// Add a pattern entry from an already compiled regex.
    pub fn regex(mut self, alias: impl Into<String>, regex: Regex) -> Self {
        self.entries.insert(alias.into(), Matcher::Pattern(regex));
        self
    }

    /// Add a function entry.
    pub fn function<F>(mut self, alias: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> RuleResult + Send + Sync + 'static,
    {
        self.entries.insert(alias.into(), Matcher::Function(Arc::new(f)));
        self
    }

    /// Add a matcher as-is.
    pub fn matcher(mut self, alias: impl Into<String>, matcher: Matcher) -> Self {
        self.entries.insert(alias.into(), matcher);
        self
    }

    pub fn build(self) -> RewriteRule {
        RewriteRule::Record(self.entries)
    }
}

// =========================================================================
// Explicit-ESM preset
// =========================================================================

pub(crate) const DECLARATION_SUFFIXES: [&str; 3] = [".d.ts", ".d.mts", ".d.cts"];

/// Source suffixes and the output extension each one emits as.
const SOURCE_SUFFIXES: [(&str, &str); 4] = [
    (".tsx", ".mjs"),
    (".mts", ".mjs"),
    (".cts", ".cjs"),
    (".ts", ".mjs"),
];

/// Extensions a relative specifier may already end in and keep. Any other dot
/// in the last segment is part of the module name (`./button.styles`).
const KEPT_EXTENSIONS: [&str; 13] = [
    ".mjs", ".cjs", ".jsx", ".json", ".css", ".scss", ".less", ".wasm", ".node", ".html",
    ".svg", ".png", ".txt",
];

/// The explicit-ESM preset as a shareable function.
pub fn explicit_esm_fn() -> RewriteFn {
    Arc::new(|specifier, origin| Ok(explicit_esm_specifier(specifier, origin)))
}

/// Map a specifier or output path onto the explicit `.mjs` family.
///
/// - `*.js.map` -> `*.mjs.map`, `*.js` -> `*.mjs`
/// - relative `./x.ts`, `./x.tsx`, `./x.mts` -> `./x.mjs`, `./x.cts` -> `./x.cjs`
/// - relative `./x` or `./x.config` -> `./x.mjs`, `./x.config.mjs`
///
/// Bare package specifiers are left alone when an origin file is given
/// (`highlight.js` names a package, not a sibling). Declaration names,
/// directory specifiers and names ending in a kept extension (`.json`, `.css`, ...) never
/// change, so applying the preset twice gives the same result as applying it
/// once.
pub fn explicit_esm_specifier(specifier: &str, origin: Option<&str>) -> Option<String> {
    if origin.is_some() && is_bare_specifier(specifier) {
        return None;
    }
    if let Some(stem) = specifier.strip_suffix(".js.map") {
        return Some(format!("{stem}.mjs.map"));
    }
    if let Some(stem) = specifier.strip_suffix(".js") {
        return Some(format!("{stem}.mjs"));
    }
    if !is_relative_specifier(specifier)
        || is_directory_specifier(specifier)
        || DECLARATION_SUFFIXES
            .iter()
            .any(|suffix| specifier.ends_with(suffix))
    {
        return None;
    }
    for (suffix, extension) in SOURCE_SUFFIXES {
        if let Some(stem) = specifier.strip_suffix(suffix) {
            return Some(format!("{stem}{extension}"));
        }
    }
    if KEPT_EXTENSIONS
        .iter()
        .any(|extension| specifier.ends_with(extension))
    {
        return None;
    }
    Some(format!("{specifier}.mjs"))
}

/// `./x` or `../x`
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Anything that is neither relative nor absolute (`react`, `@scope/pkg/sub`, `node:fs`).
pub fn is_bare_specifier(specifier: &str) -> bool {
    !(specifier.starts_with('.') || specifier.starts_with('/') || specifier.starts_with('\\'))
}

/// `./dir/`, `..`, `../..`
fn is_directory_specifier(specifier: &str) -> bool {
    specifier.ends_with('/') || matches!(specifier.rsplit('/').next(), Some(".") | Some(".."))
}
