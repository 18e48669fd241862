//! Specifier resolution.

use crate::error::RuleError;
use crate::rule::{Matcher, RewriteFn, RewriteRule};
use regex::NoExpand;
use std::borrow::Cow;
use tracing::trace;

/// Apply `rule` to one specifier.
///
/// - Function rule: the function's result, or the input when it returns nothing.
/// - Record rule: entries are scanned in order. The first function entry
///   reached is final, whatever it returns. A pattern entry applies when it
///   matches, and its first match is replaced by the entry's alias.
/// - Nothing applies: the input comes back borrowed.
///
/// Errors from caller-supplied functions are returned as-is.
pub fn resolve_specifier<'a>(
    specifier: &'a str,
    rule: &RewriteRule,
    origin: Option<&str>,
) -> Result<Cow<'a, str>, RuleError> {
    let resolved = match rule {
        RewriteRule::Function(f) => apply_function(f, specifier, origin)?,
        RewriteRule::Record(entries) => {
            let mut resolved = Cow::Borrowed(specifier);
            for (alias, matcher) in entries {
                match matcher {
                    Matcher::Function(f) => {
                        resolved = apply_function(f, specifier, origin)?;
                        break;
                    }
                    Matcher::Pattern(pattern) => {
                        if pattern.is_match(specifier) {
                            resolved = pattern.replace(specifier, NoExpand(alias));
                            break;
                        }
                    }
                }
            }
            resolved
        }
    };

    if resolved != specifier {
        trace!(specifier, resolved = %resolved, origin = ?origin, "rewrote specifier");
    }
    Ok(resolved)
}

fn apply_function<'a>(
    f: &RewriteFn,
    specifier: &'a str,
    origin: Option<&str>,
) -> Result<Cow<'a, str>, RuleError> {
    match f(specifier, origin)? {
        Some(resolved) if !resolved.is_empty() => Ok(Cow::Owned(resolved)),
        _ => Ok(Cow::Borrowed(specifier)),
    }
}
