//! Embedded source-map reference fixing.
//!
//! Emitted code and declaration text end with a trailer naming the sibling
//! map file. When artifact names are rewritten, that trailer must follow, and
//! so must the `file` field inside the map that points back at the artifact.

use crate::error::RuleError;
use crate::resolver::resolve_specifier;
use crate::rule::RewriteRule;
use std::borrow::Cow;
use std::ops::Range;
use tracing::trace;

pub const SOURCE_MAPPING_URL_PREFIX: &str = "//# sourceMappingURL=";

/// Byte range of the reference path in `text`, if its final non-blank line
/// starts with [`SOURCE_MAPPING_URL_PREFIX`].
///
/// Inline `data:` URLs and empty paths yield `None`.
pub fn find_source_mapping_url(text: &str) -> Option<Range<usize>> {
    let line = final_non_blank_line(text)?;
    let path = text[line.clone()].strip_prefix(SOURCE_MAPPING_URL_PREFIX)?;
    let path = path.trim_start();
    if path.is_empty() || path.starts_with("data:") {
        return None;
    }
    let start = line.end - path.len();
    Some(start..line.end)
}

/// Final line with non-whitespace content, trailing whitespace (and `\r`)
/// excluded.
fn final_non_blank_line(text: &str) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    let mut end = bytes.len();
    loop {
        let start = memchr::memrchr(b'\n', &bytes[..end]).map_or(0, |newline| newline + 1);
        let content = text[start..end].trim_end();
        if !content.is_empty() {
            return Some(start..start + content.len());
        }
        if start == 0 {
            return None;
        }
        end = start - 1;
    }
}

/// Replace the embedded reference path with `resolve(path)`.
///
/// Only the path bytes change; everything before and after is kept as-is.
/// Text with no reference comes back borrowed, as does text whose path
/// resolves to itself.
pub fn fix_embedded_reference<'a, F, E>(text: &'a str, resolve: F) -> Result<Cow<'a, str>, E>
where
    F: FnOnce(&str) -> Result<String, E>,
{
    let Some(range) = find_source_mapping_url(text) else {
        return Ok(Cow::Borrowed(text));
    };
    let path = &text[range.clone()];
    let resolved = resolve(path)?;
    if resolved == path {
        return Ok(Cow::Borrowed(text));
    }

    trace!(from = path, to = %resolved, "fixed sourceMappingURL");
    let mut fixed = String::with_capacity(text.len() - path.len() + resolved.len());
    fixed.push_str(&text[..range.start]);
    fixed.push_str(&resolved);
    fixed.push_str(&text[range.end..]);
    Ok(Cow::Owned(fixed))
}

/// Rewrite the trailing `//# sourceMappingURL=` path through `rule`.
pub fn fix_source_mapping_url<'a>(
    text: &'a str,
    rule: &RewriteRule,
    origin: Option<&str>,
) -> Result<Cow<'a, str>, RuleError> {
    fix_embedded_reference(text, |path| {
        resolve_specifier(path, rule, origin).map(Cow::into_owned)
    })
}

/// Rewrite the `file` field of a source-map artifact with `resolve`.
///
/// Anything that is not a JSON object with a string `file` field is returned
/// unchanged.
pub fn fix_source_map_file<'a, F, E>(json: &'a str, resolve: F) -> Result<Cow<'a, str>, E>
where
    F: FnOnce(&str) -> Result<String, E>,
{
    let Ok(mut map) = serde_json::from_str::<serde_json::Value>(json) else {
        return Ok(Cow::Borrowed(json));
    };
    let Some(file) = map.get_mut("file") else {
        return Ok(Cow::Borrowed(json));
    };
    let Some(current) = file.as_str() else {
        return Ok(Cow::Borrowed(json));
    };

    let resolved = resolve(current)?;
    if resolved == current {
        return Ok(Cow::Borrowed(json));
    }
    *file = serde_json::Value::String(resolved);
    match serde_json::to_string(&map) {
        Ok(fixed) => Ok(Cow::Owned(fixed)),
        Err(_) => Ok(Cow::Borrowed(json)),
    }
}
