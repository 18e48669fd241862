//! Compiler options that affect what gets emitted and where.

use anyhow::{Result, bail};
use esmify_syntax::NewLine;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

/// Accepts both `true` and `"true"` for boolean options.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// `compilerOptions` as written in a project file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default)]
    pub root_dir: Option<String>,
    #[serde(default)]
    pub declaration_dir: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub declaration: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub declaration_map: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub source_map: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub emit_declaration_only: Option<bool>,
    #[serde(default, rename = "emitBOM", deserialize_with = "deserialize_bool_or_string")]
    pub emit_bom: Option<bool>,
    #[serde(default)]
    pub jsx: Option<String>,
    #[serde(default)]
    pub new_line: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsxEmit {
    Preserve,
    React,
    ReactJsx,
}

/// Options after validation, with directories still relative to the project.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    pub out_dir: Option<PathBuf>,
    pub root_dir: Option<PathBuf>,
    pub declaration_dir: Option<PathBuf>,
    pub emit_declarations: bool,
    pub declaration_map: bool,
    pub source_map: bool,
    pub emit_declaration_only: bool,
    pub emit_bom: bool,
    pub jsx: Option<JsxEmit>,
    pub new_line: NewLine,
}

impl EmitOptions {
    /// Whether code (`.js`) artifacts are written at all.
    pub fn emits_code(&self) -> bool {
        !self.emit_declaration_only
    }
}

pub fn resolve_compiler_options(options: Option<&CompilerOptions>) -> Result<EmitOptions> {
    let mut resolved = EmitOptions::default();
    let Some(options) = options else {
        return Ok(resolved);
    };

    resolved.out_dir = non_empty_path(options.out_dir.as_deref());
    resolved.root_dir = non_empty_path(options.root_dir.as_deref());
    resolved.declaration_dir = non_empty_path(options.declaration_dir.as_deref());

    resolved.emit_declaration_only = options.emit_declaration_only.unwrap_or(false);
    if resolved.emit_declaration_only && options.declaration == Some(false) {
        bail!("compilerOptions.emitDeclarationOnly requires compilerOptions.declaration");
    }
    resolved.emit_declarations =
        options.declaration.unwrap_or(false) || resolved.emit_declaration_only;
    resolved.declaration_map = options.declaration_map.unwrap_or(false);
    if resolved.declaration_map && !resolved.emit_declarations {
        bail!("compilerOptions.declarationMap requires compilerOptions.declaration");
    }
    resolved.source_map = options.source_map.unwrap_or(false);
    resolved.emit_bom = options.emit_bom.unwrap_or(false);

    if let Some(jsx) = options.jsx.as_deref() {
        resolved.jsx = Some(parse_jsx_emit(jsx)?);
    }
    if let Some(new_line) = options.new_line.as_deref() {
        resolved.new_line = parse_new_line(new_line)?;
    }

    Ok(resolved)
}

fn non_empty_path(value: Option<&str>) -> Option<PathBuf> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn parse_jsx_emit(value: &str) -> Result<JsxEmit> {
    let jsx = match normalize_option(value).as_str() {
        "preserve" => JsxEmit::Preserve,
        "react" => JsxEmit::React,
        "reactjsx" => JsxEmit::ReactJsx,
        _ => bail!("unsupported compilerOptions.jsx '{}'", value),
    };
    Ok(jsx)
}

fn parse_new_line(value: &str) -> Result<NewLine> {
    let new_line = match normalize_option(value).as_str() {
        "lf" => NewLine::LineFeed,
        "crlf" => NewLine::CarriageReturnLineFeed,
        _ => bail!("unsupported compilerOptions.newLine '{}'", value),
    };
    Ok(new_line)
}

fn normalize_option(value: &str) -> String {
    let mut normalized = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '-' || ch == '_' || ch.is_whitespace() {
            continue;
        }
        normalized.push(ch.to_ascii_lowercase());
    }
    normalized
}
