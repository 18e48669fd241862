//! `esmify.json` configuration.
//!
//! ```json
//! {
//!   "rewrite": {
//!     "#lib/": "^\\.\\./lib/",
//!     ".mjs": { "preset": "explicit-esm" }
//!   },
//!   "dualModeExtensions": [".tsx"],
//!   "compilerOptions": { "outDir": "dist", "declaration": true }
//! }
//! ```
//!
//! Rewrite entries keep file order. Without a `rewrite` table the
//! explicit-ESM preset is used on its own.

use anyhow::{Context, Result};
use esmify_emit::{CompilerOptions, EmitOptions, resolve_compiler_options};
use esmify_rewrite::rule::explicit_esm_fn;
use esmify_rewrite::{ExtensionCoercion, Matcher, RewriteRule};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    ExplicitEsm,
}

/// One `rewrite` entry: a regular expression, or a built-in rewrite function.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MatcherConfig {
    Pattern(String),
    Preset { preset: Preset },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsmifyConfig {
    #[serde(default)]
    pub rewrite: Option<IndexMap<String, MatcherConfig>>,
    #[serde(default)]
    pub dual_mode_extensions: Vec<String>,
    #[serde(default)]
    pub compiler_options: Option<CompilerOptions>,
}

impl EsmifyConfig {
    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("failed to parse esmify config JSON")
    }

    /// Compile the `rewrite` table.
    pub fn rule(&self) -> Result<RewriteRule> {
        let Some(entries) = &self.rewrite else {
            return Ok(RewriteRule::explicit_esm());
        };

        let mut builder = RewriteRule::record();
        for (alias, matcher) in entries {
            builder = match matcher {
                MatcherConfig::Pattern(pattern) => builder
                    .pattern(alias.as_str(), pattern)
                    .with_context(|| format!("invalid rewrite entry '{alias}'"))?,
                MatcherConfig::Preset {
                    preset: Preset::ExplicitEsm,
                } => builder.matcher(alias.as_str(), Matcher::Function(explicit_esm_fn())),
            };
        }
        Ok(builder.build())
    }

    pub fn coercion(&self) -> ExtensionCoercion {
        ExtensionCoercion::dual_mode(self.dual_mode_extensions.iter().cloned())
    }

    pub fn emit_options(&self) -> Result<EmitOptions> {
        resolve_compiler_options(self.compiler_options.as_ref())
    }
}

pub fn load_config(path: &Path) -> Result<EsmifyConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read esmify config: {}", path.display()))?;
    EsmifyConfig::from_json_str(&source)
        .with_context(|| format!("failed to load esmify config: {}", path.display()))
}
