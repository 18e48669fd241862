//! Output artifact name mapping.
//!
//! The host decides which artifacts a source file produces (code, declaration
//! and their maps). Each of those names is pushed through the same rewrite
//! rule that rewrites specifiers, then refined by the project's extension
//! coercion. The result is computed once per emission and consulted for every
//! file written.

use crate::error::RuleError;
use crate::resolver::resolve_specifier;
use crate::rule::{DECLARATION_SUFFIXES, RewriteRule};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

/// The host's "what would you emit for this file" contract.
pub trait EmitNameHost {
    /// Every artifact name the host would write for `source_file`, in
    /// emission order. Declaration inputs produce an empty list.
    fn output_file_names(&self, source_file: &str) -> Vec<String>;
}

impl<F> EmitNameHost for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn output_file_names(&self, source_file: &str) -> Vec<String> {
        self(source_file)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Code,
    Declaration,
    CodeMap,
    DeclarationMap,
}

impl ArtifactKind {
    /// Classify an artifact name by suffix alone.
    pub fn classify(name: &str) -> Self {
        match name.strip_suffix(".map") {
            Some(described) if is_declaration_name(described) => ArtifactKind::DeclarationMap,
            Some(_) => ArtifactKind::CodeMap,
            None if is_declaration_name(name) => ArtifactKind::Declaration,
            None => ArtifactKind::Code,
        }
    }

    pub const fn is_map(self) -> bool {
        matches!(self, ArtifactKind::CodeMap | ArtifactKind::DeclarationMap)
    }
}

fn is_declaration_name(name: &str) -> bool {
    DECLARATION_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Source extensions whose declaration output moves to the `.d.mts` family.
///
/// Applied after the rewrite rule: `.d.ts` -> `.d.mts` and
/// `.d.ts.map` -> `.d.mts.map` for source files ending in one of the
/// configured extensions. Code artifacts are left to the rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionCoercion {
    dual_mode_extensions: Vec<String>,
}

impl ExtensionCoercion {
    /// No coercion.
    pub fn none() -> Self {
        ExtensionCoercion::default()
    }

    /// Coerce declarations for sources ending in any of `extensions`
    /// (with or without the leading dot).
    pub fn dual_mode<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dual_mode_extensions = extensions
            .into_iter()
            .map(Into::into)
            .map(|ext: String| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect();
        ExtensionCoercion {
            dual_mode_extensions,
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.dual_mode_extensions
    }

    pub fn applies_to(&self, source_file: &str) -> bool {
        self.dual_mode_extensions
            .iter()
            .any(|ext| source_file.ends_with(ext.as_str()))
    }

    /// The coerced name for an already-rewritten artifact, if coercion applies.
    pub fn coerce(&self, source_file: &str, rewritten: &str) -> Option<String> {
        if !self.applies_to(source_file) {
            return None;
        }
        match ArtifactKind::classify(rewritten) {
            ArtifactKind::Declaration => rewritten
                .strip_suffix(".d.ts")
                .map(|stem| format!("{stem}.d.mts")),
            ArtifactKind::DeclarationMap => rewritten
                .strip_suffix(".d.ts.map")
                .map(|stem| format!("{stem}.d.mts.map")),
            ArtifactKind::Code | ArtifactKind::CodeMap => None,
        }
    }
}

/// Several original names rewritten to the same target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    pub target: String,
    pub originals: Vec<String>,
}

/// Original artifact name -> rewritten artifact name for one emission.
#[derive(Debug, Clone, Default)]
pub struct OutputNameMap {
    names: IndexMap<String, String>,
}

impl OutputNameMap {
    /// Ask `host` for every artifact of every source file and rewrite each
    /// name through `rule` (with no origin: the input is an output path),
    /// then through `coercion`.
    ///
    /// Errors from the rule are returned; nothing is caught here.
    pub fn build<'s, I, H>(
        source_files: I,
        host: &H,
        rule: &RewriteRule,
        coercion: &ExtensionCoercion,
    ) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = &'s str>,
        H: EmitNameHost + ?Sized,
    {
        let mut names = IndexMap::new();
        for source_file in source_files {
            for original in host.output_file_names(source_file) {
                let rewritten = resolve_specifier(&original, rule, None)?.into_owned();
                let rewritten = coercion
                    .coerce(source_file, &rewritten)
                    .unwrap_or(rewritten);
                names.insert(original, rewritten);
            }
        }
        debug!(artifacts = names.len(), "built output name map");
        Ok(OutputNameMap { names })
    }

    /// The rewritten name for `name`, or `name` itself when the map never
    /// saw it.
    pub fn get<'a>(&'a self, name: &'a str) -> &'a str {
        match self.names.get(name) {
            Some(rewritten) => rewritten,
            None => {
                debug!(name, "artifact missing from output name map; keeping its name");
                name
            }
        }
    }

    /// The rewritten name, only if the map knows `name`.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(original, rewritten)` pairs in the order the host listed them.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(|(original, rewritten)| (original.as_str(), rewritten.as_str()))
    }

    /// Targets claimed by more than one original name, in first-seen order.
    pub fn collisions(&self) -> Vec<NameCollision> {
        let mut by_target: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
        let mut order: Vec<&str> = Vec::new();
        for (original, rewritten) in self.iter() {
            let originals = by_target.entry(rewritten).or_default();
            if originals.is_empty() {
                order.push(rewritten);
            }
            originals.push(original);
        }

        order
            .into_iter()
            .filter_map(|target| {
                let originals = by_target.remove(target)?;
                (originals.len() > 1).then(|| NameCollision {
                    target: target.to_string(),
                    originals: originals.into_iter().map(str::to_string).collect(),
                })
            })
            .collect()
    }
}
