//! Emission hooks that apply a rewrite rule.
//!
//! `RewritingTransformer` rewrites specifiers inside each tree before it is
//! printed. `RewritingWriter` renames each artifact through the precomputed
//! [`OutputNameMap`] and fixes the references artifacts make to each other.
//! [`ModuleOutputs`] ties the two together: a relative import the rule
//! changes is pointed at the file its target module is really written to.

use anyhow::Result;
use esmify_emit::output_paths::{path_to_string, relative_path};
use esmify_emit::{Program, Transformer, WriteFile};
use esmify_rewrite::rule::is_relative_specifier;
use esmify_rewrite::{
    ArtifactKind, OutputNameMap, RewriteRule, RuleError, fix_embedded_reference,
    fix_source_map_file, resolve_specifier, rewrite_unit,
};
use esmify_syntax::EmitUnit;
use indexmap::IndexMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Extensions a relative specifier may name its target module with.
const MODULE_EXTENSIONS: [&str; 8] = [
    ".tsx", ".ts", ".mts", ".cts", ".jsx", ".js", ".mjs", ".cjs",
];

/// The artifact family a tree is printed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportingArtifact {
    Code,
    Declaration,
}

/// Rewritten artifact names of every module in a program.
#[derive(Debug, Default)]
pub struct ModuleOutputs {
    /// Module path without extension -> rewritten code artifact.
    code_by_module: IndexMap<String, String>,
    /// Source file name -> rewritten code and declaration artifacts.
    artifacts: IndexMap<String, (Option<String>, Option<String>)>,
}

impl ModuleOutputs {
    pub fn new(program: &Program, names: &OutputNameMap) -> Self {
        let emit_names = program.emit_names();
        let rewritten = |path: Option<PathBuf>| {
            path.map(|path| names.get(&path_to_string(&path)).to_string())
        };

        let mut outputs = ModuleOutputs::default();
        for source_file in program.source_file_names() {
            let paths = emit_names.paths_for(source_file);
            let code = rewritten(paths.code);
            let declaration = rewritten(paths.declaration);
            if code.is_none() && declaration.is_none() {
                continue;
            }
            if let Some(code) = &code {
                outputs
                    .code_by_module
                    .insert(module_key(&normalize(Path::new(source_file))), code.clone());
            }
            outputs
                .artifacts
                .insert(source_file.to_string(), (code, declaration));
        }
        outputs
    }

    /// Specifier reaching `specifier`'s module from the `importing` artifact
    /// of `origin`, or `None` when either side is not emitted by the program.
    pub fn resolve_import(
        &self,
        specifier: &str,
        origin: &str,
        importing: ImportingArtifact,
    ) -> Option<String> {
        let (code, declaration) = self.artifacts.get(origin)?;
        let importer = match importing {
            ImportingArtifact::Code => code.as_deref(),
            ImportingArtifact::Declaration => declaration.as_deref(),
        }?;

        let requested = normalize(&parent_dir(origin).join(specifier));
        let target = self.code_by_module.get(&module_key(&requested))?;
        let relative = path_to_string(&relative_path(parent_dir(importer), Path::new(target)));
        if relative.starts_with("../") {
            Some(relative)
        } else {
            Some(format!("./{relative}"))
        }
    }
}

/// Runs the specifier visitor over every unit it is given.
#[derive(Debug, Clone)]
pub struct RewritingTransformer {
    rule: RewriteRule,
}

impl RewritingTransformer {
    pub fn new(rule: RewriteRule) -> Self {
        RewritingTransformer { rule }
    }

    /// Like [`RewritingTransformer::new`], but a relative specifier that
    /// `rule` changes into another relative one is replaced by the path of
    /// the artifact its module is actually emitted as.
    ///
    /// Specifiers the rule leaves alone, sends elsewhere (an alias or a
    /// package) or that name no program module keep the rule's result.
    pub fn against_outputs(
        rule: RewriteRule,
        outputs: Arc<ModuleOutputs>,
        importing: ImportingArtifact,
    ) -> Self {
        let rule = RewriteRule::function(move |specifier, origin| {
            let resolved = resolve_specifier(specifier, &rule, origin)?;
            if resolved == specifier {
                return Ok(None);
            }
            let emitted = origin
                .filter(|_| is_relative_specifier(&resolved))
                .and_then(|origin| outputs.resolve_import(specifier, origin, importing));
            match emitted {
                Some(emitted) => {
                    if emitted != resolved {
                        trace!(
                            specifier,
                            rule = %resolved,
                            emitted = %emitted,
                            "import follows output"
                        );
                    }
                    Ok(Some(emitted))
                }
                None => Ok(Some(resolved.into_owned())),
            }
        });
        RewritingTransformer { rule }
    }
}

impl Transformer for RewritingTransformer {
    fn name(&self) -> &str {
        "specifier rewriter"
    }

    fn transform(&self, unit: EmitUnit) -> Result<EmitUnit> {
        Ok(rewrite_unit(&unit, &self.rule)?)
    }
}

/// Write callback wrapper: the host writes under original names, `inner`
/// receives rewritten names and contents.
pub struct RewritingWriter<'a, W: WriteFile + ?Sized> {
    inner: &'a mut W,
    names: &'a OutputNameMap,
    rule: &'a RewriteRule,
}

impl<'a, W: WriteFile + ?Sized> RewritingWriter<'a, W> {
    pub fn new(inner: &'a mut W, names: &'a OutputNameMap, rule: &'a RewriteRule) -> Self {
        RewritingWriter { inner, names, rule }
    }
}

impl<W: WriteFile + ?Sized> WriteFile for RewritingWriter<'_, W> {
    fn write_file(&mut self, name: &str, contents: &str, write_bom: bool) -> Result<()> {
        let names = self.names;
        let rule = self.rule;
        let target = names.get(name);

        let resolve = |reference: &str| resolve_reference(names, rule, name, target, reference);
        let contents = if ArtifactKind::classify(name).is_map() {
            fix_source_map_file(contents, resolve)?
        } else {
            fix_embedded_reference(contents, resolve)?
        };

        if target != name {
            debug!(from = name, to = target, "renamed artifact");
        }
        self.inner.write_file(target, &contents, write_bom)
    }
}

/// Resolve a reference one artifact makes to a sibling (`a.js.map` from
/// `dist/a.js`, or `a.js` from `dist/a.js.map`).
///
/// A sibling the name map knows is located at its rewritten path, relative
/// to where `artifact` itself ends up. Anything else goes through the rule.
fn resolve_reference(
    names: &OutputNameMap,
    rule: &RewriteRule,
    artifact: &str,
    target: &str,
    reference: &str,
) -> Result<String, RuleError> {
    let sibling = path_to_string(&parent_dir(artifact).join(reference));
    if let Some(rewritten) = names.lookup(&sibling) {
        return Ok(path_to_string(&relative_path(
            parent_dir(target),
            Path::new(rewritten),
        )));
    }
    Ok(resolve_specifier(reference, rule, None)?.into_owned())
}

fn parent_dir(path: &str) -> &Path {
    Path::new(path).parent().unwrap_or_else(|| Path::new(""))
}

/// Lexically resolve `.` and `..` segments, with forward slashes.
fn normalize(path: &Path) -> String {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(parts.last(), Some(Component::Normal(_))) => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    path_to_string(&parts.iter().collect::<PathBuf>())
}

/// `src/view.tsx`, `src/view.mjs` and `src/view` all name module `src/view`.
fn module_key(path: &str) -> String {
    MODULE_EXTENSIONS
        .iter()
        .find_map(|extension| path.strip_suffix(extension))
        .unwrap_or(path)
        .to_string()
}
