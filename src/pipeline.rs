//! One-shot emission with specifier and output name rewriting.

use crate::hooks::{ImportingArtifact, ModuleOutputs, RewritingTransformer, RewritingWriter};
use anyhow::{Context, Result, bail};
use esmify_emit::{EmitResult, EmitTransformers, Program, WriteFile};
use esmify_rewrite::{ExtensionCoercion, OutputNameMap, RewriteRule};
use std::sync::Arc;
use tracing::{debug, info_span};

/// Output names for `program` under `rule`, computed from the program's own
/// emit-naming decision.
pub fn output_name_map(
    program: &Program,
    rule: &RewriteRule,
    coercion: &ExtensionCoercion,
) -> Result<OutputNameMap> {
    let emit_names = program.emit_names();
    let host = |source_file: &str| emit_names.output_file_names(source_file);
    OutputNameMap::build(program.source_file_names(), &host, rule, coercion)
        .context("failed to compute output names")
}

/// Emit `program` with every specifier, artifact name and embedded reference
/// rewritten by `rule`.
///
/// The name map is built once up front; a rule that sends two artifacts to
/// the same name is rejected before anything is written. Relative imports
/// between program modules follow the names their targets are written under,
/// so `./view` reaches `view.jsx` under `jsx: preserve`. The returned result
/// lists the names actually written.
pub fn emit_with_rewrites(
    program: &Program,
    rule: &RewriteRule,
    coercion: &ExtensionCoercion,
    writer: &mut dyn WriteFile,
) -> Result<EmitResult> {
    let _span = info_span!("emit_with_rewrites", files = program.files().len()).entered();

    let names = output_name_map(program, rule, coercion)?;
    if let Some(collision) = names.collisions().into_iter().next() {
        bail!(
            "rewrite rule sends {} to the same output '{}'",
            collision.originals.join(", "),
            collision.target
        );
    }
    debug!(artifacts = names.len(), "output names ready");

    let outputs = Arc::new(ModuleOutputs::new(program, &names));
    let transformers = EmitTransformers::new()
        .with_after(RewritingTransformer::against_outputs(
            rule.clone(),
            outputs.clone(),
            ImportingArtifact::Code,
        ))
        .with_after_declarations(RewritingTransformer::against_outputs(
            rule.clone(),
            outputs,
            ImportingArtifact::Declaration,
        ));
    let mut rewriting = RewritingWriter::new(writer, &names, rule);
    let result = program.emit(&transformers, &mut rewriting)?;

    let emitted_files = result
        .emitted_files
        .iter()
        .map(|name| names.get(name).to_string())
        .collect();
    Ok(EmitResult { emitted_files })
}
