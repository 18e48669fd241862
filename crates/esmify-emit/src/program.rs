//! A set of parsed source files and the loop that emits them.

use crate::options::EmitOptions;
use crate::output_paths::{EmitPaths, ProjectEmitNames, path_to_string, relative_path};
use crate::transform::EmitTransformers;
use crate::writer::WriteFile;
use anyhow::{Context, Result};
use esmify_syntax::{EmitUnit, PrintMode, PrintOptions, Printer, SourceFile};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, debug_span};

#[derive(Debug, Clone)]
pub struct Program {
    base_dir: PathBuf,
    options: EmitOptions,
    files: Vec<Rc<SourceFile>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitResult {
    /// Names handed to the write callback, in order.
    pub emitted_files: Vec<String>,
}

/// Source map v3 payload. Positions are not tracked, so `mappings` is empty.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceMapJson<'a> {
    version: u32,
    file: &'a str,
    source_root: &'a str,
    sources: Vec<String>,
    names: Vec<String>,
    mappings: &'a str,
}

impl Program {
    pub fn new(base_dir: impl Into<PathBuf>, options: EmitOptions) -> Self {
        Program {
            base_dir: base_dir.into(),
            options,
            files: Vec::new(),
        }
    }

    pub fn add_file(&mut self, file: Rc<SourceFile>) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[Rc<SourceFile>] {
        &self.files
    }

    pub fn source_file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|file| file.file_name.as_str())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    pub fn emit_names(&self) -> ProjectEmitNames<'_> {
        ProjectEmitNames::new(&self.base_dir, &self.options)
    }

    /// Emit every non-declaration file. Each file's code artifacts are
    /// written before its declaration artifacts.
    ///
    /// Stops at the first failing hook or write; earlier artifacts stay written.
    pub fn emit(
        &self,
        transformers: &EmitTransformers,
        writer: &mut dyn WriteFile,
    ) -> Result<EmitResult> {
        let mut result = EmitResult::default();
        let names = self.emit_names();

        for file in &self.files {
            if file.is_declaration_file {
                continue;
            }
            let _span = debug_span!("emit_file", file = %file.file_name).entered();
            let paths = names.paths_for(&file.file_name);

            if let Some(code_path) = paths.code.as_deref() {
                let unit = transformers
                    .run_after(EmitUnit::SourceFile(file.clone()))
                    .with_context(|| format!("failed to transform {}", file.file_name))?;
                self.emit_artifact(
                    &unit,
                    PrintMode::Code,
                    code_path,
                    paths.code_map.as_deref(),
                    &file.file_name,
                    writer,
                    &mut result,
                )?;
            }

            if let Some(declaration_path) = paths.declaration.as_deref() {
                let unit = transformers
                    .run_after_declarations(EmitUnit::SourceFile(file.clone()))
                    .with_context(|| {
                        format!("failed to transform declarations of {}", file.file_name)
                    })?;
                self.emit_artifact(
                    &unit,
                    PrintMode::Declaration,
                    declaration_path,
                    paths.declaration_map.as_deref(),
                    &file.file_name,
                    writer,
                    &mut result,
                )?;
            }

            log_skipped(&paths, &file.file_name);
        }

        debug!(files = result.emitted_files.len(), "emit finished");
        Ok(result)
    }

    fn emit_artifact(
        &self,
        unit: &EmitUnit,
        mode: PrintMode,
        output_path: &Path,
        map_path: Option<&Path>,
        source_file: &str,
        writer: &mut dyn WriteFile,
        result: &mut EmitResult,
    ) -> Result<()> {
        let print_options = PrintOptions {
            mode,
            new_line: self.options.new_line,
        };
        let mut printer = Printer::new(print_options);
        for file in unit.source_files() {
            printer.print_source_file(&file);
        }
        let mut contents = printer.finish();

        let map = match map_path {
            Some(map_path) => {
                let map_name = file_name_of(map_path)?;
                contents = with_map_trailer(contents, map_name, self.options.new_line.as_str());
                Some((map_path, self.source_map_json(output_path, map_path, source_file)?))
            }
            None => None,
        };

        let name = path_to_string(output_path);
        writer
            .write_file(&name, &contents, self.options.emit_bom)
            .with_context(|| format!("failed to emit {name}"))?;
        result.emitted_files.push(name);

        if let Some((map_path, map_json)) = map {
            let name = path_to_string(map_path);
            writer
                .write_file(&name, &map_json, false)
                .with_context(|| format!("failed to emit {name}"))?;
            result.emitted_files.push(name);
        }
        Ok(())
    }

    fn source_map_json(
        &self,
        output_path: &Path,
        map_path: &Path,
        source_file: &str,
    ) -> Result<String> {
        let map_dir = map_path.parent().unwrap_or_else(|| Path::new(""));
        let source = relative_path(map_dir, &self.base_dir.join(source_file));
        let map = SourceMapJson {
            version: 3,
            file: file_name_of(output_path)?,
            source_root: "",
            sources: vec![path_to_string(&source)],
            names: Vec::new(),
            mappings: "",
        };
        serde_json::to_string(&map).context("failed to serialize source map")
    }
}

fn file_name_of(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("output path has no file name: {}", path.display()))
}

/// `contents` with the map reference on a line of its own at the end.
fn with_map_trailer(contents: String, map_name: &str, new_line: &str) -> String {
    let separator = if contents.is_empty() || contents.ends_with(new_line) {
        ""
    } else {
        new_line
    };
    format!("{contents}{separator}//# sourceMappingURL={map_name}")
}

fn log_skipped(paths: &EmitPaths, source_file: &str) {
    if paths.code.is_none() && paths.declaration.is_none() {
        debug!(source_file, "no artifacts for file");
    }
}
