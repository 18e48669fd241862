//! Where each source file's artifacts land.

use crate::options::{EmitOptions, JsxEmit};
use esmify_syntax::node::is_declaration_file_name;
use std::path::{Component, Path, PathBuf};

/// Every artifact one source file produces. Unset entries are not emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitPaths {
    pub code: Option<PathBuf>,
    pub code_map: Option<PathBuf>,
    pub declaration: Option<PathBuf>,
    pub declaration_map: Option<PathBuf>,
}

impl EmitPaths {
    /// Artifact names in emission order: code, code map, declaration,
    /// declaration map.
    pub fn names(&self) -> Vec<String> {
        [
            &self.code,
            &self.code_map,
            &self.declaration,
            &self.declaration_map,
        ]
        .into_iter()
        .flatten()
        .map(|path| path_to_string(path))
        .collect()
    }
}

/// The project's own emit-naming decision.
#[derive(Debug, Clone, Copy)]
pub struct ProjectEmitNames<'a> {
    base_dir: &'a Path,
    options: &'a EmitOptions,
}

impl<'a> ProjectEmitNames<'a> {
    pub fn new(base_dir: &'a Path, options: &'a EmitOptions) -> Self {
        ProjectEmitNames { base_dir, options }
    }

    pub fn paths_for(&self, source_file: &str) -> EmitPaths {
        let input = self.base_dir.join(source_file);
        let mut paths = EmitPaths::default();
        let Some(file_name) = input.file_name().and_then(|name| name.to_str()) else {
            return paths;
        };
        if is_declaration_file_name(file_name) {
            return paths;
        }

        let relative = self.relative_to_root(&input);
        let options = self.options;

        if options.emits_code()
            && let Some(extension) = js_extension_for(file_name, options.jsx)
        {
            let mut code = self.place(options.out_dir.as_deref(), &input, relative);
            code.set_extension(extension);
            if options.source_map {
                paths.code_map = map_output_path(&code);
            }
            paths.code = Some(code);
        }

        if options.emit_declarations
            && let Some(declaration_name) = declaration_file_name(file_name)
        {
            let dir = options.declaration_dir.as_deref().or(options.out_dir.as_deref());
            let declaration = self
                .place(dir, &input, relative)
                .with_file_name(declaration_name);
            if options.declaration_map {
                paths.declaration_map = map_output_path(&declaration);
            }
            paths.declaration = Some(declaration);
        }
        paths
    }

    /// Artifact names for `source_file`, in emission order. Declaration
    /// inputs emit nothing.
    pub fn output_file_names(&self, source_file: &str) -> Vec<String> {
        self.paths_for(source_file).names()
    }

    /// `input` mirrored under `dir`, or left beside its source without one.
    fn place(&self, dir: Option<&Path>, input: &Path, relative: &Path) -> PathBuf {
        match dir {
            Some(dir) => self.resolve_dir(dir).join(relative),
            None => input.to_path_buf(),
        }
    }

    /// `input` below `rootDir`; inputs outside it fall back to the base directory.
    fn relative_to_root<'p>(&self, input: &'p Path) -> &'p Path {
        self.options
            .root_dir
            .as_deref()
            .and_then(|root| input.strip_prefix(self.resolve_dir(root)).ok())
            .or_else(|| input.strip_prefix(self.base_dir).ok())
            .unwrap_or(input)
    }

    fn resolve_dir(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.base_dir.join(dir)
        }
    }
}

/// `dist/a.js` -> `dist/a.js.map`
pub fn map_output_path(output_path: &Path) -> Option<PathBuf> {
    let output_name = output_path.file_name()?.to_str()?;
    Some(output_path.with_file_name(format!("{output_name}.map")))
}

/// `a.mts` -> `a.d.mts`, `a.cts` -> `a.d.cts`, `a.ts`/`a.tsx` -> `a.d.ts`
fn declaration_file_name(file_name: &str) -> Option<String> {
    [(".mts", ".d.mts"), (".cts", ".d.cts"), (".tsx", ".d.ts"), (".ts", ".d.ts")]
        .into_iter()
        .find_map(|(source, declaration)| {
            file_name
                .strip_suffix(source)
                .map(|stem| format!("{stem}{declaration}"))
        })
}

fn js_extension_for(file_name: &str, jsx: Option<JsxEmit>) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;
    match extension {
        "mts" => Some("mjs"),
        "cts" => Some("cjs"),
        "ts" => Some("js"),
        "tsx" if jsx == Some(JsxEmit::Preserve) => Some("jsx"),
        "tsx" => Some("js"),
        _ => None,
    }
}

/// Path from directory `from` to `to`, using `..` where they diverge.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = significant_components(from);
    let to = significant_components(to);
    let shared = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result: PathBuf = std::iter::repeat_n(Component::ParentDir, from.len() - shared)
        .chain(to[shared..].iter().copied())
        .collect();
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

fn significant_components(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|component| *component != Component::CurDir)
        .collect()
}

/// Artifact names use forward slashes regardless of platform.
pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
#[path = "output_paths_tests.rs"]
mod tests;
