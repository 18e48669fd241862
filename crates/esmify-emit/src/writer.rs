//! The write callback every emitted artifact goes through.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::trace;

const BYTE_ORDER_MARK: &str = "\u{FEFF}";

pub trait WriteFile {
    fn write_file(&mut self, name: &str, contents: &str, write_bom: bool) -> Result<()>;
}

impl<W: WriteFile + ?Sized> WriteFile for &mut W {
    fn write_file(&mut self, name: &str, contents: &str, write_bom: bool) -> Result<()> {
        (**self).write_file(name, contents, write_bom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: String,
    pub contents: String,
    pub write_bom: bool,
}

/// Collects artifacts in memory, in write order.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    pub files: Vec<OutputFile>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        MemoryWriter::default()
    }

    /// The last contents written under `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .rev()
            .find(|file| file.path == path)
            .map(|file| file.contents.as_str())
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|file| file.path.as_str()).collect()
    }
}

impl WriteFile for MemoryWriter {
    fn write_file(&mut self, name: &str, contents: &str, write_bom: bool) -> Result<()> {
        self.files.push(OutputFile {
            path: name.to_string(),
            contents: contents.to_string(),
            write_bom,
        });
        Ok(())
    }
}

/// Writes artifacts to disk. Relative names resolve against `root`.
#[derive(Debug, Clone, Default)]
pub struct DiskWriter {
    root: PathBuf,
}

impl DiskWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskWriter { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl WriteFile for DiskWriter {
    fn write_file(&mut self, name: &str, contents: &str, write_bom: bool) -> Result<()> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let written = if write_bom {
            std::fs::write(&path, format!("{BYTE_ORDER_MARK}{contents}"))
        } else {
            std::fs::write(&path, contents)
        };
        written.with_context(|| format!("failed to write {}", path.display()))?;
        trace!(path = %path.display(), bytes = contents.len(), "wrote artifact");
        Ok(())
    }
}
