//! Project emission for esmify.
//!
//! This is the host side of the pipeline: it owns compiler options, decides
//! which artifacts each source file produces, runs transformer hooks over the
//! trees, prints them and hands every artifact to a write callback.

pub mod options;
pub use options::{CompilerOptions, EmitOptions, JsxEmit, resolve_compiler_options};

pub mod output_paths;
pub use output_paths::{EmitPaths, ProjectEmitNames};

pub mod program;
pub use program::{EmitResult, Program};

pub mod transform;
pub use transform::{EmitTransformers, Transformer};

pub mod writer;
pub use writer::{DiskWriter, MemoryWriter, OutputFile, WriteFile};
