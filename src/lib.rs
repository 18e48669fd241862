//! esmify: explicit ECMAScript-module emit.
//!
//! Wires the rewriting core (`esmify-rewrite`) into project emission
//! (`esmify-emit`): specifiers inside emitted trees, the names of emitted
//! artifacts and the references between artifacts are all rewritten by one
//! rule, so the output on disk stays self-consistent.

pub use esmify_emit as emit;
pub use esmify_rewrite as rewrite;
pub use esmify_syntax as syntax;

// Transformer and write-callback wrappers
pub mod hooks;
pub use hooks::{ImportingArtifact, ModuleOutputs, RewritingTransformer, RewritingWriter};

pub mod pipeline;
pub use pipeline::{emit_with_rewrites, output_name_map};

// esmify.json loading
pub mod config;
pub use config::{EsmifyConfig, MatcherConfig, Preset, load_config};

pub mod tracing_config;
pub use tracing_config::init_tracing;
