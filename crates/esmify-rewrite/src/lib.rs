//! Module specifier and output name rewriting.
//!
//! Everything in this crate is a pure function over trees and strings:
//! - Rewrite rules (`RewriteRule`, `Matcher`) and the built-in explicit-ESM preset
//! - Specifier resolution (`resolve_specifier`)
//! - Whole-tree specifier rewriting (`SpecifierVisitor`)
//! - Output artifact name mapping (`OutputNameMap`)
//! - Embedded source-map reference fixing (`fix_source_mapping_url`)
//!
//! One `RewriteRule` drives all of them so tree contents, file names and
//! embedded references agree after an emission.

pub mod error;
pub use error::RuleError;

pub mod rule;
pub use rule::{Matcher, RecordBuilder, RewriteFn, RewriteRule, RuleResult};

pub mod resolver;
pub use resolver::resolve_specifier;

pub mod visitor;
pub use visitor::{NodeRef, SpecifierShape, SpecifierVisitor, rewrite_source_file, rewrite_unit};

pub mod name_map;
pub use name_map::{ArtifactKind, EmitNameHost, ExtensionCoercion, NameCollision, OutputNameMap};

pub mod source_map_ref;
pub use source_map_ref::{
    SOURCE_MAPPING_URL_PREFIX, find_source_mapping_url, fix_embedded_reference,
    fix_source_map_file, fix_source_mapping_url,
};
