//! Module-level syntax tree for esmify.
//!
//! This crate provides the tree representation the rewriting passes operate on:
//! - Immutable, reference-counted nodes (`SourceFile`, `Statement`, `TypeNode`, `Expression`)
//! - Batch emit units (`Bundle`, `EmitUnit`)
//! - Node factory helpers (`factory`)
//! - A printer for code and declaration output (`Printer`)
//!
//! Nodes are shared through `Rc`. A pass that leaves a subtree alone hands
//! back the same `Rc`, so callers can use `Rc::ptr_eq` to skip unchanged work.

pub mod node;
pub use node::{
    Bundle, EmitUnit, ExportAssignment, ExportClause, ExportDeclaration, ExportSpecifier,
    Expression, FunctionDeclaration, ImportAttribute, ImportClause, ImportDeclaration,
    ImportSpecifier, ImportTypeNode, NamedBindings, Parameter, PropertySignature, SourceFile,
    Statement, TypeAliasDeclaration, TypeNode, TypeReference, VariableKind, VariableStatement,
};

// Node construction helpers
pub mod factory;

// Code / declaration printing
pub mod printer;
pub use printer::{NewLine, PrintMode, PrintOptions, Printer};
