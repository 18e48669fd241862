//! Syntax tree nodes.
//!
//! The tree only models what module-specifier rewriting needs to see:
//! module-level statements, the type positions that can hold `import("...")`
//! types, and string literals. Anything else is carried as verbatim text.

use std::rc::Rc;

/// A parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub file_name: String,
    pub statements: Vec<Rc<Statement>>,
    /// `.d.ts` / `.d.mts` / `.d.cts` input. Declaration inputs produce no output.
    pub is_declaration_file: bool,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, statements: Vec<Rc<Statement>>) -> Rc<Self> {
        let file_name = file_name.into();
        let is_declaration_file = is_declaration_file_name(&file_name);
        Rc::new(SourceFile {
            file_name,
            statements,
            is_declaration_file,
        })
    }

    /// Copy of this file with a different statement list.
    pub fn with_statements(&self, statements: Vec<Rc<Statement>>) -> Rc<Self> {
        Rc::new(SourceFile {
            file_name: self.file_name.clone(),
            statements,
            is_declaration_file: self.is_declaration_file,
        })
    }
}

/// Returns true for declaration file names (`.d.ts`, `.d.mts`, `.d.cts`).
pub fn is_declaration_file_name(name: &str) -> bool {
    name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts")
}

/// Several source files emitted together.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub source_files: Vec<Rc<SourceFile>>,
}

/// The unit a transformer hook receives: one file or a bundle of files.
#[derive(Debug, Clone, PartialEq)]
pub enum EmitUnit {
    SourceFile(Rc<SourceFile>),
    Bundle(Rc<Bundle>),
}

impl EmitUnit {
    /// Every source file in the unit, in order.
    pub fn source_files(&self) -> Vec<Rc<SourceFile>> {
        match self {
            EmitUnit::SourceFile(file) => vec![file.clone()],
            EmitUnit::Bundle(bundle) => bundle.source_files.clone(),
        }
    }

    /// Returns true if both units share the same underlying allocation.
    pub fn ptr_eq(&self, other: &EmitUnit) -> bool {
        match (self, other) {
            (EmitUnit::SourceFile(a), EmitUnit::SourceFile(b)) => Rc::ptr_eq(a, b),
            (EmitUnit::Bundle(a), EmitUnit::Bundle(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// =========================================================================
// Statements
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `import x, { y } from "./mod";`
    Import(ImportDeclaration),
    /// `export { x } from "./mod";`, `export * from "./mod";`, `export { x };`
    Export(ExportDeclaration),
    /// `export default "./mod";`, `export = "./mod";`
    ExportAssignment(ExportAssignment),
    /// `type Name<T> = ...;`
    TypeAlias(TypeAliasDeclaration),
    /// `const name: T = ...;`
    Variable(VariableStatement),
    /// `function name(a: T): R { ... }`
    Function(FunctionDeclaration),
    /// Statement text the tree does not model. Printed as-is in code output.
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    /// `import type ...`
    pub is_type_only: bool,
    /// `None` for side-effect imports (`import "./polyfill";`).
    pub clause: Option<ImportClause>,
    pub module_specifier: Rc<Expression>,
    /// `with { type: "json" }`
    pub attributes: Vec<ImportAttribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportClause {
    pub default_binding: Option<String>,
    pub named_bindings: Option<NamedBindings>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NamedBindings {
    /// `* as ns`
    Namespace(String),
    /// `{ a, b as c, type D }`
    Named(Vec<ImportSpecifier>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    pub is_type_only: bool,
    pub property_name: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportAttribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDeclaration {
    /// `export type { ... }`
    pub is_type_only: bool,
    /// `None` for `export * from "..."`.
    pub clause: Option<ExportClause>,
    /// `None` for local exports (`export { a };`).
    pub module_specifier: Option<Rc<Expression>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportClause {
    /// `* as ns`
    Namespace(String),
    /// `{ a, b as c }`
    Named(Vec<ExportSpecifier>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub is_type_only: bool,
    pub property_name: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportAssignment {
    /// `export = expr` rather than `export default expr`.
    pub is_export_equals: bool,
    pub expression: Rc<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDeclaration {
    pub is_exported: bool,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub ty: Rc<TypeNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableStatement {
    pub is_exported: bool,
    pub kind: VariableKind,
    pub name: String,
    pub ty: Option<Rc<TypeNode>>,
    pub initializer: Option<Rc<Expression>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub is_exported: bool,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<Rc<TypeNode>>,
    /// Body text between the braces; `None` for overload signatures.
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub is_optional: bool,
    pub ty: Option<Rc<TypeNode>>,
}

// =========================================================================
// Types
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    /// `string`, `number`, `void`, ...
    Keyword(String),
    /// `Name` or `Name<A, B>`
    Reference(TypeReference),
    /// `import("./mod").Name<A>` / `typeof import("./mod")`
    Import(ImportTypeNode),
    /// A literal used as a type: `"a"`, `1`
    Literal(Rc<Expression>),
    /// `A | B`
    Union(Vec<Rc<TypeNode>>),
    /// `T[]`
    Array(Rc<TypeNode>),
    /// `{ a: A; b?: B }`
    TypeLiteral(Vec<PropertySignature>),
}

impl TypeNode {
    /// The literal text of a string-literal type (`"./mod"`), if this is one.
    pub fn string_literal(&self) -> Option<&str> {
        match self {
            TypeNode::Literal(expr) => expr.string_literal(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeReference {
    pub type_name: String,
    /// `None` when written without `<...>`.
    pub type_arguments: Option<Vec<Rc<TypeNode>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportTypeNode {
    pub is_type_of: bool,
    /// Usually a string literal type; anything else is left alone.
    pub argument: Rc<TypeNode>,
    pub qualifier: Option<String>,
    pub type_arguments: Option<Vec<Rc<TypeNode>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySignature {
    pub name: String,
    pub is_optional: bool,
    pub ty: Rc<TypeNode>,
}

// =========================================================================
// Expressions
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(String),
    /// Unquoted, unescaped text.
    StringLiteral(String),
    NumericLiteral(String),
    /// Expression text the tree does not model.
    Verbatim(String),
}

impl Expression {
    pub fn string_literal(&self) -> Option<&str> {
        match self {
            Expression::StringLiteral(text) => Some(text),
            _ => None,
        }
    }
}
