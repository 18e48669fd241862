//! Node construction helpers.
//!
//! Convenience constructors used by tests and by passes that rebuild nodes.
//! Every constructor returns a fresh `Rc`.

use super::node::*;
use std::rc::Rc;

// =========================================================================
// Expressions
// =========================================================================

impl Expression {
    pub fn string(text: impl Into<String>) -> Rc<Self> {
        Rc::new(Expression::StringLiteral(text.into()))
    }

    pub fn id(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Expression::Identifier(name.into()))
    }

    pub fn number(text: impl Into<String>) -> Rc<Self> {
        Rc::new(Expression::NumericLiteral(text.into()))
    }

    pub fn verbatim(text: impl Into<String>) -> Rc<Self> {
        Rc::new(Expression::Verbatim(text.into()))
    }
}

// =========================================================================
// Types
// =========================================================================

impl TypeNode {
    pub fn keyword(name: impl Into<String>) -> Rc<Self> {
        Rc::new(TypeNode::Keyword(name.into()))
    }

    /// `Name` (no type arguments)
    pub fn reference(name: impl Into<String>) -> Rc<Self> {
        Rc::new(TypeNode::Reference(TypeReference {
            type_name: name.into(),
            type_arguments: None,
        }))
    }

    /// `Name<A, B>`
    pub fn generic(name: impl Into<String>, type_arguments: Vec<Rc<TypeNode>>) -> Rc<Self> {
        Rc::new(TypeNode::Reference(TypeReference {
            type_name: name.into(),
            type_arguments: Some(type_arguments),
        }))
    }

    /// `import("specifier").Qualifier<Args>`
    pub fn import_type(
        specifier: impl Into<String>,
        qualifier: Option<&str>,
        type_arguments: Option<Vec<Rc<TypeNode>>>,
    ) -> Rc<Self> {
        Rc::new(TypeNode::Import(ImportTypeNode {
            is_type_of: false,
            argument: TypeNode::string_literal_type(specifier),
            qualifier: qualifier.map(str::to_string),
            type_arguments,
        }))
    }

    /// `typeof import("specifier")`
    pub fn typeof_import(specifier: impl Into<String>) -> Rc<Self> {
        Rc::new(TypeNode::Import(ImportTypeNode {
            is_type_of: true,
            argument: TypeNode::string_literal_type(specifier),
            qualifier: None,
            type_arguments: None,
        }))
    }

    pub fn string_literal_type(text: impl Into<String>) -> Rc<Self> {
        Rc::new(TypeNode::Literal(Expression::string(text)))
    }

    pub fn union(types: Vec<Rc<TypeNode>>) -> Rc<Self> {
        Rc::new(TypeNode::Union(types))
    }

    pub fn array(element: Rc<TypeNode>) -> Rc<Self> {
        Rc::new(TypeNode::Array(element))
    }

    pub fn type_literal(members: Vec<PropertySignature>) -> Rc<Self> {
        Rc::new(TypeNode::TypeLiteral(members))
    }
}

impl PropertySignature {
    pub fn new(name: impl Into<String>, ty: Rc<TypeNode>) -> Self {
        PropertySignature {
            name: name.into(),
            is_optional: false,
            ty,
        }
    }
}

// =========================================================================
// Statements
// =========================================================================

impl Statement {
    /// `import { a, b } from "specifier";`
    pub fn import_named(names: &[&str], specifier: impl Into<String>) -> Rc<Self> {
        Self::import_with(
            false,
            Some(ImportClause {
                default_binding: None,
                named_bindings: Some(NamedBindings::Named(import_specifiers(names))),
            }),
            specifier,
        )
    }

    /// `import type { a, b } from "specifier";`
    pub fn import_type_only(names: &[&str], specifier: impl Into<String>) -> Rc<Self> {
        Self::import_with(
            true,
            Some(ImportClause {
                default_binding: None,
                named_bindings: Some(NamedBindings::Named(import_specifiers(names))),
            }),
            specifier,
        )
    }

    /// `import name from "specifier";`
    pub fn import_default(name: impl Into<String>, specifier: impl Into<String>) -> Rc<Self> {
        Self::import_with(
            false,
            Some(ImportClause {
                default_binding: Some(name.into()),
                named_bindings: None,
            }),
            specifier,
        )
    }

    /// `import * as name from "specifier";`
    pub fn import_namespace(name: impl Into<String>, specifier: impl Into<String>) -> Rc<Self> {
        Self::import_with(
            false,
            Some(ImportClause {
                default_binding: None,
                named_bindings: Some(NamedBindings::Namespace(name.into())),
            }),
            specifier,
        )
    }

    /// `import "specifier";`
    pub fn import_side_effect(specifier: impl Into<String>) -> Rc<Self> {
        Self::import_with(false, None, specifier)
    }

    fn import_with(
        is_type_only: bool,
        clause: Option<ImportClause>,
        specifier: impl Into<String>,
    ) -> Rc<Self> {
        Rc::new(Statement::Import(ImportDeclaration {
            is_type_only,
            clause,
            module_specifier: Expression::string(specifier),
            attributes: Vec::new(),
        }))
    }

    /// `export { a, b } from "specifier";`
    pub fn export_from(names: &[&str], specifier: impl Into<String>) -> Rc<Self> {
        Rc::new(Statement::Export(ExportDeclaration {
            is_type_only: false,
            clause: Some(ExportClause::Named(export_specifiers(names))),
            module_specifier: Some(Expression::string(specifier)),
        }))
    }

    /// `export type { a, b } from "specifier";`
    pub fn export_type_from(names: &[&str], specifier: impl Into<String>) -> Rc<Self> {
        Rc::new(Statement::Export(ExportDeclaration {
            is_type_only: true,
            clause: Some(ExportClause::Named(export_specifiers(names))),
            module_specifier: Some(Expression::string(specifier)),
        }))
    }

    /// `export * from "specifier";`
    pub fn export_all(specifier: impl Into<String>) -> Rc<Self> {
        Rc::new(Statement::Export(ExportDeclaration {
            is_type_only: false,
            clause: None,
            module_specifier: Some(Expression::string(specifier)),
        }))
    }

    /// `export { a, b };`
    pub fn export_local(names: &[&str]) -> Rc<Self> {
        Rc::new(Statement::Export(ExportDeclaration {
            is_type_only: false,
            clause: Some(ExportClause::Named(export_specifiers(names))),
            module_specifier: None,
        }))
    }

    /// `export default expression;`
    pub fn export_default(expression: Rc<Expression>) -> Rc<Self> {
        Rc::new(Statement::ExportAssignment(ExportAssignment {
            is_export_equals: false,
            expression,
        }))
    }

    /// `export = expression;`
    pub fn export_equals(expression: Rc<Expression>) -> Rc<Self> {
        Rc::new(Statement::ExportAssignment(ExportAssignment {
            is_export_equals: true,
            expression,
        }))
    }

    /// `export type name = ty;`
    pub fn type_alias(name: impl Into<String>, ty: Rc<TypeNode>) -> Rc<Self> {
        Rc::new(Statement::TypeAlias(TypeAliasDeclaration {
            is_exported: true,
            name: name.into(),
            type_parameters: Vec::new(),
            ty,
        }))
    }

    /// `export const name: ty = initializer;`
    pub fn const_decl(
        name: impl Into<String>,
        ty: Option<Rc<TypeNode>>,
        initializer: Option<Rc<Expression>>,
    ) -> Rc<Self> {
        Rc::new(Statement::Variable(VariableStatement {
            is_exported: true,
            kind: VariableKind::Const,
            name: name.into(),
            ty,
            initializer,
        }))
    }

    /// `export function name(params): return_type { body }`
    pub fn function(
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        return_type: Option<Rc<TypeNode>>,
        body: impl Into<String>,
    ) -> Rc<Self> {
        Rc::new(Statement::Function(FunctionDeclaration {
            is_exported: true,
            name: name.into(),
            parameters,
            return_type,
            body: Some(body.into()),
        }))
    }

    pub fn verbatim(text: impl Into<String>) -> Rc<Self> {
        Rc::new(Statement::Verbatim(text.into()))
    }
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Option<Rc<TypeNode>>) -> Self {
        Parameter {
            name: name.into(),
            is_optional: false,
            ty,
        }
    }
}

fn import_specifiers(names: &[&str]) -> Vec<ImportSpecifier> {
    names
        .iter()
        .map(|name| ImportSpecifier {
            is_type_only: false,
            property_name: None,
            name: (*name).to_string(),
        })
        .collect()
}

fn export_specifiers(names: &[&str]) -> Vec<ExportSpecifier> {
    names
        .iter()
        .map(|name| ExportSpecifier {
            is_type_only: false,
            property_name: None,
            name: (*name).to_string(),
        })
        .collect()
}
