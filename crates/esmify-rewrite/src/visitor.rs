//! Whole-tree module specifier rewriting.
//!
//! The visitor walks a source file and rebuilds only the nodes whose module
//! specifier changes (plus their ancestors). Every other node is handed back
//! as the same `Rc`, so `Rc::ptr_eq` tells a caller what was touched.
//!
//! Specifier-bearing nodes come in a closed set of shapes, tested in a fixed
//! order (`SpecifierShape::PRIORITY`):
//!
//! ```text
//! import x from "./a";                      ImportDeclaration
//! export { x } from "./a";                  ExportDeclaration
//! Promise<import("./a").X>                  TypeReferenceWithArguments
//! import("./a").X<Y>                        ImportTypeWithLiteral
//! export default "./a";                     ExportAssignmentWithLiteral
//! ```
//!
//! Type arguments are visited with the same visitor, so any depth of nesting
//! is rewritten in one pass.

use crate::error::RuleError;
use crate::resolver::resolve_specifier;
use crate::rule::RewriteRule;
use esmify_syntax::{
    Bundle, EmitUnit, Expression, ImportTypeNode, Parameter, PropertySignature, SourceFile,
    Statement, TypeNode, TypeReference,
};
use std::rc::Rc;
use tracing::debug;

/// A borrowed view of a node that may carry a specifier.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Statement(&'a Statement),
    Type(&'a TypeNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierShape {
    /// Any import declaration with a string-literal specifier (value or type-only).
    ImportDeclaration,
    /// A re-export (`export ... from "..."`, value or type-only).
    ExportDeclaration,
    /// A type reference written with `<...>`; its arguments may hold import types.
    TypeReferenceWithArguments,
    /// `import("...")` in a type position with a string-literal argument.
    ImportTypeWithLiteral,
    /// `export default "..."` / `export = "..."`
    ExportAssignmentWithLiteral,
}

impl SpecifierShape {
    pub const PRIORITY: [SpecifierShape; 5] = [
        SpecifierShape::ImportDeclaration,
        SpecifierShape::ExportDeclaration,
        SpecifierShape::TypeReferenceWithArguments,
        SpecifierShape::ImportTypeWithLiteral,
        SpecifierShape::ExportAssignmentWithLiteral,
    ];

    pub fn matches(self, node: NodeRef<'_>) -> bool {
        match (self, node) {
            (Self::ImportDeclaration, NodeRef::Statement(Statement::Import(decl))) => {
                decl.module_specifier.string_literal().is_some()
            }
            (Self::ExportDeclaration, NodeRef::Statement(Statement::Export(decl))) => decl
                .module_specifier
                .as_ref()
                .is_some_and(|specifier| specifier.string_literal().is_some()),
            (Self::TypeReferenceWithArguments, NodeRef::Type(TypeNode::Reference(reference))) => {
                reference.type_arguments.is_some()
            }
            (Self::ImportTypeWithLiteral, NodeRef::Type(TypeNode::Import(import))) => {
                import.argument.string_literal().is_some()
            }
            (
                Self::ExportAssignmentWithLiteral,
                NodeRef::Statement(Statement::ExportAssignment(assignment)),
            ) => assignment.expression.string_literal().is_some(),
            _ => false,
        }
    }

    /// The first shape in priority order that `node` has.
    pub fn classify(node: NodeRef<'_>) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|shape| shape.matches(node))
    }
}

/// Rewrites module specifiers in a tree through one rule.
pub struct SpecifierVisitor<'a> {
    rule: &'a RewriteRule,
    /// The file being visited; passed to the rule as the origin.
    origin: Option<&'a str>,
}

impl<'a> SpecifierVisitor<'a> {
    pub fn new(rule: &'a RewriteRule, origin: Option<&'a str>) -> Self {
        SpecifierVisitor { rule, origin }
    }

    pub fn visit_source_file(&self, file: &Rc<SourceFile>) -> Result<Rc<SourceFile>, RuleError> {
        match visit_list(&file.statements, |statement| self.visit_statement(statement))? {
            Some(statements) => {
                debug!(file = %file.file_name, "rewrote module specifiers");
                Ok(file.with_statements(statements))
            }
            None => Ok(file.clone()),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn visit_statement(&self, statement: &Rc<Statement>) -> Result<Rc<Statement>, RuleError> {
        match SpecifierShape::classify(NodeRef::Statement(statement.as_ref())) {
            Some(shape) => self.rebuild_statement(shape, statement),
            None => self.visit_statement_children(statement),
        }
    }

    fn rebuild_statement(
        &self,
        shape: SpecifierShape,
        statement: &Rc<Statement>,
    ) -> Result<Rc<Statement>, RuleError> {
        match (shape, &**statement) {
            (SpecifierShape::ImportDeclaration, Statement::Import(decl)) => {
                let specifier = self.visit_specifier(&decl.module_specifier)?;
                if Rc::ptr_eq(&specifier, &decl.module_specifier) {
                    return Ok(statement.clone());
                }
                let mut decl = decl.clone();
                decl.module_specifier = specifier;
                Ok(Rc::new(Statement::Import(decl)))
            }
            (SpecifierShape::ExportDeclaration, Statement::Export(decl)) => {
                let Some(old) = &decl.module_specifier else {
                    return Ok(statement.clone());
                };
                let specifier = self.visit_specifier(old)?;
                if Rc::ptr_eq(&specifier, old) {
                    return Ok(statement.clone());
                }
                let mut decl = decl.clone();
                decl.module_specifier = Some(specifier);
                Ok(Rc::new(Statement::Export(decl)))
            }
            (
                SpecifierShape::ExportAssignmentWithLiteral,
                Statement::ExportAssignment(assignment),
            ) => {
                let expression = self.visit_specifier(&assignment.expression)?;
                if Rc::ptr_eq(&expression, &assignment.expression) {
                    return Ok(statement.clone());
                }
                let mut assignment = assignment.clone();
                assignment.expression = expression;
                Ok(Rc::new(Statement::ExportAssignment(assignment)))
            }
            _ => self.visit_statement_children(statement),
        }
    }

    fn visit_statement_children(
        &self,
        statement: &Rc<Statement>,
    ) -> Result<Rc<Statement>, RuleError> {
        match &**statement {
            Statement::TypeAlias(alias) => {
                let ty = self.visit_type(&alias.ty)?;
                if Rc::ptr_eq(&ty, &alias.ty) {
                    return Ok(statement.clone());
                }
                let mut alias = alias.clone();
                alias.ty = ty;
                Ok(Rc::new(Statement::TypeAlias(alias)))
            }
            Statement::Variable(var) => {
                let ty = self.visit_optional_type(&var.ty)?;
                if same_optional(&ty, &var.ty) {
                    return Ok(statement.clone());
                }
                let mut var = var.clone();
                var.ty = ty;
                Ok(Rc::new(Statement::Variable(var)))
            }
            Statement::Function(func) => {
                let mut changed = false;
                let mut parameters = Vec::with_capacity(func.parameters.len());
                for param in &func.parameters {
                    let ty = self.visit_optional_type(&param.ty)?;
                    changed |= !same_optional(&ty, &param.ty);
                    parameters.push(Parameter {
                        ty,
                        ..param.clone()
                    });
                }
                let return_type = self.visit_optional_type(&func.return_type)?;
                changed |= !same_optional(&return_type, &func.return_type);
                if !changed {
                    return Ok(statement.clone());
                }
                let mut func = func.clone();
                func.parameters = parameters;
                func.return_type = return_type;
                Ok(Rc::new(Statement::Function(func)))
            }
            Statement::Import(_)
            | Statement::Export(_)
            | Statement::ExportAssignment(_)
            | Statement::Verbatim(_) => Ok(statement.clone()),
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    pub fn visit_type(&self, ty: &Rc<TypeNode>) -> Result<Rc<TypeNode>, RuleError> {
        match SpecifierShape::classify(NodeRef::Type(ty.as_ref())) {
            Some(shape) => self.rebuild_type(shape, ty),
            None => self.visit_type_children(ty),
        }
    }

    fn rebuild_type(
        &self,
        shape: SpecifierShape,
        ty: &Rc<TypeNode>,
    ) -> Result<Rc<TypeNode>, RuleError> {
        match (shape, &**ty) {
            (SpecifierShape::TypeReferenceWithArguments, TypeNode::Reference(reference)) => {
                let args = reference.type_arguments.as_deref().unwrap_or_default();
                match visit_list(args, |arg| self.visit_type(arg))? {
                    Some(type_arguments) => Ok(Rc::new(TypeNode::Reference(TypeReference {
                        type_name: reference.type_name.clone(),
                        type_arguments: Some(type_arguments),
                    }))),
                    None => Ok(ty.clone()),
                }
            }
            (SpecifierShape::ImportTypeWithLiteral, TypeNode::Import(import)) => {
                let argument = self.visit_literal_type(&import.argument)?;
                self.finish_import_type(ty, import, argument)
            }
            _ => self.visit_type_children(ty),
        }
    }

    fn visit_type_children(&self, ty: &Rc<TypeNode>) -> Result<Rc<TypeNode>, RuleError> {
        match &**ty {
            TypeNode::Keyword(_) | TypeNode::Literal(_) | TypeNode::Reference(_) => Ok(ty.clone()),
            TypeNode::Import(import) => {
                let argument = self.visit_type(&import.argument)?;
                self.finish_import_type(ty, import, argument)
            }
            TypeNode::Union(types) => match visit_list(types, |member| self.visit_type(member))? {
                Some(types) => Ok(Rc::new(TypeNode::Union(types))),
                None => Ok(ty.clone()),
            },
            TypeNode::Array(element) => {
                let visited = self.visit_type(element)?;
                if Rc::ptr_eq(&visited, element) {
                    return Ok(ty.clone());
                }
                Ok(Rc::new(TypeNode::Array(visited)))
            }
            TypeNode::TypeLiteral(members) => {
                let mut changed = false;
                let mut rebuilt = Vec::with_capacity(members.len());
                for member in members {
                    let member_ty = self.visit_type(&member.ty)?;
                    changed |= !Rc::ptr_eq(&member_ty, &member.ty);
                    rebuilt.push(PropertySignature {
                        ty: member_ty,
                        ..member.clone()
                    });
                }
                if !changed {
                    return Ok(ty.clone());
                }
                Ok(Rc::new(TypeNode::TypeLiteral(rebuilt)))
            }
        }
    }

    /// Visit an import type's arguments and rebuild it if anything changed.
    fn finish_import_type(
        &self,
        ty: &Rc<TypeNode>,
        import: &ImportTypeNode,
        argument: Rc<TypeNode>,
    ) -> Result<Rc<TypeNode>, RuleError> {
        let type_arguments = match &import.type_arguments {
            Some(args) => visit_list(args, |arg| self.visit_type(arg))?,
            None => None,
        };
        if Rc::ptr_eq(&argument, &import.argument) && type_arguments.is_none() {
            return Ok(ty.clone());
        }
        Ok(Rc::new(TypeNode::Import(ImportTypeNode {
            is_type_of: import.is_type_of,
            argument,
            qualifier: import.qualifier.clone(),
            type_arguments: type_arguments.or_else(|| import.type_arguments.clone()),
        })))
    }

    fn visit_literal_type(&self, argument: &Rc<TypeNode>) -> Result<Rc<TypeNode>, RuleError> {
        let TypeNode::Literal(expr) = &**argument else {
            return Ok(argument.clone());
        };
        let visited = self.visit_specifier(expr)?;
        if Rc::ptr_eq(&visited, expr) {
            return Ok(argument.clone());
        }
        Ok(Rc::new(TypeNode::Literal(visited)))
    }

    fn visit_optional_type(
        &self,
        ty: &Option<Rc<TypeNode>>,
    ) -> Result<Option<Rc<TypeNode>>, RuleError> {
        ty.as_ref().map(|ty| self.visit_type(ty)).transpose()
    }

    // =========================================================================
    // Specifiers
    // =========================================================================

    fn visit_specifier(&self, expr: &Rc<Expression>) -> Result<Rc<Expression>, RuleError> {
        let Some(text) = expr.string_literal() else {
            return Ok(expr.clone());
        };
        let resolved = resolve_specifier(text, self.rule, self.origin)?;
        if resolved == text {
            return Ok(expr.clone());
        }
        Ok(Expression::string(resolved.into_owned()))
    }
}

/// Rewrite every specifier in `file`, using the file name as the origin.
pub fn rewrite_source_file(
    file: &Rc<SourceFile>,
    rule: &RewriteRule,
) -> Result<Rc<SourceFile>, RuleError> {
    SpecifierVisitor::new(rule, Some(file.file_name.as_str())).visit_source_file(file)
}

/// Rewrite a single file or every file of a bundle independently.
pub fn rewrite_unit(unit: &EmitUnit, rule: &RewriteRule) -> Result<EmitUnit, RuleError> {
    match unit {
        EmitUnit::SourceFile(file) => Ok(EmitUnit::SourceFile(rewrite_source_file(file, rule)?)),
        EmitUnit::Bundle(bundle) => {
            match visit_list(&bundle.source_files, |file| rewrite_source_file(file, rule))? {
                Some(source_files) => Ok(EmitUnit::Bundle(Rc::new(Bundle { source_files }))),
                None => Ok(unit.clone()),
            }
        }
    }
}

/// Visit every node of a list. Returns `None` when every node came back
/// unchanged; the new list is only allocated at the first change.
fn visit_list<T>(
    nodes: &[Rc<T>],
    mut visit: impl FnMut(&Rc<T>) -> Result<Rc<T>, RuleError>,
) -> Result<Option<Vec<Rc<T>>>, RuleError> {
    let mut rebuilt: Option<Vec<Rc<T>>> = None;
    for (i, node) in nodes.iter().enumerate() {
        let visited = visit(node)?;
        match rebuilt.as_mut() {
            Some(list) => list.push(visited),
            None if !Rc::ptr_eq(&visited, node) => {
                let mut list = Vec::with_capacity(nodes.len());
                list.extend(nodes[..i].iter().cloned());
                list.push(visited);
                rebuilt = Some(list);
            }
            None => {}
        }
    }
    Ok(rebuilt)
}

fn same_optional<T>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
#[path = "visitor_tests.rs"]
mod tests;
