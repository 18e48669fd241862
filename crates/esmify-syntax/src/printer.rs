//! Printer for code and declaration output.
//!
//! Code mode drops everything that only exists at the type level (type
//! aliases, `import type`, `export type`, type-only specifiers, annotations).
//! Declaration mode keeps the type surface and drops implementation text.

use super::node::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintMode {
    /// JavaScript output
    #[default]
    Code,
    /// Type declaration output
    Declaration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewLine {
    #[default]
    LineFeed,
    CarriageReturnLineFeed,
}

impl NewLine {
    pub const fn as_str(self) -> &'static str {
        match self {
            NewLine::LineFeed => "\n",
            NewLine::CarriageReturnLineFeed => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PrintOptions {
    pub mode: PrintMode,
    pub new_line: NewLine,
}

pub struct Printer {
    options: PrintOptions,
    output: String,
}

impl Printer {
    pub fn new(options: PrintOptions) -> Self {
        Printer {
            options,
            output: String::new(),
        }
    }

    /// Print a whole source file and return the text.
    pub fn print_to_string(file: &SourceFile, options: PrintOptions) -> String {
        let mut printer = Printer::new(options);
        printer.print_source_file(file);
        printer.finish()
    }

    /// Print a single type node (no trailing newline).
    pub fn type_to_string(ty: &TypeNode) -> String {
        let mut printer = Printer::new(PrintOptions::default());
        printer.emit_type(ty);
        printer.finish()
    }

    pub fn print_source_file(&mut self, file: &SourceFile) {
        for statement in &file.statements {
            if self.emit_statement(statement) {
                self.write(self.options.new_line.as_str());
            }
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn is_declaration(&self) -> bool {
        self.options.mode == PrintMode::Declaration
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Emit one statement. Returns false when the statement is elided.
    fn emit_statement(&mut self, statement: &Statement) -> bool {
        match statement {
            Statement::Import(decl) => self.emit_import(decl),
            Statement::Export(decl) => self.emit_export(decl),
            Statement::ExportAssignment(assignment) => {
                // ES module output has no `export =`; it becomes the default export.
                if assignment.is_export_equals && self.is_declaration() {
                    self.write("export = ");
                } else {
                    self.write("export default ");
                }
                self.emit_expression(&assignment.expression);
                self.write(";");
                true
            }
            Statement::TypeAlias(alias) => {
                if !self.is_declaration() {
                    return false;
                }
                if alias.is_exported {
                    self.write("export ");
                }
                self.write("type ");
                self.write(&alias.name);
                if !alias.type_parameters.is_empty() {
                    self.write("<");
                    self.write(&alias.type_parameters.join(", "));
                    self.write(">");
                }
                self.write(" = ");
                self.emit_type(&alias.ty);
                self.write(";");
                true
            }
            Statement::Variable(var) => {
                self.emit_modifiers(var.is_exported);
                self.write(var.kind.keyword());
                self.write(" ");
                self.write(&var.name);
                if self.is_declaration() {
                    if let Some(ty) = &var.ty {
                        self.write(": ");
                        self.emit_type(ty);
                    }
                } else if let Some(initializer) = &var.initializer {
                    self.write(" = ");
                    self.emit_expression(initializer);
                }
                self.write(";");
                true
            }
            Statement::Function(func) => self.emit_function(func),
            Statement::Verbatim(text) => {
                if self.is_declaration() {
                    return false;
                }
                self.write(text);
                true
            }
        }
    }

    fn emit_modifiers(&mut self, is_exported: bool) {
        if is_exported {
            self.write("export ");
        }
        if self.is_declaration() {
            self.write("declare ");
        }
    }

    fn emit_import(&mut self, decl: &ImportDeclaration) -> bool {
        let declaration = self.is_declaration();
        if decl.is_type_only && !declaration {
            return false;
        }

        let kept: Option<Vec<&ImportSpecifier>> = match decl.clause.as_ref() {
            Some(ImportClause {
                default_binding,
                named_bindings: Some(NamedBindings::Named(specifiers)),
            }) => {
                let kept: Vec<&ImportSpecifier> = specifiers
                    .iter()
                    .filter(|spec| declaration || !spec.is_type_only)
                    .collect();
                // Every binding was type-only: the whole import disappears.
                if kept.is_empty() && !specifiers.is_empty() && default_binding.is_none() {
                    return false;
                }
                Some(kept)
            }
            _ => None,
        };

        self.write("import ");
        if decl.is_type_only {
            self.write("type ");
        }

        if let Some(clause) = &decl.clause {
            let wrote_default = if let Some(default_binding) = &clause.default_binding {
                self.write(default_binding);
                true
            } else {
                false
            };
            match (&clause.named_bindings, kept) {
                (Some(NamedBindings::Namespace(name)), _) => {
                    if wrote_default {
                        self.write(", ");
                    }
                    self.write("* as ");
                    self.write(name);
                }
                (Some(NamedBindings::Named(_)), Some(kept))
                    if !(wrote_default && kept.is_empty()) =>
                {
                    if wrote_default {
                        self.write(", ");
                    }
                    self.write("{");
                    for (i, spec) in kept.iter().enumerate() {
                        self.write(if i == 0 { " " } else { ", " });
                        if spec.is_type_only {
                            self.write("type ");
                        }
                        self.emit_binding(spec.property_name.as_deref(), &spec.name);
                    }
                    self.write(if kept.is_empty() { "}" } else { " }" });
                }
                _ => {}
            }
            self.write(" from ");
        }

        self.emit_expression(&decl.module_specifier);
        if !decl.attributes.is_empty() {
            self.write(" with {");
            for (i, attribute) in decl.attributes.iter().enumerate() {
                self.write(if i == 0 { " " } else { ", " });
                self.write(&attribute.name);
                self.write(": ");
                self.emit_string_literal(&attribute.value);
            }
            self.write(" }");
        }
        self.write(";");
        true
    }

    fn emit_export(&mut self, decl: &ExportDeclaration) -> bool {
        let declaration = self.is_declaration();
        if decl.is_type_only && !declaration {
            return false;
        }

        let kept: Option<Vec<&ExportSpecifier>> = match &decl.clause {
            Some(ExportClause::Named(specifiers)) => {
                let kept: Vec<&ExportSpecifier> = specifiers
                    .iter()
                    .filter(|spec| declaration || !spec.is_type_only)
                    .collect();
                if kept.is_empty() && !specifiers.is_empty() {
                    return false;
                }
                Some(kept)
            }
            _ => None,
        };

        self.write("export ");
        if decl.is_type_only {
            self.write("type ");
        }
        match &decl.clause {
            None => self.write("*"),
            Some(ExportClause::Namespace(name)) => {
                self.write("* as ");
                self.write(name);
            }
            Some(ExportClause::Named(_)) => {
                let kept = kept.unwrap_or_default();
                self.write("{");
                for (i, spec) in kept.iter().enumerate() {
                    self.write(if i == 0 { " " } else { ", " });
                    if spec.is_type_only {
                        self.write("type ");
                    }
                    self.emit_binding(spec.property_name.as_deref(), &spec.name);
                }
                self.write(if kept.is_empty() { "}" } else { " }" });
            }
        }
        if let Some(specifier) = &decl.module_specifier {
            self.write(" from ");
            self.emit_expression(specifier);
        }
        self.write(";");
        true
    }

    fn emit_binding(&mut self, property_name: Option<&str>, name: &str) {
        if let Some(property_name) = property_name {
            self.write(property_name);
            self.write(" as ");
        }
        self.write(name);
    }

    fn emit_function(&mut self, func: &FunctionDeclaration) -> bool {
        let declaration = self.is_declaration();
        if !declaration && func.body.is_none() {
            return false;
        }

        self.emit_modifiers(func.is_exported);
        self.write("function ");
        self.write(&func.name);
        self.write("(");
        for (i, param) in func.parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&param.name);
            if declaration {
                if param.is_optional {
                    self.write("?");
                }
                if let Some(ty) = &param.ty {
                    self.write(": ");
                    self.emit_type(ty);
                }
            }
        }
        self.write(")");

        if declaration {
            if let Some(return_type) = &func.return_type {
                self.write(": ");
                self.emit_type(return_type);
            }
            self.write(";");
        } else {
            self.write(" {");
            self.write(func.body.as_deref().unwrap_or_default());
            self.write("}");
        }
        true
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn emit_type(&mut self, ty: &TypeNode) {
        match ty {
            TypeNode::Keyword(name) => self.write(name),
            TypeNode::Reference(reference) => {
                self.write(&reference.type_name);
                self.emit_type_arguments(reference.type_arguments.as_deref());
            }
            TypeNode::Import(import) => {
                if import.is_type_of {
                    self.write("typeof ");
                }
                self.write("import(");
                self.emit_type(&import.argument);
                self.write(")");
                if let Some(qualifier) = &import.qualifier {
                    self.write(".");
                    self.write(qualifier);
                }
                self.emit_type_arguments(import.type_arguments.as_deref());
            }
            TypeNode::Literal(expr) => self.emit_expression(expr),
            TypeNode::Union(types) => {
                for (i, member) in types.iter().enumerate() {
                    if i > 0 {
                        self.write(" | ");
                    }
                    self.emit_type(member);
                }
            }
            TypeNode::Array(element) => {
                let needs_parens = matches!(**element, TypeNode::Union(_));
                if needs_parens {
                    self.write("(");
                }
                self.emit_type(element);
                if needs_parens {
                    self.write(")");
                }
                self.write("[]");
            }
            TypeNode::TypeLiteral(members) => {
                if members.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.write("; ");
                    }
                    self.write(&member.name);
                    if member.is_optional {
                        self.write("?");
                    }
                    self.write(": ");
                    self.emit_type(&member.ty);
                }
                self.write(" }");
            }
        }
    }

    fn emit_type_arguments(&mut self, type_arguments: Option<&[std::rc::Rc<TypeNode>]>) {
        let Some(args) = type_arguments else {
            return;
        };
        if args.is_empty() {
            return;
        }
        self.write("<");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_type(arg);
        }
        self.write(">");
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn emit_expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Identifier(name) => self.write(name),
            Expression::StringLiteral(text) => self.emit_string_literal(text),
            Expression::NumericLiteral(text) | Expression::Verbatim(text) => self.write(text),
        }
    }

    fn emit_string_literal(&mut self, text: &str) {
        self.output.push('"');
        for ch in text.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                _ => self.output.push(ch),
            }
        }
        self.output.push('"');
    }
}
