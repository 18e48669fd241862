//! Integration tests for code and declaration printing

use esmify_syntax::{
    Expression, ImportAttribute, ImportClause, ImportDeclaration, ImportSpecifier, NamedBindings,
    NewLine, Parameter, PrintMode, PrintOptions, Printer, SourceFile, Statement, TypeNode,
};
use std::rc::Rc;

fn code() -> PrintOptions {
    PrintOptions::default()
}

fn declaration() -> PrintOptions {
    PrintOptions {
        mode: PrintMode::Declaration,
        new_line: NewLine::LineFeed,
    }
}

#[test]
fn test_print_imports_and_exports_in_code_mode() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            Statement::import_named(&["a", "b"], "./a"),
            Statement::import_default("React", "react"),
            Statement::import_namespace("path", "node:path"),
            Statement::import_side_effect("./polyfill"),
            Statement::export_from(&["c"], "./c"),
            Statement::export_all("./d"),
            Statement::export_local(&["a"]),
        ],
    );

    let output = Printer::print_to_string(&file, code());
    assert_eq!(
        output,
        "import { a, b } from \"./a\";\n\
         import React from \"react\";\n\
         import * as path from \"node:path\";\n\
         import \"./polyfill\";\n\
         export { c } from \"./c\";\n\
         export * from \"./d\";\n\
         export { a };\n"
    );
}

#[test]
fn test_code_mode_elides_type_only_constructs() {
    let file = SourceFile::new(
        "src/types.ts",
        vec![
            Statement::import_type_only(&["Props"], "./props"),
            Statement::export_type_from(&["Props"], "./props"),
            Statement::type_alias("Id", TypeNode::keyword("string")),
            Statement::verbatim("console.log(1);"),
        ],
    );

    assert_eq!(
        Printer::print_to_string(&file, code()),
        "console.log(1);\n"
    );
}

#[test]
fn test_code_mode_drops_import_with_only_type_specifiers() {
    let import = Rc::new(Statement::Import(ImportDeclaration {
        is_type_only: false,
        clause: Some(ImportClause {
            default_binding: None,
            named_bindings: Some(NamedBindings::Named(vec![ImportSpecifier {
                is_type_only: true,
                property_name: None,
                name: "Props".to_string(),
            }])),
        }),
        module_specifier: Expression::string("./props"),
        attributes: Vec::new(),
    }));
    let file = SourceFile::new("a.ts", vec![import]);

    assert_eq!(Printer::print_to_string(&file, code()), "");
    assert_eq!(
        Printer::print_to_string(&file, declaration()),
        "import { type Props } from \"./props\";\n"
    );
}

#[test]
fn test_print_import_attributes() {
    let import = Rc::new(Statement::Import(ImportDeclaration {
        is_type_only: false,
        clause: Some(ImportClause {
            default_binding: Some("data".to_string()),
            named_bindings: None,
        }),
        module_specifier: Expression::string("./data.json"),
        attributes: vec![ImportAttribute {
            name: "type".to_string(),
            value: "json".to_string(),
        }],
    }));
    let file = SourceFile::new("a.ts", vec![import]);

    assert_eq!(
        Printer::print_to_string(&file, code()),
        "import data from \"./data.json\" with { type: \"json\" };\n"
    );
}

#[test]
fn test_declaration_mode_prints_type_surface() {
    let file = SourceFile::new(
        "src/api.ts",
        vec![
            Statement::type_alias(
                "Handler",
                TypeNode::import_type("./handler", Some("Handler"), None),
            ),
            Statement::const_decl(
                "registry",
                Some(TypeNode::generic(
                    "Map",
                    vec![TypeNode::keyword("string"), TypeNode::typeof_import("./plugin")],
                )),
                Some(Expression::verbatim("new Map()")),
            ),
            Statement::function(
                "load",
                vec![Parameter::new("name", Some(TypeNode::keyword("string")))],
                Some(TypeNode::generic("Promise", vec![TypeNode::keyword("void")])),
                " return import(name); ",
            ),
            Statement::verbatim("registry.clear();"),
        ],
    );

    assert_eq!(
        Printer::print_to_string(&file, declaration()),
        "export type Handler = import(\"./handler\").Handler;\n\
         export declare const registry: Map<string, typeof import(\"./plugin\")>;\n\
         export declare function load(name: string): Promise<void>;\n"
    );
    assert_eq!(
        Printer::print_to_string(&file, code()),
        "export const registry = new Map();\n\
         export function load(name) { return import(name); }\n\
         registry.clear();\n"
    );
}

#[test]
fn test_print_export_assignment_forms() {
    let file = SourceFile::new(
        "a.ts",
        vec![
            Statement::export_default(Expression::string("./impl")),
            Statement::export_equals(Expression::id("api")),
        ],
    );

    assert_eq!(
        Printer::print_to_string(&file, code()),
        "export default \"./impl\";\nexport default api;\n"
    );
    assert_eq!(
        Printer::print_to_string(&file, declaration()),
        "export default \"./impl\";\nexport = api;\n"
    );
}

#[test]
fn test_print_composite_types() {
    let ty = TypeNode::array(TypeNode::union(vec![
        TypeNode::keyword("string"),
        TypeNode::string_literal_type("a\"b"),
    ]));
    assert_eq!(Printer::type_to_string(&ty), "(string | \"a\\\"b\")[]");

    let mut optional = esmify_syntax::PropertySignature::new("b", TypeNode::keyword("number"));
    optional.is_optional = true;
    let literal = TypeNode::type_literal(vec![
        esmify_syntax::PropertySignature::new("a", TypeNode::reference("A")),
        optional,
    ]);
    assert_eq!(Printer::type_to_string(&literal), "{ a: A; b?: number }");
    assert_eq!(Printer::type_to_string(&TypeNode::type_literal(vec![])), "{}");
}

#[test]
fn test_crlf_new_lines() {
    let file = SourceFile::new(
        "a.ts",
        vec![Statement::verbatim("a();"), Statement::verbatim("b();")],
    );
    let options = PrintOptions {
        mode: PrintMode::Code,
        new_line: NewLine::CarriageReturnLineFeed,
    };
    assert_eq!(Printer::print_to_string(&file, options), "a();\r\nb();\r\n");
}

#[test]
fn test_declaration_file_detection() {
    assert!(SourceFile::new("types/index.d.ts", vec![]).is_declaration_file);
    assert!(SourceFile::new("types/index.d.mts", vec![]).is_declaration_file);
    assert!(!SourceFile::new("src/index.ts", vec![]).is_declaration_file);
    assert!(!SourceFile::new("src/index.mts", vec![]).is_declaration_file);
}
