use super::*;
use esmify_syntax::{ExportAssignment, ImportTypeNode, Parameter, PrintMode, PrintOptions, Printer};
use std::sync::{Arc, Mutex};

fn esm() -> RewriteRule {
    RewriteRule::explicit_esm()
}

fn declaration_text(file: &SourceFile) -> String {
    Printer::print_to_string(
        file,
        PrintOptions {
            mode: PrintMode::Declaration,
            ..PrintOptions::default()
        },
    )
}

#[test]
fn test_priority_order_is_fixed() {
    assert_eq!(
        SpecifierShape::PRIORITY,
        [
            SpecifierShape::ImportDeclaration,
            SpecifierShape::ExportDeclaration,
            SpecifierShape::TypeReferenceWithArguments,
            SpecifierShape::ImportTypeWithLiteral,
            SpecifierShape::ExportAssignmentWithLiteral,
        ]
    );
}

#[test]
fn test_classify_each_shape() {
    let import = Statement::import_named(&["a"], "./a");
    let type_import = Statement::import_type_only(&["A"], "./a");
    let reexport = Statement::export_from(&["a"], "./a");
    let type_reexport = Statement::export_type_from(&["A"], "./a");
    let local_export = Statement::export_local(&["a"]);
    let default_literal = Statement::export_default(Expression::string("./a"));
    let default_identifier = Statement::export_default(Expression::id("a"));
    let generic = TypeNode::generic("Promise", vec![TypeNode::keyword("void")]);
    let plain = TypeNode::reference("Promise");
    let import_type = TypeNode::import_type("./a", Some("A"), None);

    let classify_statement =
        |s: &Rc<Statement>| SpecifierShape::classify(NodeRef::Statement(s.as_ref()));
    let classify_type = |t: &Rc<TypeNode>| SpecifierShape::classify(NodeRef::Type(t.as_ref()));

    assert_eq!(
        classify_statement(&import),
        Some(SpecifierShape::ImportDeclaration)
    );
    assert_eq!(
        classify_statement(&type_import),
        Some(SpecifierShape::ImportDeclaration)
    );
    assert_eq!(
        classify_statement(&reexport),
        Some(SpecifierShape::ExportDeclaration)
    );
    assert_eq!(
        classify_statement(&type_reexport),
        Some(SpecifierShape::ExportDeclaration)
    );
    assert_eq!(classify_statement(&local_export), None);
    assert_eq!(
        classify_statement(&default_literal),
        Some(SpecifierShape::ExportAssignmentWithLiteral)
    );
    assert_eq!(classify_statement(&default_identifier), None);
    assert_eq!(
        classify_type(&generic),
        Some(SpecifierShape::TypeReferenceWithArguments)
    );
    assert_eq!(classify_type(&plain), None);
    assert_eq!(
        classify_type(&import_type),
        Some(SpecifierShape::ImportTypeWithLiteral)
    );
}

#[test]
fn test_only_rewritten_statement_changes_identity() {
    let import = Statement::import_named(&["a"], "./a");
    let react = Statement::import_default("React", "react");
    let alias = Statement::type_alias("Id", TypeNode::keyword("string"));
    let call = Statement::verbatim("main();");
    let file = SourceFile::new(
        "src/index.ts",
        vec![import.clone(), react.clone(), alias.clone(), call.clone()],
    );

    let rewritten = rewrite_source_file(&file, &esm()).unwrap();

    assert!(!Rc::ptr_eq(&rewritten, &file));
    assert!(!Rc::ptr_eq(&rewritten.statements[0], &import));
    assert!(Rc::ptr_eq(&rewritten.statements[1], &react));
    assert!(Rc::ptr_eq(&rewritten.statements[2], &alias));
    assert!(Rc::ptr_eq(&rewritten.statements[3], &call));

    let Statement::Import(decl) = &*rewritten.statements[0] else {
        panic!("expected import declaration");
    };
    let Statement::Import(original) = &*import else {
        panic!("expected import declaration");
    };
    assert_eq!(decl.module_specifier.string_literal(), Some("./a.mjs"));
    assert_eq!(decl.clause, original.clause);
}

#[test]
fn test_untouched_file_is_returned_as_is() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            Statement::import_default("React", "react"),
            Statement::export_local(&["React"]),
            Statement::verbatim("main();"),
        ],
    );

    let rewritten = rewrite_source_file(&file, &esm()).unwrap();
    assert!(Rc::ptr_eq(&rewritten, &file));
}

#[test]
fn test_no_match_passthrough_with_record_and_function() {
    let rule = RewriteRule::record()
        .pattern("#lib", r"^\.\./lib/")
        .expect("valid pattern")
        .build();
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            Statement::import_named(&["a"], "./a"),
            Statement::export_all("./b"),
        ],
    );
    assert!(Rc::ptr_eq(&rewrite_source_file(&file, &rule).unwrap(), &file));

    let nothing = RewriteRule::function(|_, _| Ok(None));
    assert!(Rc::ptr_eq(
        &rewrite_source_file(&file, &nothing).unwrap(),
        &file
    ));
}

#[test]
fn test_rewrites_every_specifier_bearing_shape() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            Statement::import_named(&["a"], "./a"),
            Statement::import_type_only(&["B"], "./b"),
            Statement::export_from(&["c"], "./c"),
            Statement::export_type_from(&["D"], "./d"),
            Statement::export_all("./e"),
            Statement::type_alias("F", TypeNode::import_type("./f", Some("F"), None)),
            Statement::const_decl("g", Some(TypeNode::typeof_import("./g")), None),
            Statement::export_default(Expression::string("./h")),
        ],
    );

    let rewritten = rewrite_source_file(&file, &esm()).unwrap();
    assert_eq!(
        declaration_text(&rewritten),
        "import { a } from \"./a.mjs\";\n\
         import type { B } from \"./b.mjs\";\n\
         export { c } from \"./c.mjs\";\n\
         export type { D } from \"./d.mjs\";\n\
         export * from \"./e.mjs\";\n\
         export type F = import(\"./f.mjs\").F;\n\
         export declare const g: typeof import(\"./g.mjs\");\n\
         export default \"./h.mjs\";\n"
    );
}

#[test]
fn test_export_equals_literal_is_rewritten() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![Rc::new(Statement::ExportAssignment(ExportAssignment {
            is_export_equals: true,
            expression: Expression::string("./impl"),
        }))],
    );

    let rewritten = rewrite_source_file(&file, &esm()).unwrap();
    assert_eq!(declaration_text(&rewritten), "export = \"./impl.mjs\";\n");
}

#[test]
fn test_nested_import_types_rewritten_in_one_pass() {
    // Promise<import("./a").A<import("./b").B>>
    let inner = TypeNode::import_type("./b", Some("B"), None);
    let outer = TypeNode::import_type("./a", Some("A"), Some(vec![inner]));
    let promise = TypeNode::generic("Promise", vec![outer]);
    let file = SourceFile::new("src/index.ts", vec![Statement::type_alias("T", promise)]);

    let rewritten = rewrite_source_file(&file, &esm()).unwrap();
    assert_eq!(
        declaration_text(&rewritten),
        "export type T = Promise<import(\"./a.mjs\").A<import(\"./b.mjs\").B>>;\n"
    );
}

#[test]
fn test_type_positions_are_searched() {
    let keep = TypeNode::keyword("string");
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            Statement::function(
                "load",
                vec![
                    Parameter::new("name", Some(keep.clone())),
                    Parameter::new(
                        "options",
                        Some(TypeNode::type_literal(vec![PropertySignature::new(
                            "plugin",
                            TypeNode::typeof_import("./plugin"),
                        )])),
                    ),
                ],
                Some(TypeNode::array(TypeNode::union(vec![
                    TypeNode::import_type("./result", Some("Result"), None),
                    TypeNode::keyword("null"),
                ]))),
                "",
            ),
        ],
    );

    let rewritten = rewrite_source_file(&file, &esm()).unwrap();
    assert_eq!(
        declaration_text(&rewritten),
        "export declare function load(name: string, options: { plugin: typeof import(\"./plugin.mjs\") }): (import(\"./result.mjs\").Result | null)[];\n"
    );

    let Statement::Function(func) = &*rewritten.statements[0] else {
        panic!("expected function");
    };
    let first_param_ty = func.parameters[0].ty.as_ref().expect("typed parameter");
    assert!(Rc::ptr_eq(first_param_ty, &keep));
}

#[test]
fn test_import_type_with_non_literal_argument_still_visits_arguments() {
    let ty = Rc::new(TypeNode::Import(ImportTypeNode {
        is_type_of: false,
        argument: TypeNode::reference("Specifier"),
        qualifier: None,
        type_arguments: Some(vec![TypeNode::typeof_import("./x")]),
    }));
    let visitor_rule = esm();
    let visitor = SpecifierVisitor::new(&visitor_rule, Some("src/index.ts"));

    let visited = visitor.visit_type(&ty).unwrap();
    assert_eq!(
        Printer::type_to_string(&visited),
        "import(Specifier)<typeof import(\"./x.mjs\")>"
    );
}

#[test]
fn test_bundle_units_are_rewritten_independently() {
    let touched = SourceFile::new("src/a.ts", vec![Statement::export_all("./b")]);
    let untouched = SourceFile::new("src/c.ts", vec![Statement::verbatim("main();")]);
    let unit = EmitUnit::Bundle(Rc::new(Bundle {
        source_files: vec![touched.clone(), untouched.clone()],
    }));

    let rewritten = rewrite_unit(&unit, &esm()).unwrap();
    let files = rewritten.source_files();
    assert!(!Rc::ptr_eq(&files[0], &touched));
    assert!(Rc::ptr_eq(&files[1], &untouched));

    let untouched_unit = EmitUnit::Bundle(Rc::new(Bundle {
        source_files: vec![untouched.clone()],
    }));
    assert!(rewrite_unit(&untouched_unit, &esm())
        .unwrap()
        .ptr_eq(&untouched_unit));
}

#[test]
fn test_rule_sees_file_name_as_origin() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let rule = RewriteRule::function(move |specifier, origin| {
        if let Ok(mut seen) = recorder.lock() {
            seen.push((specifier.to_string(), origin.map(str::to_string)));
        }
        Ok(None)
    });
    let unit = EmitUnit::Bundle(Rc::new(Bundle {
        source_files: vec![
            SourceFile::new("src/a.ts", vec![Statement::export_all("./x")]),
            SourceFile::new("src/b.ts", vec![Statement::export_all("./y")]),
        ],
    }));

    rewrite_unit(&unit, &rule).unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            ("./x".to_string(), Some("src/a.ts".to_string())),
            ("./y".to_string(), Some("src/b.ts".to_string())),
        ]
    );
}

#[test]
fn test_rule_errors_propagate_out_of_the_visitor() {
    let rule = RewriteRule::function(|specifier, _| {
        if specifier.starts_with('/') {
            Err(RuleError::rejected(specifier, "absolute specifier"))
        } else {
            Ok(None)
        }
    });
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            Statement::import_named(&["a"], "./a"),
            Statement::type_alias("T", TypeNode::import_type("/abs", None, None)),
        ],
    );

    let err = rewrite_source_file(&file, &rule).unwrap_err();
    assert!(matches!(err, RuleError::Rejected { ref specifier, .. } if specifier == "/abs"));
}

#[test]
fn test_visit_list_allocates_only_on_change() {
    let types = vec![TypeNode::keyword("a"), TypeNode::keyword("b")];
    assert!(visit_list(&types, |ty| Ok(ty.clone())).unwrap().is_none());

    let replacement = TypeNode::keyword("c");
    let rebuilt = visit_list(&types, |ty| {
        if Rc::ptr_eq(ty, &types[1]) {
            Ok(replacement.clone())
        } else {
            Ok(ty.clone())
        }
    })
    .unwrap()
    .expect("second entry changed");
    assert!(Rc::ptr_eq(&rebuilt[0], &types[0]));
    assert!(Rc::ptr_eq(&rebuilt[1], &replacement));
}
