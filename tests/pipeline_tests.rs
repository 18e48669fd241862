//! End-to-end tests for emission with rewriting

use esmify::emit::{DiskWriter, EmitOptions, EmitTransformers, JsxEmit, MemoryWriter, Program};
use esmify::rewrite::{ExtensionCoercion, RewriteRule, RuleError};
use esmify::syntax::{Expression, SourceFile, Statement, TypeNode};
use esmify::{ImportingArtifact, ModuleOutputs, emit_with_rewrites, output_name_map};
use std::path::PathBuf;

fn options() -> EmitOptions {
    EmitOptions {
        out_dir: Some(PathBuf::from("dist")),
        root_dir: Some(PathBuf::from("src")),
        emit_declarations: true,
        declaration_map: true,
        source_map: true,
        ..EmitOptions::default()
    }
}

fn project() -> Program {
    let mut program = Program::new("", options());
    program.add_file(SourceFile::new(
        "src/util.ts",
        vec![Statement::const_decl(
            "answer",
            Some(TypeNode::keyword("number")),
            Some(Expression::number("42")),
        )],
    ));
    program.add_file(SourceFile::new(
        "src/view.tsx",
        vec![
            Statement::import_named(&["answer"], "./util"),
            Statement::import_default("React", "react"),
            Statement::type_alias("Props", TypeNode::import_type("./util", Some("Answer"), None)),
            Statement::const_decl(
                "view",
                Some(TypeNode::typeof_import("./util")),
                Some(Expression::id("answer")),
            ),
        ],
    ));
    program
}

#[test]
fn test_explicit_esm_emit_with_dual_mode_declarations() {
    let program = project();
    let mut writer = MemoryWriter::new();
    let result = emit_with_rewrites(
        &program,
        &RewriteRule::explicit_esm(),
        &ExtensionCoercion::dual_mode([".tsx"]),
        &mut writer,
    )
    .unwrap();

    let expected = vec![
        "dist/util.mjs",
        "dist/util.mjs.map",
        "dist/util.d.ts",
        "dist/util.d.ts.map",
        "dist/view.mjs",
        "dist/view.mjs.map",
        "dist/view.d.mts",
        "dist/view.d.mts.map",
    ];
    assert_eq!(writer.paths(), expected);
    assert_eq!(result.emitted_files, expected);

    assert_eq!(
        writer.get("dist/view.mjs"),
        Some(
            "import { answer } from \"./util.mjs\";\n\
             import React from \"react\";\n\
             export const view = answer;\n\
             //# sourceMappingURL=view.mjs.map"
        )
    );
    assert_eq!(
        writer.get("dist/view.d.mts"),
        Some(
            "import { answer } from \"./util.mjs\";\n\
             import React from \"react\";\n\
             export type Props = import(\"./util.mjs\").Answer;\n\
             export declare const view: typeof import(\"./util.mjs\");\n\
             //# sourceMappingURL=view.d.mts.map"
        )
    );
    assert_eq!(
        writer.get("dist/view.d.mts.map"),
        Some(r#"{"version":3,"file":"view.d.mts","sourceRoot":"","sources":["../src/view.tsx"],"names":[],"mappings":""}"#)
    );
    assert_eq!(
        writer.get("dist/view.mjs.map"),
        Some(r#"{"version":3,"file":"view.mjs","sourceRoot":"","sources":["../src/view.tsx"],"names":[],"mappings":""}"#)
    );

    // `.ts` sources keep the default declaration family.
    assert!(
        writer
            .get("dist/util.d.ts")
            .unwrap()
            .ends_with("//# sourceMappingURL=util.d.ts.map")
    );
}

fn mixed_module_project() -> Program {
    let mut program = Program::new(
        "",
        EmitOptions {
            out_dir: Some(PathBuf::from("dist")),
            root_dir: Some(PathBuf::from("src")),
            emit_declarations: true,
            jsx: Some(JsxEmit::Preserve),
            ..EmitOptions::default()
        },
    );
    let number = || Some(TypeNode::keyword("number"));
    program.add_file(SourceFile::new(
        "src/view.tsx",
        vec![Statement::const_decl("v", number(), Some(Expression::number("1")))],
    ));
    program.add_file(SourceFile::new(
        "src/other.cts",
        vec![Statement::const_decl("o", number(), Some(Expression::number("2")))],
    ));
    program.add_file(SourceFile::new(
        "src/button.styles.ts",
        vec![Statement::const_decl("s", number(), Some(Expression::number("3")))],
    ));
    program.add_file(SourceFile::new(
        "src/app.ts",
        vec![
            Statement::import_named(&["v"], "./view"),
            Statement::import_named(&["o"], "./other"),
            Statement::import_named(&["s"], "./button.styles"),
            Statement::const_decl("app", number(), Some(Expression::id("v"))),
        ],
    ));
    program
}

#[test]
fn test_imports_follow_jsx_and_commonjs_output_names() {
    let program = mixed_module_project();
    let mut writer = MemoryWriter::new();
    emit_with_rewrites(
        &program,
        &RewriteRule::explicit_esm(),
        &ExtensionCoercion::none(),
        &mut writer,
    )
    .unwrap();

    assert_eq!(
        writer.paths(),
        vec![
            "dist/view.jsx",
            "dist/view.d.ts",
            "dist/other.cjs",
            "dist/other.d.cts",
            "dist/button.styles.mjs",
            "dist/button.styles.d.ts",
            "dist/app.mjs",
            "dist/app.d.ts",
        ]
    );
    assert_eq!(
        writer.get("dist/app.mjs"),
        Some(
            "import { v } from \"./view.jsx\";\n\
             import { o } from \"./other.cjs\";\n\
             import { s } from \"./button.styles.mjs\";\n\
             export const app = v;\n"
        )
    );
    assert_eq!(
        writer.get("dist/app.d.ts"),
        Some(
            "import { v } from \"./view.jsx\";\n\
             import { o } from \"./other.cjs\";\n\
             import { s } from \"./button.styles.mjs\";\n\
             export declare const app: number;\n"
        )
    );

    // Every rewritten relative import names a file that was written.
    for specifier in ["view.jsx", "other.cjs", "button.styles.mjs"] {
        assert!(writer.get(&format!("dist/{specifier}")).is_some(), "{specifier}");
    }
}

#[test]
fn test_module_outputs_resolve_from_each_artifact_family() {
    let program = mixed_module_project();
    let rule = RewriteRule::explicit_esm();
    let names = output_name_map(&program, &rule, &ExtensionCoercion::none()).unwrap();
    let outputs = ModuleOutputs::new(&program, &names);

    assert_eq!(
        outputs.resolve_import("./view", "src/app.ts", ImportingArtifact::Code),
        Some("./view.jsx".to_string())
    );
    assert_eq!(
        outputs.resolve_import("./other.cts", "src/app.ts", ImportingArtifact::Declaration),
        Some("./other.cjs".to_string())
    );
    assert_eq!(
        outputs.resolve_import("../src/view", "src/app.ts", ImportingArtifact::Code),
        Some("./view.jsx".to_string())
    );
    assert_eq!(
        outputs.resolve_import("./missing", "src/app.ts", ImportingArtifact::Code),
        None
    );
    assert_eq!(
        outputs.resolve_import("./view", "src/unknown.ts", ImportingArtifact::Code),
        None
    );
}

#[test]
fn test_rule_that_matches_nothing_leaves_emit_untouched() {
    let program = project();
    let rule = RewriteRule::record()
        .pattern("#never", "^never-matches$")
        .unwrap()
        .build();

    let mut rewritten = MemoryWriter::new();
    emit_with_rewrites(&program, &rule, &ExtensionCoercion::none(), &mut rewritten).unwrap();

    let mut plain = MemoryWriter::new();
    program.emit(&EmitTransformers::new(), &mut plain).unwrap();

    assert_eq!(rewritten.files, plain.files);
}

#[test]
fn test_record_rule_with_alias_and_preset() {
    let mut program = Program::new("", options());
    program.add_file(SourceFile::new(
        "src/a.ts",
        vec![
            Statement::import_named(&["button"], "../lib/widgets/button.ts"),
            Statement::export_all("./b"),
        ],
    ));
    let rule = RewriteRule::record()
        .pattern("#lib/", r"^\.\./lib/")
        .unwrap()
        .matcher(
            ".mjs",
            esmify::rewrite::Matcher::Function(esmify::rewrite::rule::explicit_esm_fn()),
        )
        .build();

    let mut writer = MemoryWriter::new();
    emit_with_rewrites(&program, &rule, &ExtensionCoercion::none(), &mut writer).unwrap();

    assert_eq!(
        writer.get("dist/a.mjs"),
        Some(
            "import { button } from \"#lib/widgets/button.ts\";\n\
             export * from \"./b.mjs\";\n\
             //# sourceMappingURL=a.mjs.map"
        )
    );
}

#[test]
fn test_colliding_output_names_are_rejected_before_writing() {
    let mut program = Program::new("", EmitOptions::default());
    program.add_file(SourceFile::new("a.ts", vec![Statement::verbatim("a();")]));
    program.add_file(SourceFile::new("b.ts", vec![Statement::verbatim("b();")]));
    let rule = RewriteRule::record()
        .pattern("index.mjs", r"^[ab]\.js$")
        .unwrap()
        .build();

    let mut writer = MemoryWriter::new();
    let err = emit_with_rewrites(&program, &rule, &ExtensionCoercion::none(), &mut writer)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "rewrite rule sends a.js, b.js to the same output 'index.mjs'"
    );
    assert!(writer.files.is_empty());
}

#[test]
fn test_rule_errors_surface_through_emit() {
    let program = project();
    let rule = RewriteRule::function(|specifier, origin| match origin {
        Some(_) if specifier == "./util" => Err(RuleError::rejected(specifier, "util is private")),
        _ => Ok(None),
    });

    let mut writer = MemoryWriter::new();
    let err = emit_with_rewrites(&program, &rule, &ExtensionCoercion::none(), &mut writer)
        .unwrap_err();

    assert!(format!("{err:#}").contains("rewrite rule failed for './util': util is private"));
    // util.ts has no specifiers, so its artifacts were written before the failure.
    assert_eq!(writer.paths()[0], "dist/util.js");
}

#[test]
fn test_output_name_map_follows_program_options() {
    let program = project();
    let names = output_name_map(
        &program,
        &RewriteRule::explicit_esm(),
        &ExtensionCoercion::dual_mode(["tsx"]),
    )
    .unwrap();

    assert_eq!(names.len(), 8);
    assert_eq!(names.get("dist/view.d.ts"), "dist/view.d.mts");
    assert_eq!(names.get("dist/util.js.map"), "dist/util.mjs.map");
}

#[test]
fn test_emit_to_disk() {
    let temp = tempfile::tempdir().unwrap();
    let program = project();
    let mut writer = DiskWriter::new(temp.path());

    emit_with_rewrites(
        &program,
        &RewriteRule::explicit_esm(),
        &ExtensionCoercion::dual_mode([".tsx"]),
        &mut writer,
    )
    .unwrap();

    let dist = temp.path().join("dist");
    assert!(dist.join("view.mjs").is_file());
    assert!(dist.join("view.d.mts.map").is_file());
    assert!(!dist.join("view.js").exists());
    let code = std::fs::read_to_string(dist.join("util.mjs")).unwrap();
    assert!(code.ends_with("//# sourceMappingURL=util.mjs.map"));
}
