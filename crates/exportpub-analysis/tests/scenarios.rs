//! End-to-end export pass scenarios over small module graphs.

use exportpub_analysis::report::SkipReason;
use exportpub_analysis::{
    CollectingSink, Evaluator, EvaluatorOptions, ExportError, ExportPass, PassReport, Rejection,
    Severity,
};
use exportpub_model::builder::{ClassBuilder, FunctionBuilder, PropertyBuilder};
use exportpub_model::{
    ClassDecl, Declaration, ModelError, ModuleGraph, SourceFile, Type, TypeArgument, Visibility,
};

const PKG: &str = "test.exportPublic";

fn fq(name: &str) -> String {
    format!("{PKG}.{name}")
}

fn string() -> Type {
    Type::class("kotlin.String")
}

fn int() -> Type {
    Type::class("kotlin.Int")
}

fn unit() -> Type {
    Type::class("kotlin.Unit")
}

fn module(classes: Vec<ClassDecl>) -> ModuleGraph {
    let mut file = SourceFile::new("code.kt", PKG);
    for class in classes {
        file = file.with(Declaration::Class(class));
    }
    ModuleGraph::new("test_exportPublic").with_file(file)
}

fn exported(graph: &ModuleGraph) -> Vec<String> {
    graph
        .exported_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect()
}

fn run(graph: &mut ModuleGraph) -> (PassReport, CollectingSink) {
    let mut sink = CollectingSink::new();
    let report = ExportPass::default()
        .run(graph, &mut sink)
        .expect("pass should succeed");
    (report, sink)
}

/// A module shaped like a typical multiplatform library surface.
fn library() -> ModuleGraph {
    let throwable = Type::class("kotlin.Throwable");
    let collections =
        |name: &str, args: Vec<Type>| Type::generic(format!("kotlin.collections.{name}"), args);

    let classes = vec![
        ClassBuilder::new(fq("AClass")).build(),
        ClassBuilder::new(fq("AObject")).object().build(),
        ClassBuilder::new(fq("AEnum"))
            .enum_class()
            .supertype(Type::generic("kotlin.Enum", vec![Type::class(fq("AEnum"))]))
            .build(),
        ClassBuilder::new(fq("EnumProp"))
            .property("e", Type::class(fq("AEnum")).nullable())
            .build(),
        ClassBuilder::new(fq("AException"))
            .supertype(Type::class("kotlin.Exception"))
            .inherited_property("message", string().nullable(), throwable.clone())
            .inherited_property("cause", throwable.clone().nullable(), throwable)
            .build(),
        ClassBuilder::new(fq("IA")).interface().property("prop", string()).build(),
        ClassBuilder::new(fq("IB"))
            .interface()
            .property("a", Type::class(fq("IA")))
            .build(),
        ClassBuilder::new(fq("IWithCollections"))
            .interface()
            .property("list", collections("List", vec![string()]))
            .property("mlist", collections("MutableList", vec![string()]))
            .property("set", collections("Set", vec![string()]))
            .property("mset", collections("MutableSet", vec![string()]))
            .property("map", collections("Map", vec![int(), string()]))
            .property("mmap", collections("MutableMap", vec![int(), string()]))
            .build(),
        ClassBuilder::new(fq("WithStart"))
            .interface()
            .property(
                "map",
                Type::with_arguments(
                    "kotlin.collections.Map",
                    vec![TypeArgument::Star, TypeArgument::Star],
                ),
            )
            .build(),
        ClassBuilder::new(fq("WithTypeParameter"))
            .interface()
            .type_parameter("T")
            .property("prop", Type::parameter("T"))
            .method("f", vec![Type::parameter("T")], unit())
            .method("f2", vec![], Type::parameter("T"))
            .build(),
    ];

    module(classes).with_dependency(
        ClassBuilder::new("kotlin.Exception")
            .supertype(Type::class("kotlin.Throwable"))
            .build(),
    )
}

#[test]
fn library_surface_is_exported() {
    let mut graph = library();
    let (report, sink) = run(&mut graph);

    let expected: Vec<String> = [
        "AClass",
        "AObject",
        "AEnum",
        "EnumProp",
        "AException",
        "IA",
        "IB",
        "IWithCollections",
        "WithTypeParameter",
    ]
    .iter()
    .map(|n| fq(n))
    .collect();
    assert_eq!(exported(&graph), expected);
    assert_eq!(report.exported, expected);

    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].name, fq("WithStart"));
    assert_eq!(sink.count(Severity::Warning), 1);
    assert!(sink.contains(Severity::Warning, "test.exportPublic.WithStart::map"));
    assert_eq!(sink.count(Severity::Error), 0);
}

#[test]
fn star_projected_property_names_the_member() {
    let mut graph = module(vec![ClassBuilder::new(fq("NonExpProp"))
        .property(
            "map",
            Type::with_arguments(
                "kotlin.collections.Map",
                vec![TypeArgument::Star, TypeArgument::Star],
            ),
        )
        .build()]);
    let (report, sink) = run(&mut graph);

    assert!(exported(&graph).is_empty());
    assert_eq!(
        report.rejection_of(&fq("NonExpProp")),
        Some(&Rejection::Properties(vec![
            "test.exportPublic.NonExpProp::map: kotlin.collections.Map<*, *>".into()
        ]))
    );
    let warnings = sink.messages(Severity::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("Will not export test.exportPublic.NonExpProp"));
    assert!(warnings[0].contains("NonExpProp::map: kotlin.collections.Map<*, *>"));
}

#[test]
fn running_twice_gives_the_same_markers() {
    let mut graph = library();
    run(&mut graph);
    let first = exported(&graph);
    let snapshot = graph.clone();

    let (second_report, _) = run(&mut graph);
    assert_eq!(exported(&graph), first);
    assert_eq!(graph, snapshot);
    assert!(second_report.exported.is_empty());
    assert_eq!(second_report.already_exported, first);
    assert_eq!(second_report.rejected.len(), 1);
}

#[test]
fn self_referential_class_is_exportable() {
    let a = ClassBuilder::new(fq("A"))
        .property("a", Type::class(fq("A")))
        .build();
    let graph = module(vec![a]);
    let mut evaluator = Evaluator::new(&graph, EvaluatorOptions::default());
    let class = graph.class_index().get(&fq("A").into()).expect("class A");
    assert!(evaluator.class_exportable(class).unwrap());
    assert!(evaluator.type_exportable(&Type::class(fq("A"))).unwrap());
}

#[test]
fn self_typed_class_with_a_bad_member_takes_its_users_down() {
    let mut graph = module(vec![
        ClassBuilder::new(fq("Node"))
            .property("parent", Type::class(fq("Node")))
            .property("id", Type::class("kotlin.Long"))
            .build(),
        ClassBuilder::new(fq("Tree"))
            .property("root", Type::class(fq("Node")))
            .build(),
    ]);
    let (report, sink) = run(&mut graph);

    assert!(exported(&graph).is_empty());
    assert!(report.rejection_of(&fq("Node")).is_some());
    assert_eq!(
        report.rejection_of(&fq("Tree")),
        Some(&Rejection::Properties(vec![
            "test.exportPublic.Tree::root: test.exportPublic.Node".into()
        ]))
    );
    assert_eq!(sink.count(Severity::Warning), 2);
}

#[test]
fn builtins_are_always_exportable() {
    let graph = module(vec![]);
    let mut evaluator = Evaluator::new(&graph, EvaluatorOptions::default());
    for name in ["kotlin.Int", "kotlin.Double", "kotlin.String", "kotlin.Boolean", "kotlin.Enum"] {
        assert!(evaluator.type_exportable(&Type::class(name)).unwrap(), "{name}");
    }
}

#[test]
fn wildcard_vetoes_an_otherwise_exportable_type() {
    let graph = module(vec![ClassBuilder::new(fq("Box")).type_parameter("T").build()]);
    let mut evaluator = Evaluator::new(&graph, EvaluatorOptions::default());
    assert!(evaluator
        .type_exportable(&Type::generic(fq("Box"), vec![string()]))
        .unwrap());
    assert!(!evaluator
        .type_exportable(&Type::with_arguments(fq("Box"), vec![TypeArgument::Star]))
        .unwrap());
    assert!(!evaluator
        .type_exportable(&Type::with_arguments("kotlin.collections.List", vec![TypeArgument::Star]))
        .unwrap());
}

#[test]
fn overloads_veto_but_distinct_names_pass() {
    let overloaded = ClassBuilder::new(fq("Overloaded"))
        .method("f", vec![], unit())
        .method("f", vec![int()], unit())
        .build();
    let distinct = ClassBuilder::new(fq("Distinct"))
        .method("f", vec![], unit())
        .method("g", vec![int()], unit())
        .method("h", vec![string()], unit())
        .build();
    let mut graph = module(vec![overloaded, distinct]);
    let (report, sink) = run(&mut graph);

    assert_eq!(exported(&graph), vec![fq("Distinct")]);
    assert_eq!(
        report.rejection_of(&fq("Overloaded")),
        Some(&Rejection::OverloadedMethods(vec!["f".into()]))
    );
    assert!(sink.contains(
        Severity::Warning,
        "Will not export test.exportPublic.Overloaded due to overloaded methods [f] which could cause a call ambiguity in JavaScript"
    ));
}

#[test]
fn non_public_classes_are_left_alone_quietly() {
    let mut graph = module(vec![
        ClassBuilder::new(fq("Internal")).visibility(Visibility::Internal).build(),
        ClassBuilder::new(fq("Private")).private().build(),
    ]);
    let (report, sink) = run(&mut graph);

    assert!(exported(&graph).is_empty());
    assert_eq!(
        report.skip_reason_of(&fq("Internal")),
        Some(&SkipReason::NotPublic(Visibility::Internal))
    );
    assert_eq!(sink.count(Severity::Warning), 0);
    assert_eq!(sink.count(Severity::Trace), 2);
}

#[test]
fn glob_filter_skips_without_structural_diagnostics() {
    let mut graph = library();
    let pass = ExportPass::with_patterns(&["test.exportPublic.I*"], '.').unwrap();
    let mut sink = CollectingSink::new();
    let report = pass.run(&mut graph, &mut sink).unwrap();

    assert_eq!(
        exported(&graph),
        vec![fq("IA"), fq("IB"), fq("IWithCollections")]
    );
    // WithStart is filtered before the evaluator sees it.
    assert_eq!(sink.count(Severity::Warning), 0);
    assert_eq!(report.skip_reason_of(&fq("WithStart")), Some(&SkipReason::Filtered));
    assert!(sink
        .messages(Severity::Info)
        .contains(&"Skipping test.exportPublic.WithStart: no export pattern matches"));
}

#[test]
fn already_exported_class_is_kept_as_is() {
    let mut graph = module(vec![ClassBuilder::new(fq("Marked"))
        .exported()
        .method("f", vec![], unit())
        .method("f", vec![int()], unit())
        .build()]);
    let (report, sink) = run(&mut graph);

    assert_eq!(exported(&graph), vec![fq("Marked")]);
    assert_eq!(report.already_exported, vec![fq("Marked")]);
    assert!(report.rejected.is_empty());
    assert_eq!(sink.count(Severity::Warning), 0);

    let Declaration::Class(class) = &graph.files[0].declarations[0] else {
        panic!("expected a class");
    };
    assert_eq!(class.annotations.len(), 1);
}

#[test]
fn exported_class_makes_dependents_exportable() {
    let mut graph = module(vec![
        ClassBuilder::new(fq("Handle")).value().exported().build(),
        ClassBuilder::new(fq("User"))
            .property("handle", Type::class(fq("Handle")))
            .build(),
    ]);
    let (report, _) = run(&mut graph);
    assert!(report.is_exported(&fq("User")));
}

#[test]
fn dependency_failure_propagates() {
    let mut graph = module(vec![
        ClassBuilder::new(fq("Wrapper"))
            .property("inner", Type::class(fq("Inner")))
            .build(),
        ClassBuilder::new(fq("Inner"))
            .method("f", vec![], unit())
            .method("f", vec![int()], unit())
            .build(),
    ]);
    let (report, _) = run(&mut graph);

    assert!(exported(&graph).is_empty());
    assert_eq!(
        report.rejection_of(&fq("Wrapper")),
        Some(&Rejection::Properties(vec![
            "test.exportPublic.Wrapper::inner: test.exportPublic.Inner".into()
        ]))
    );
    assert_eq!(
        report.rejection_of(&fq("Inner")),
        Some(&Rejection::OverloadedMethods(vec!["f".into()]))
    );
}

#[test]
fn top_level_functions_and_properties() {
    let file = SourceFile::new("api.kt", PKG)
        .with(Declaration::Function(
            FunctionBuilder::new(fq("greet")).param("name", string()).returns(string()).build(),
        ))
        .with(Declaration::Function(FunctionBuilder::new(fq("fetch")).suspend().build()))
        .with(Declaration::Function(
            FunctionBuilder::new(fq("secret")).visibility(Visibility::Internal).build(),
        ))
        .with(Declaration::Property(
            PropertyBuilder::new(fq("version"), string()).field_only().build(),
        ));
    let mut graph = ModuleGraph::new("api").with_file(file);
    let (report, sink) = run(&mut graph);

    assert_eq!(exported(&graph), vec![fq("greet"), fq("version")]);
    assert!(report.skip_reason_of(&fq("fetch")).is_some());
    assert!(sink.contains(Severity::Warning, "test.exportPublic.fetch"));
    assert!(!sink.contains(Severity::Info, "test.exportPublic.secret"));
}

#[test]
fn untyped_property_is_a_fatal_error() {
    let file = SourceFile::new("bad.kt", PKG).with(Declaration::Property(
        PropertyBuilder::new(fq("broken"), int()).untyped().build(),
    ));
    let mut graph = ModuleGraph::new("bad").with_file(file);
    let mut sink = CollectingSink::new();
    let err = ExportPass::default()
        .run(&mut graph, &mut sink)
        .unwrap_err();

    assert!(matches!(
        err,
        ExportError::Model(ModelError::MissingPropertyType { .. })
    ));
    assert_eq!(sink.count(Severity::Error), 1);
}

#[test]
fn lenient_property_rule_accepts_value_types() {
    let mut graph = module(vec![ClassBuilder::new(fq("Counter"))
        .property("total", Type::class("kotlin.Long"))
        .build()]);
    let pass = ExportPass::default().options(EvaluatorOptions {
        check_property_types: false,
    });
    let mut sink = CollectingSink::new();
    pass.run(&mut graph, &mut sink).unwrap();
    assert_eq!(exported(&graph), vec![fq("Counter")]);
}

#[test]
fn graph_from_json() {
    let json = r#"{
        "name": "json",
        "files": [{
            "path": "code.kt",
            "package": "test.exportPublic",
            "declarations": [
                {
                    "decl": "class",
                    "fq-name": "test.exportPublic.IA",
                    "kind": "interface",
                    "declarations": [{
                        "decl": "property",
                        "fq-name": "test.exportPublic.IA.prop",
                        "getter": { "return-type": { "kind": "class", "class": "kotlin.String" } }
                    }]
                },
                {
                    "decl": "function",
                    "fq-name": "test.exportPublic.load",
                    "return-type": { "kind": "class", "class": "kotlin.Unit" },
                    "modifiers": { "suspend": true }
                }
            ]
        }]
    }"#;
    let mut graph = ModuleGraph::from_json(json).unwrap();
    let (report, _) = run(&mut graph);

    assert_eq!(exported(&graph), vec![fq("IA")]);
    assert_eq!(report.skipped.len(), 1);

    let out = graph.to_json_pretty().unwrap();
    assert!(out.contains("kotlin.js.JsExport"));
}
