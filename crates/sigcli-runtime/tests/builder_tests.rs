// Tree construction from registered modules: discovery, visibility, binding
use sigcli_runtime::{
    ArgShape, BuildOptions, Error, ModuleProvider, Target, build_tree, derive_surface,
};
use sigcli_testing::assertions::{assert_bound, assert_visible_children};
use sigcli_testing::fixtures::{self, CallLog};
use sigcli_testing::ENTRYPOINT;
use sigcli_types::{DeclaredKind, Value};

fn sample_tree(options: &BuildOptions) -> sigcli_runtime::Result<sigcli_runtime::CommandNode> {
    let registry = fixtures::sample_registry(&CallLog::new()).expect("sample registry");
    let module = registry.import("prog")?;
    let entrypoint = module.entrypoint(ENTRYPOINT)?;
    build_tree(&registry, module, entrypoint, options)
}

#[test]
fn test_submodules_become_subcommands() {
    let tree = sample_tree(&BuildOptions::new().submodules(true)).unwrap();

    let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["_bar", "baz", "docs", "foo", "."]);
    assert_visible_children(&tree, &[], &["baz", "docs", "foo", "."]).unwrap();
    assert_visible_children(&tree, &["baz"], &["qux", "."]).unwrap();
}

#[test]
fn test_package_entrypoints_bind_to_self_command() {
    let tree = sample_tree(&BuildOptions::new().submodules(true)).unwrap();

    assert!(matches!(tree.target, Target::Help));
    assert_bound(&tree, &["."]).unwrap();
    assert_bound(&tree, &["baz", "."]).unwrap();
    assert_bound(&tree, &["baz", "qux"]).unwrap();
    assert_bound(&tree, &["foo"]).unwrap();
    assert_bound(&tree, &["_bar"]).unwrap();

    assert!(matches!(tree.find(&["baz"]).unwrap().target, Target::Help));
    assert!(assert_bound(&tree, &["docs"]).is_err());
}

#[test]
fn test_hidden_flag_follows_leading_underscore() {
    let tree = sample_tree(&BuildOptions::new().submodules(true)).unwrap();
    assert!(tree.child("_bar").unwrap().hidden);
    assert!(!tree.child("foo").unwrap().hidden);
    assert!(!tree.hidden);
}

#[test]
fn test_help_falls_back_to_module_doc() {
    let tree = sample_tree(&BuildOptions::new().submodules(true)).unwrap();
    assert_eq!(tree.help.as_deref(), Some("Sample program."));
    assert_eq!(tree.child("foo").unwrap().help.as_deref(), Some("Foo module."));
    assert_eq!(tree.child("_bar").unwrap().help, None);
}

#[test]
fn test_without_submodules_builds_single_node() {
    let tree = sample_tree(&BuildOptions::new()).unwrap();
    assert_eq!(tree.name, "prog");
    assert!(tree.children.is_empty());
    assert!(matches!(tree.target, Target::Entrypoint(_)));
}

#[test]
fn test_prog_overrides_root_name() {
    let tree = sample_tree(&BuildOptions::new().prog("demo")).unwrap();
    assert_eq!(tree.name, "demo");
}

#[test]
fn test_unbounded_arity_fails_the_build() {
    let registry = fixtures::variadic_registry(&CallLog::new()).unwrap();
    let module = registry.import("prog").unwrap();
    let entrypoint = module.entrypoint(ENTRYPOINT).unwrap();

    let err = build_tree(
        &registry,
        module.clone(),
        entrypoint.clone(),
        &BuildOptions::new().submodules(true),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Types(sigcli_types::Error::UnsupportedKind {
            kind: DeclaredKind::VarPositional | DeclaredKind::VarKeyword,
            ..
        })
    ));

    // The root alone is fine when the subtree is not walked
    assert!(build_tree(&registry, module, entrypoint, &BuildOptions::new()).is_ok());
}

#[test]
fn test_kind_to_surface_mapping() {
    let specs = sigcli_core::describe_parameters(&fixtures::surface_parameters()).unwrap();
    let surface = derive_surface(&specs, &BuildOptions::new());

    let positionals: Vec<(&str, bool)> = surface
        .iter()
        .filter(|s| s.shape == ArgShape::Positional)
        .map(|s| (s.id.as_str(), s.required))
        .collect();
    assert_eq!(positionals, vec![("a", true), ("b", true)]);

    let flags: Vec<(Option<&str>, bool, Option<&Value>)> = surface
        .iter()
        .filter(|s| s.is_flag())
        .map(|s| (s.long.as_deref(), s.required, s.default.as_ref()))
        .collect();
    assert_eq!(
        flags,
        vec![
            (Some("c"), false, Some(&Value::Int(1))),
            (Some("d"), true, None),
            (Some("e"), false, Some(&Value::Float(2.0))),
        ]
    );

    assert_eq!(surface[2].help.as_deref(), Some("Default: 1"));
    assert_eq!(surface[4].help.as_deref(), Some("Default: 2.0"));
    assert!(surface.iter().all(|s| s.negation.is_none()));
}

#[test]
fn test_surface_renders_to_clap_arguments() {
    let (registry, module) = fixtures::single_module(
        fixtures::recording("f", fixtures::surface_parameters(), &CallLog::new()),
    )
    .unwrap();
    let entrypoint = module.entrypoint(ENTRYPOINT).unwrap();
    let options = BuildOptions::new();
    let tree = build_tree(&registry, module, entrypoint, &options).unwrap();
    let command = sigcli_runtime::render_command(&tree, &options);

    let rendered: Vec<(String, bool, bool, Option<&str>)> = command
        .get_arguments()
        .map(|arg| {
            (
                arg.get_id().to_string(),
                arg.is_positional(),
                arg.is_required_set(),
                arg.get_long(),
            )
        })
        .collect();
    assert_eq!(
        rendered,
        vec![
            ("a".to_string(), true, true, None),
            ("b".to_string(), true, true, None),
            ("c".to_string(), false, false, Some("c")),
            ("d".to_string(), false, true, Some("d")),
            ("e".to_string(), false, false, Some("e")),
        ]
    );
}
