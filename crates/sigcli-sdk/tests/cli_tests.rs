use sigcli_sdk::{
    CliBuilder, CommandNode, Entrypoint, Error, OpaqueType, Parameter, Target, TypeExpr, Value, cli,
};
use sigcli_testing::assertions::assert_last_call;
use sigcli_testing::fixtures::{self, CallLog};
use sigcli_testing::ENTRYPOINT;

fn outline(node: &CommandNode, depth: usize, lines: &mut Vec<String>) {
    let target = match node.target {
        Target::Help => "help",
        Target::Entrypoint(_) => "entrypoint",
    };
    let hidden = if node.hidden { " (hidden)" } else { "" };
    let params: Vec<&str> = node.parameters.iter().map(|p| p.name.as_str()).collect();
    lines.push(format!(
        "{}{} -> {}{} [{}]",
        "  ".repeat(depth),
        node.name,
        target,
        hidden,
        params.join(", ")
    ));
    for child in &node.children {
        outline(child, depth + 1, lines);
    }
}

#[test]
fn test_sample_tree_outline() {
    let registry = fixtures::sample_registry(&CallLog::new()).unwrap();
    let app = CliBuilder::new()
        .submodules(true)
        .decorate(&registry, "prog", ENTRYPOINT)
        .unwrap();

    let mut lines = Vec::new();
    outline(app.tree(), 0, &mut lines);
    insta::assert_snapshot!(lines.join("\n"), @r"
    prog -> help []
      _bar -> entrypoint (hidden) [pos]
      baz -> help []
        qux -> entrypoint [pos_or_kwd]
        . -> entrypoint [pos_or_kwd]
      docs -> help []
      foo -> entrypoint [pos]
      . -> entrypoint []
    ");
}

#[test]
fn test_default_decorator_ignores_submodules() {
    let log = CallLog::new();
    let registry = fixtures::sample_registry(&log).unwrap();
    let app = cli().decorate(&registry, "prog", ENTRYPOINT).unwrap();

    assert!(app.tree().children.is_empty());
    assert_eq!(app.run(Vec::<String>::new()).unwrap(), Value::from("prog"));
    assert!(app.run(["foo"]).is_err());
}

#[test]
fn test_decorate_entrypoint_end_to_end() {
    let log = CallLog::new();
    let app = cli()
        .prog("typed")
        .decorate_entrypoint(fixtures::recording("typed", fixtures::typed_parameters(), &log))
        .unwrap();

    assert_eq!(app.tree().name, "typed");
    assert_eq!(app.entrypoint().name(), ENTRYPOINT);

    app.run(["1", "hi", "--no-c", "--d", "0.5"]).unwrap();
    assert_last_call(
        &log,
        "typed",
        &[Value::Int(1)],
        &[
            ("b", Value::from("hi")),
            ("c", Value::Bool(false)),
            ("d", Value::Float(0.5)),
        ],
    )
    .unwrap();
}

#[test]
fn test_help_shows_defaults_and_negation() {
    let app = cli()
        .decorate_entrypoint(fixtures::recording("typed", fixtures::typed_parameters(), &CallLog::new()))
        .unwrap();
    let help = app.render_help::<&str>(&[]).unwrap();
    assert!(help.contains("Default: True"));
    assert!(help.contains("--no-c"));
    assert!(help.contains("--d"));

    let plain = cli()
        .negatable_bools(false)
        .decorate_entrypoint(fixtures::recording("typed", fixtures::typed_parameters(), &CallLog::new()))
        .unwrap();
    assert!(!plain.render_help::<&str>(&[]).unwrap().contains("--no-c"));
}

#[test]
fn test_subcommand_listing_uses_custom_heading() {
    let registry = fixtures::sample_registry(&CallLog::new()).unwrap();
    let app = CliBuilder::new()
        .submodules(true)
        .decorate(&registry, "prog", ENTRYPOINT)
        .unwrap();
    let help = app.render_help::<&str>(&[]).unwrap();
    assert!(help.contains("subcommands"));
    assert!(help.contains("{subcommand}"));
    assert!(help.contains("Sample program."));
    assert!(!help.contains("_bar"));

    let nested = app.render_help(&["baz"]).unwrap();
    assert!(nested.contains("qux"));
}

#[test]
fn test_build_errors() {
    let registry = fixtures::sample_registry(&CallLog::new()).unwrap();
    assert!(matches!(
        cli().decorate(&registry, "missing", ENTRYPOINT),
        Err(Error::ModuleNotFound(_))
    ));
    assert!(matches!(
        cli().decorate(&registry, "prog.docs", ENTRYPOINT),
        Err(Error::EntrypointNotFound { .. })
    ));

    let variadic = fixtures::variadic_registry(&CallLog::new()).unwrap();
    assert!(matches!(
        CliBuilder::new()
            .submodules(true)
            .decorate(&variadic, "prog", ENTRYPOINT),
        Err(Error::Types(_))
    ));
}

#[derive(Debug)]
struct Port(u16);

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Port({})", self.0)
    }
}

#[test]
fn test_opaque_parameter() {
    let port = OpaqueType::new("Port", |value: Value| match value {
        Value::Int(n) if (1..=65535).contains(&n) => Ok(Port(n as u16)),
        other => Err(format!("{} is out of range", other)),
    });
    let entrypoint = Entrypoint::new("serve", |args| {
        let port = args
            .keyword("port")
            .and_then(|v| v.downcast_ref::<Port>())
            .map(|p| p.0)
            .unwrap_or_default();
        Ok(Value::Int(i64::from(port)))
    })
    .with_param(Parameter::keyword_only("port", TypeExpr::opaque(port)).with_default(Value::None));

    let app = cli().decorate_entrypoint(entrypoint).unwrap();
    assert_eq!(app.run(["--port", "8080"]).unwrap(), Value::Int(8080));
    assert_eq!(app.run(Vec::<String>::new()).unwrap(), Value::Int(0));
    assert!(app.run(["--port", "0"]).is_err());
}
