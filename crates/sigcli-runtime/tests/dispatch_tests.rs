// Parsing and dispatch against built trees
use sigcli_core::Entrypoint;
use sigcli_runtime::{BuildOptions, Dispatcher, Error, ModuleProvider, Registry, build_tree};
use sigcli_testing::assertions::assert_last_call;
use sigcli_testing::fixtures::{self, CallLog};
use sigcli_testing::ENTRYPOINT;
use sigcli_types::{Parameter, TypeExpr, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn dispatcher(registry: &Registry, options: BuildOptions) -> Dispatcher {
    let module = registry.import("prog").unwrap();
    let entrypoint = module.entrypoint(ENTRYPOINT).unwrap();
    let tree = build_tree(registry, module, entrypoint, &options).unwrap();
    Dispatcher::new(tree, &options)
}

fn single(entrypoint: Entrypoint) -> Dispatcher {
    let (registry, _) = fixtures::single_module(entrypoint).unwrap();
    dispatcher(&registry, BuildOptions::new())
}

fn sample(log: &CallLog) -> Dispatcher {
    let registry = fixtures::sample_registry(log).unwrap();
    dispatcher(&registry, BuildOptions::new().submodules(true))
}

#[test]
fn test_end_to_end_typed_invocation() {
    let log = CallLog::new();
    let cli = single(fixtures::recording("typed", fixtures::typed_parameters(), &log));

    let result = cli.run(["1", "hi", "--no-c", "--d", "0.5"]).unwrap();

    assert_eq!(result, Value::from("typed"));
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
fn test_defaults_and_bare_bool_flag() {
    let log = CallLog::new();
    let cli = single(fixtures::recording("typed", fixtures::typed_parameters(), &log));

    cli.run(["1", "hi", "--d", "-0.5"]).unwrap();
    assert_last_call(
        &log,
        "typed",
        &[Value::Int(1)],
        &[
            ("b", Value::from("hi")),
            ("c", Value::Bool(true)),
            ("d", Value::Float(-0.5)),
        ],
    )
    .unwrap();

    cli.run(["1", "hi", "--c", "--d", "1.5"]).unwrap();
    assert_eq!(
        log.last().unwrap().arguments.kwargs[1],
        ("c".to_string(), Value::Bool(true))
    );

    cli.run(["1", "hi", "--c", "False", "--d", "1.5"]).unwrap();
    assert_eq!(
        log.last().unwrap().arguments.kwargs[1],
        ("c".to_string(), Value::Bool(false))
    );
}

#[test]
fn test_repeated_flag_keeps_last_value() {
    let log = CallLog::new();
    let cli = single(fixtures::recording("typed", fixtures::typed_parameters(), &log));

    cli.run(["1", "hi", "--d", "1.5", "--d", "2.5", "--c", "--c", "False"])
        .unwrap();
    assert_last_call(
        &log,
        "typed",
        &[Value::Int(1)],
        &[
            ("b", Value::from("hi")),
            ("c", Value::Bool(false)),
            ("d", Value::Float(2.5)),
        ],
    )
    .unwrap();
}

#[test]
fn test_bare_non_bool_flag_yields_none() {
    let log = CallLog::new();
    let cli = single(fixtures::recording("f", fixtures::surface_parameters(), &log));

    cli.run(["1", "2", "--d", "0.5", "--e"]).unwrap();
    let call = log.last().unwrap();
    assert_eq!(call.arguments.args, vec![Value::Int(1)]);
    assert_eq!(
        call.arguments.kwargs,
        vec![
            ("b".to_string(), Value::Int(2)),
            ("c".to_string(), Value::Int(1)),
            ("d".to_string(), Value::Float(0.5)),
            ("e".to_string(), Value::None),
        ]
    );
}

#[test]
fn test_coercion_failure_prevents_invocation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let entrypoint = Entrypoint::new(ENTRYPOINT, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Value::None)
    })
    .with_params(fixtures::surface_parameters());
    let cli = single(entrypoint);

    let err = cli
        .run(["1", "2", "--d", "0.5", "--e", "not-a-number"])
        .unwrap_err();
    let Error::Parse(parse_error) = err else {
        panic!("expected a parse error");
    };
    assert_eq!(parse_error.kind(), clap::error::ErrorKind::ValueValidation);
    assert!(parse_error.to_string().contains("not-a-number"));

    assert!(cli.run(["1", "2", "--d", "1"]).is_err());
    assert!(cli.run(["1", "[2]", "--d", "0.5"]).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_missing_required_argument() {
    let log = CallLog::new();
    let cli = single(fixtures::recording("typed", fixtures::typed_parameters(), &log));

    let err = cli.run(["1", "hi"]).unwrap_err();
    assert!(matches!(err, Error::Parse(ref e) if e.kind() == clap::error::ErrorKind::MissingRequiredArgument));
    assert!(log.is_empty());
}

#[test]
fn test_subcommand_dispatch() {
    let log = CallLog::new();
    let cli = sample(&log);

    cli.run(["foo", "21"]).unwrap();
    assert_last_call(&log, "prog.foo", &[Value::Int(21)], &[]).unwrap();

    cli.run(["baz", "qux"]).unwrap();
    assert_last_call(&log, "prog.baz.qux", &[], &[("pos_or_kwd", Value::from("hi"))]).unwrap();

    cli.run(["baz", "qux", "--pos-or-kwd", "[not, a, literal]"]).unwrap();
    assert_last_call(
        &log,
        "prog.baz.qux",
        &[],
        &[("pos_or_kwd", Value::from("[not, a, literal]"))],
    )
    .unwrap();
}

#[test]
fn test_package_self_dispatch() {
    let log = CallLog::new();
    let cli = sample(&log);

    assert_eq!(cli.run(["."]).unwrap(), Value::from("prog"));
    assert_last_call(&log, "prog", &[], &[]).unwrap();

    cli.run(["baz", ".", "value"]).unwrap();
    assert_last_call(&log, "prog.baz", &[], &[("pos_or_kwd", Value::from("value"))]).unwrap();
}

#[test]
fn test_hidden_subcommand_is_dispatchable() {
    let log = CallLog::new();
    let cli = sample(&log);

    cli.run(["_bar"]).unwrap();
    assert_last_call(&log, "prog._bar", &[Value::Int(42)], &[]).unwrap();

    cli.run(["_bar", "7"]).unwrap();
    assert_last_call(&log, "prog._bar", &[Value::Int(7)], &[]).unwrap();

    let listing = cli.render_help::<&str>(&[]).unwrap();
    assert!(listing.contains("foo"));
    assert!(listing.contains("baz"));
    assert!(!listing.contains("_bar"));
}

#[test]
fn test_no_subcommand_prints_help_and_returns_none() {
    let log = CallLog::new();
    let cli = sample(&log);

    assert_eq!(cli.run(Vec::<String>::new()).unwrap(), Value::None);
    assert_eq!(cli.run(["baz"]).unwrap(), Value::None);
    assert_eq!(cli.run(["docs"]).unwrap(), Value::None);
    assert!(log.is_empty());
}

#[test]
fn test_parse_reports_path_and_values() {
    let log = CallLog::new();
    let cli = sample(&log);

    let parsed = cli.parse(["baz", "qux", "--pos-or-kwd", "yo"]).unwrap();
    assert_eq!(parsed.path, vec!["baz", "qux"]);
    assert_eq!(parsed.value("pos_or_kwd"), Some(&Value::from("yo")));
    assert!(log.is_empty());
}

#[test]
fn test_help_request_is_a_display_error() {
    let cli = sample(&CallLog::new());
    let err = cli.run(["foo", "--help"]).unwrap_err();
    assert!(err.is_display_request());
}

#[test]
fn test_async_entrypoint_runs_to_completion() {
    let entrypoint = Entrypoint::new_async(ENTRYPOINT, |args| async move {
        let seconds: f64 = args.kwarg("seconds")?;
        tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
        Ok::<_, anyhow::Error>(Value::from("slept"))
    })
    .with_param(Parameter::keyword_only("seconds", TypeExpr::Float).with_default(0.001));
    let cli = single(entrypoint);

    assert_eq!(cli.run(["--seconds", "0.002"]).unwrap(), Value::from("slept"));
    assert_eq!(cli.run(Vec::<String>::new()).unwrap(), Value::from("slept"));
}

#[test]
fn test_entrypoint_error_is_propagated() {
    let entrypoint = Entrypoint::new(ENTRYPOINT, |_| anyhow::bail!("boom"));
    let cli = single(entrypoint);

    let err = cli.run(Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, Error::Entrypoint(_)));
    assert_eq!(err.to_string(), "Entrypoint failed: boom");
}
