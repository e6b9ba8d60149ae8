//! The sample package tree exposed by `sigcli-demo`.
//!
//! ```text
//! prog            package, `.` runs the package entrypoint
//! ├── _bar        hidden from the listing
//! ├── baz         package
//! │   └── qux
//! ├── foo
//! ├── serve       opaque `Port` parameter
//! ├── sleep       async entrypoint
//! └── typed       every parameter kind
//! ```

use anyhow::Context;
use once_cell::sync::OnceCell;
use sigcli_sdk::{
    Annotation, CliBuilder, Entrypoint, Module, OpaqueType, Parameter, Registry, Result, TypeExpr,
    Value,
};
use std::fmt;
use std::time::Duration;

pub const PROGRAM: &str = "prog";

/// Attribute name every demo module registers its entrypoint under.
pub const ENTRYPOINT: &str = "main";

static REGISTRY: OnceCell<Registry> = OnceCell::new();

pub fn registry() -> Result<&'static Registry> {
    REGISTRY.get_or_try_init(build_registry)
}

/// Builder defaults for the demo; the config file may override them.
pub fn builder() -> CliBuilder {
    CliBuilder::new().submodules(true)
}

fn build_registry() -> Result<Registry> {
    Registry::new()
        .with_module(
            Module::package(PROGRAM)
                .with_doc("Demonstration program built from a registered package tree.")
                .with_entrypoint(Entrypoint::new(ENTRYPOINT, |_| Ok(Value::from(PROGRAM)))),
        )?
        .with_module(Module::new("prog.foo").with_entrypoint(foo()))?
        .with_module(Module::new("prog._bar").with_entrypoint(bar()))?
        .with_module(
            Module::package("prog.baz")
                .with_doc("Nested package.")
                .with_entrypoint(baz()),
        )?
        .with_module(Module::new("prog.baz.qux").with_entrypoint(qux()))?
        .with_module(Module::new("prog.serve").with_entrypoint(serve()))?
        .with_module(Module::new("prog.sleep").with_entrypoint(sleep()))?
        .with_module(Module::new("prog.typed").with_entrypoint(typed()))
}

fn foo() -> Entrypoint {
    Entrypoint::new(ENTRYPOINT, |args| {
        let pos: i64 = args.arg(0)?;
        let doubled = pos.checked_mul(2).context("result does not fit in an int")?;
        Ok(Value::Int(doubled))
    })
    .with_doc("Double an integer.")
    .with_param(Parameter::positional_only("pos", TypeExpr::Int))
}

fn bar() -> Entrypoint {
    Entrypoint::new(ENTRYPOINT, |args| Ok(Value::Int(args.arg(0)?)))
        .with_doc("Echo an integer.")
        .with_param(Parameter::positional_only("pos", TypeExpr::Int).with_default(42))
}

fn baz() -> Entrypoint {
    Entrypoint::new(ENTRYPOINT, |args| {
        let value: String = args.kwarg("pos_or_kwd")?;
        Ok(Value::from(format!("baz {}", value)))
    })
    .with_param(Parameter::positional_or_keyword("pos_or_kwd", TypeExpr::Str))
}

fn qux() -> Entrypoint {
    Entrypoint::new(ENTRYPOINT, |args| {
        let value: String = args.kwarg("pos_or_kwd")?;
        Ok(Value::from(format!("qux {}", value)))
    })
    .with_param(Parameter::positional_or_keyword("pos_or_kwd", TypeExpr::Str).with_default("hi"))
}

/// A TCP port in `1..=65535`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port(pub u16);

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn port_type() -> OpaqueType {
    OpaqueType::new("Port", |value: Value| match value {
        Value::Int(n) => u16::try_from(n)
            .ok()
            .filter(|port| *port != 0)
            .map(Port)
            .ok_or_else(|| format!("{} is not a valid port", n)),
        other => Err(format!("expected an int, got {}", other.kind())),
    })
}

fn serve() -> Entrypoint {
    Entrypoint::new(ENTRYPOINT, |args| {
        let port = args
            .keyword("port")
            .and_then(|value| value.downcast_ref::<Port>())
            .context("port was not constructed")?;
        let host: String = args.kwarg("host")?;
        Ok(Value::from(format!("listening on {}:{}", host, port)))
    })
    .with_doc("Pretend to serve on a port.")
    .with_param(Parameter::keyword_only(
        "port",
        Annotation::annotated(TypeExpr::opaque(port_type()), "TCP port to listen on"),
    ))
    .with_param(Parameter::keyword_only("host", TypeExpr::Str).with_default("127.0.0.1"))
}

fn sleep() -> Entrypoint {
    Entrypoint::new_async(ENTRYPOINT, |args| async move {
        let seconds: f64 = args.kwarg("seconds")?;
        let duration = Duration::try_from_secs_f64(seconds).context("invalid duration")?;
        tokio::time::sleep(duration).await;
        Ok::<_, anyhow::Error>(Value::from(format!("slept {}", Value::Float(seconds))))
    })
    .with_doc("Sleep asynchronously.")
    .with_param(Parameter::positional_or_keyword("seconds", TypeExpr::Float).with_default(0.01))
}

fn typed() -> Entrypoint {
    Entrypoint::new(ENTRYPOINT, |args| {
        let mut entries = vec![(Value::from("a"), args.arg::<Value>(0)?)];
        for (name, value) in &args.kwargs {
            entries.push((Value::from(name.as_str()), value.clone()));
        }
        Ok(Value::dict(entries))
    })
    .with_doc("Show how each parameter kind is parsed.")
    .with_params([
        Parameter::positional_only("a", TypeExpr::Int),
        Parameter::positional_or_keyword("b", TypeExpr::Str),
        Parameter::positional_or_keyword("c", TypeExpr::Bool).with_default(true),
        Parameter::keyword_only("d", Annotation::annotated(TypeExpr::Float, "A ratio")),
        Parameter::keyword_only("e", TypeExpr::variadic_tuple(TypeExpr::Str))
            .with_default(Value::tuple([])),
    ])
}
