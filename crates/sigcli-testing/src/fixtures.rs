//! Sample module trees and recording entrypoints.
//!
//! The sample package mirrors a small program layout:
//!
//! ```text
//! prog/            package   entrypoint()
//!   foo            module    entrypoint(pos: int, /)
//!   _bar           module    entrypoint(pos: int = 42, /)
//!   baz/           package   entrypoint(pos_or_kwd: str)
//!     qux          module    entrypoint(pos_or_kwd: str = 'hi')
//!   docs           module    (no entrypoint)
//! ```

use anyhow::Result;
use sigcli_core::{Arguments, Entrypoint};
use sigcli_runtime::{Module, Registry};
use sigcli_types::{Parameter, TypeExpr, Value};
use std::sync::{Arc, Mutex};

/// Name every sample module uses for its entrypoint.
pub const ENTRYPOINT: &str = "entrypoint";

/// A single recorded invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub entrypoint: String,
    pub arguments: Arguments,
}

/// Shared log of entrypoint invocations.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, entrypoint: &str, arguments: Arguments) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Call {
                entrypoint: entrypoint.to_string(),
                arguments,
            });
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<Call> {
        self.calls().pop()
    }
}

/// An entrypoint that records its arguments under `label` and returns the
/// label as a string.
pub fn recording(label: &str, parameters: Vec<Parameter>, log: &CallLog) -> Entrypoint {
    let log = log.clone();
    let tag = label.to_string();
    Entrypoint::new(ENTRYPOINT, move |arguments| {
        log.record(&tag, arguments);
        Ok(Value::from(tag.as_str()))
    })
    .with_params(parameters)
}

/// The sample `prog` package tree; every entrypoint records into `log`.
pub fn sample_registry(log: &CallLog) -> Result<Registry> {
    let registry = Registry::new()
        .with_module(
            Module::package("prog")
                .with_doc("Sample program.")
                .with_entrypoint(recording("prog", vec![], log)),
        )?
        .with_module(
            Module::new("prog.foo")
                .with_doc("Foo module.")
                .with_entrypoint(recording(
                    "prog.foo",
                    vec![Parameter::positional_only("pos", TypeExpr::Int)],
                    log,
                )),
        )?
        .with_module(Module::new("prog._bar").with_entrypoint(recording(
            "prog._bar",
            vec![Parameter::positional_only("pos", TypeExpr::Int).with_default(42)],
            log,
        )))?
        .with_module(
            Module::package("prog.baz")
                .with_doc("Baz package.")
                .with_entrypoint(recording(
                    "prog.baz",
                    vec![Parameter::positional_or_keyword("pos_or_kwd", TypeExpr::Str)],
                    log,
                )),
        )?
        .with_module(Module::new("prog.baz.qux").with_entrypoint(recording(
            "prog.baz.qux",
            vec![Parameter::positional_or_keyword("pos_or_kwd", TypeExpr::Str).with_default("hi")],
            log,
        )))?
        .with_module(Module::new("prog.docs").with_doc("Documentation only."))?;
    Ok(registry)
}

/// A package whose subtree contains unbounded-arity entrypoints.
pub fn variadic_registry(log: &CallLog) -> Result<Registry> {
    let registry = Registry::new()
        .with_module(Module::package("prog").with_entrypoint(recording("prog", vec![], log)))?
        .with_module(Module::package("prog.quux").with_entrypoint(recording(
            "prog.quux",
            vec![Parameter::var_positional("args", TypeExpr::list(TypeExpr::Int))],
            log,
        )))?
        .with_module(Module::new("prog.quux.corge").with_entrypoint(recording(
            "prog.quux.corge",
            vec![Parameter::var_keyword("kwargs", TypeExpr::dict(TypeExpr::Str, TypeExpr::Int))],
            log,
        )))?;
    Ok(registry)
}

/// `f(a: int, /, b: int, c: int = 1, *, d: float, e: float = 2.0)`.
pub fn surface_parameters() -> Vec<Parameter> {
    vec![
        Parameter::positional_only("a", TypeExpr::Int),
        Parameter::positional_or_keyword("b", TypeExpr::Int),
        Parameter::positional_or_keyword("c", TypeExpr::Int).with_default(1),
        Parameter::keyword_only("d", TypeExpr::Float),
        Parameter::keyword_only("e", TypeExpr::Float).with_default(2.0),
    ]
}

/// `entrypoint(a: int, /, b: str, c: bool = True, *, d: float)`.
pub fn typed_parameters() -> Vec<Parameter> {
    vec![
        Parameter::positional_only("a", TypeExpr::Int),
        Parameter::positional_or_keyword("b", TypeExpr::Str),
        Parameter::positional_or_keyword("c", TypeExpr::Bool).with_default(true),
        Parameter::keyword_only("d", TypeExpr::Float),
    ]
}

/// A single non-package module named `prog` holding `entrypoint`.
pub fn single_module(entrypoint: Entrypoint) -> Result<(Registry, Arc<Module>)> {
    let mut registry = Registry::new();
    let module = registry.register(Module::new("prog").with_entrypoint(entrypoint))?;
    Ok((registry, module))
}
