//! sigcli-sdk: command line interfaces from function signatures.
//!
//! # Overview
//!
//! Register entrypoints with their parameter declarations, decorate one of
//! them, and get a parser whose positionals, flags and subcommands follow the
//! declarations. Command line tokens are read as literals and coerced to the
//! declared types before the entrypoint is called.
//!
//! # Quickstart
//!
//! ```no_run
//! use sigcli_sdk::{cli, Entrypoint, Parameter, TypeExpr, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let greet = Entrypoint::new("greet", |args| {
//!     let name: String = args.arg(0)?;
//!     let times: i64 = args.kwarg("times")?;
//!     Ok(Value::from(format!("hello {}", name).repeat(usize::try_from(times)?)))
//! })
//! .with_param(Parameter::positional_only("name", TypeExpr::Str))
//! .with_param(Parameter::keyword_only("times", TypeExpr::Int).with_default(1));
//!
//! let app = cli().decorate_entrypoint(greet)?;
//! let result = app.run(["world", "--times", "2"])?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```
//!
//! # Subcommands from a module tree
//!
//! ```no_run
//! use sigcli_sdk::{CliBuilder, Entrypoint, Module, Registry, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let main = || Entrypoint::new("entrypoint", |_| Ok(Value::None));
//! let registry = Registry::new()
//!     .with_module(Module::package("prog").with_entrypoint(main()))?
//!     .with_module(Module::new("prog.foo").with_entrypoint(main()))?
//!     .with_module(Module::new("prog._internal").with_entrypoint(main()))?;
//!
//! // prog {., foo}; `_internal` is hidden from the listing but dispatchable
//! let app = CliBuilder::new()
//!     .submodules(true)
//!     .decorate(&registry, "prog", "entrypoint")?;
//! app.run_env()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! This SDK acts as a facade over:
//! - `sigcli-types`: values, type expressions, parameter declarations
//! - `sigcli-core`: literal reader, coercion engine, signature introspection
//! - `sigcli-runtime`: module registry, tree builder, clap rendering, dispatch

pub mod cli;
pub mod error;

pub use cli::{Cli, CliBuilder, cli};
pub use error::{Error, Result};

// Re-export the registration and value types needed to declare entrypoints
pub use sigcli_core::{Arguments, Entrypoint, FromValue, Handler};
pub use sigcli_runtime::{BuildOptions, CommandNode, Module, ModuleProvider, ParsedArgs, Registry, Target};
pub use sigcli_types::{
    Annotation, DeclaredKind, Dict, OpaqueType, Parameter, ParameterKind, ParameterSpec, TypeExpr,
    Value,
};

/// Lower level building blocks.
pub mod types {
    pub use sigcli_core::{coerce, convert_token, describe_signature, read_literal};
    pub use sigcli_types::{CoercionError, CustomValue, LiteralError, ValueKind, format_float};
}
