use crate::error::Result;
use sigcli_core::Entrypoint;
use sigcli_runtime::{
    BuildOptions, CommandNode, Dispatcher, Module, ModuleProvider, ParsedArgs, Registry, build_tree,
};
use sigcli_types::Value;
use std::ffi::OsString;
use std::sync::Arc;
use tracing::debug;

/// Decorator configuration. Building a [`Cli`] validates every reachable
/// entrypoint up front; no partially built CLI is ever returned.
#[derive(Debug, Clone, Default)]
pub struct CliBuilder {
    options: BuildOptions,
}

/// The default decorator: a single command, no submodule walk.
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

impl CliBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose the declaring package's submodules as subcommands.
    pub fn submodules(mut self, enabled: bool) -> Self {
        self.options = self.options.submodules(enabled);
        self
    }

    pub fn negatable_bools(mut self, enabled: bool) -> Self {
        self.options = self.options.negatable_bools(enabled);
        self
    }

    pub fn prog(mut self, prog: impl Into<String>) -> Self {
        self.options = self.options.prog(prog);
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Decorate the entrypoint `entrypoint` of module `module`, both resolved
    /// through `provider`. Submodules are looked up for entrypoints of the
    /// same name.
    pub fn decorate(
        &self,
        provider: &dyn ModuleProvider,
        module: &str,
        entrypoint: &str,
    ) -> Result<Cli> {
        let module = provider.import(module)?;
        self.decorate_module(provider, module, entrypoint)
    }

    pub fn decorate_module(
        &self,
        provider: &dyn ModuleProvider,
        module: Arc<Module>,
        entrypoint: &str,
    ) -> Result<Cli> {
        let entrypoint = module.entrypoint(entrypoint)?;
        let tree = build_tree(provider, module.clone(), entrypoint.clone(), &self.options)?;
        debug!(
            module = module.name(),
            subcommands = tree.children.len(),
            "built command tree"
        );
        Ok(Cli {
            dispatcher: Dispatcher::new(tree, &self.options),
            entrypoint,
        })
    }

    /// Decorate a standalone entrypoint. It is placed in an implicit module
    /// named after the program (or the entrypoint, without a program name).
    pub fn decorate_entrypoint(&self, entrypoint: Entrypoint) -> Result<Cli> {
        let name = self
            .options
            .prog
            .clone()
            .unwrap_or_else(|| entrypoint.name().to_string());
        let entrypoint_name = entrypoint.name().to_string();

        let mut registry = Registry::new();
        let module = registry.register(Module::new(name).with_entrypoint(entrypoint))?;
        self.decorate_module(&registry, module, &entrypoint_name)
    }
}

/// A decorated entrypoint with its generated command line.
#[derive(Debug, Clone)]
pub struct Cli {
    dispatcher: Dispatcher,
    entrypoint: Arc<Entrypoint>,
}

impl Cli {
    /// Parse `args` (without the program name) and return the selected
    /// entrypoint's result. The selected entrypoint may belong to a
    /// submodule rather than the decorated one.
    pub fn run<I, T>(&self, args: I) -> Result<Value>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.dispatcher.run(args)
    }

    /// [`Cli::run`] over the process arguments, skipping the program name.
    pub fn run_env(&self) -> Result<Value> {
        self.run(std::env::args_os().skip(1))
    }

    pub fn parse<I, T>(&self, args: I) -> Result<ParsedArgs>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.dispatcher.parse(args)
    }

    pub fn render_help<S: AsRef<str>>(&self, path: &[S]) -> Result<String> {
        self.dispatcher.render_help(path)
    }

    pub fn tree(&self) -> &CommandNode {
        self.dispatcher.tree()
    }

    pub fn command(&self) -> &clap::Command {
        self.dispatcher.command()
    }

    /// The decorated entrypoint.
    pub fn entrypoint(&self) -> &Entrypoint {
        &self.entrypoint
    }
}
