use crate::options::BuildOptions;
use crate::surface::{negation_id, render_command};
use crate::tree::{CommandNode, Target};
use crate::{Error, Result};
use clap::parser::ValueSource;
use clap::{ArgMatches, Command};
use sigcli_core::{Arguments, Entrypoint, Handler, describe_signature};
use sigcli_types::{ParameterKind, Value};
use std::ffi::OsString;
use std::sync::Arc;
use tracing::debug;

/// Result of matching a command line against the tree: the selected
/// subcommand path, its target, and one value per bound parameter.
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    pub path: Vec<String>,
    pub target: Target,
    pub values: Vec<(String, Value)>,
}

impl ParsedArgs {
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Parses command lines against a built tree and invokes the selected
/// entrypoint. Holds no state between runs.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tree: Arc<CommandNode>,
    command: Command,
}

impl Dispatcher {
    pub fn new(tree: CommandNode, options: &BuildOptions) -> Self {
        let command = render_command(&tree, options);
        Self {
            tree: Arc::new(tree),
            command,
        }
    }

    pub fn tree(&self) -> &CommandNode {
        &self.tree
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Parse, then invoke exactly one entrypoint (or print help).
    pub fn run<I, T>(&self, args: I) -> Result<Value>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let parsed = self.parse(args)?;
        self.execute(parsed)
    }

    /// Match `args` (without the program name) against the tree. Every token
    /// is converted here; a conversion failure aborts before any dispatch.
    pub fn parse<I, T>(&self, args: I) -> Result<ParsedArgs>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv = std::iter::once(OsString::from(self.command.get_name()))
            .chain(args.into_iter().map(Into::into));
        let matches = self.command.clone().try_get_matches_from(argv)?;

        let mut node = self.tree.as_ref();
        let mut current = &matches;
        let mut path = Vec::new();
        while let Some((name, sub_matches)) = current.subcommand() {
            node = node
                .child(name)
                .ok_or_else(|| Error::ModuleNotFound(name.to_string()))?;
            path.push(name.to_string());
            current = sub_matches;
        }
        debug!(path = ?path, "resolved subcommand");

        let values = node
            .parameters
            .iter()
            .map(|spec| {
                let value = match current.value_source(&spec.name) {
                    Some(ValueSource::CommandLine) => current
                        .get_one::<Value>(&spec.name)
                        .cloned()
                        .unwrap_or(Value::None),
                    _ if is_negated(current, &spec.name) => Value::Bool(false),
                    _ => spec.default.clone().unwrap_or(Value::None),
                };
                (spec.name.clone(), value)
            })
            .collect();

        Ok(ParsedArgs {
            path,
            target: node.target.clone(),
            values,
        })
    }

    /// Invoke the parsed target. Async entrypoints run to completion on a
    /// dedicated runtime before returning.
    pub fn execute(&self, parsed: ParsedArgs) -> Result<Value> {
        let entrypoint = match &parsed.target {
            Target::Help => {
                self.print_help(&parsed.path)?;
                return Ok(Value::None);
            }
            Target::Entrypoint(entrypoint) => entrypoint.clone(),
        };

        let mut arguments = Arguments::new();
        for spec in describe_signature(&entrypoint)? {
            let value = parsed
                .value(&spec.name)
                .cloned()
                .or(spec.default)
                .unwrap_or(Value::None);
            match spec.kind {
                ParameterKind::PositionalOnly => arguments.push_positional(value),
                ParameterKind::PositionalOrKeyword | ParameterKind::KeywordOnly => {
                    arguments.push_keyword(spec.name, value)
                }
            }
        }

        debug!(entrypoint = entrypoint.name(), "invoking");
        invoke(&entrypoint, arguments)
    }

    /// Help text of the node at `path`.
    pub fn render_help<S: AsRef<str>>(&self, path: &[S]) -> Result<String> {
        let mut command = self.command_at(path)?;
        Ok(command.render_help().to_string())
    }

    pub fn print_help<S: AsRef<str>>(&self, path: &[S]) -> Result<()> {
        let mut command = self.command_at(path)?;
        command.print_help()?;
        Ok(())
    }

    fn command_at<S: AsRef<str>>(&self, path: &[S]) -> Result<Command> {
        let mut command = self.command.clone();
        command.build();
        let mut current = &mut command;
        for name in path {
            let name = name.as_ref();
            current = current
                .find_subcommand_mut(name)
                .ok_or_else(|| Error::ModuleNotFound(name.to_string()))?;
        }
        Ok(current.clone())
    }
}

fn is_negated(matches: &ArgMatches, id: &str) -> bool {
    matches
        .try_get_one::<bool>(&negation_id(id))
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

fn invoke(entrypoint: &Entrypoint, arguments: Arguments) -> Result<Value> {
    match entrypoint.handler() {
        Handler::Sync(handler) => handler(arguments).map_err(Error::Entrypoint),
        Handler::Async(handler) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime
                .block_on(handler(arguments))
                .map_err(Error::Entrypoint)
        }
    }
}
