//! Command line surface of a command tree.
//!
//! Parameter specs are first mapped to a parser-independent [`ArgSurface`]
//! description, which is then rendered into `clap` arguments. Each value
//! taking argument converts its token through [`CoercingValueParser`].
//!
//! | parameter                              | surface                         |
//! |----------------------------------------|---------------------------------|
//! | positional-only                        | positional, required unless it has a default |
//! | positional-or-keyword without default  | required positional             |
//! | positional-or-keyword with default     | optional `--flag [VALUE]`       |
//! | keyword-only                           | `--flag [VALUE]`, required without default |

use crate::options::BuildOptions;
use crate::tree::CommandNode;
use clap::builder::TypedValueParser;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use sigcli_core::convert_token;
use sigcli_types::{ParameterKind, ParameterSpec, TypeExpr, Value};
use std::collections::HashSet;
use std::ffi::OsStr;

/// Token supplied for a bare boolean flag.
const BARE_BOOL_TOKEN: &str = "True";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    Positional,
    Flag,
}

/// Parser-independent description of one generated argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSurface {
    /// Parameter name; also the parser's argument id
    pub id: String,
    pub shape: ArgShape,
    /// Long flag name without leading dashes
    pub long: Option<String>,
    pub value_name: String,
    pub required: bool,
    pub default: Option<Value>,
    pub help: Option<String>,
    /// Long name of the `--no-<flag>` switch, if generated
    pub negation: Option<String>,
    pub annotation: TypeExpr,
}

impl ArgSurface {
    pub fn is_flag(&self) -> bool {
        self.shape == ArgShape::Flag
    }
}

/// Argument id of the negation switch for parameter `id`.
pub fn negation_id(id: &str) -> String {
    format!("no-{}", id)
}

/// Map parameter specs to argument descriptions, in declaration order.
pub fn derive_surface(specs: &[ParameterSpec], options: &BuildOptions) -> Vec<ArgSurface> {
    let flag_names: HashSet<String> = specs
        .iter()
        .filter(|spec| renders_as_flag(spec))
        .map(ParameterSpec::flag_name)
        .collect();

    specs
        .iter()
        .map(|spec| {
            let shape = if renders_as_flag(spec) {
                ArgShape::Flag
            } else {
                ArgShape::Positional
            };
            let long = (shape == ArgShape::Flag).then(|| spec.flag_name());
            let negation = long.as_ref().and_then(|long| {
                let negated = format!("no-{}", long);
                let wanted = options.negatable_bools
                    && spec.annotation.is_bool()
                    && spec.has_default()
                    && !flag_names.contains(&negated);
                wanted.then_some(negated)
            });
            let value_name = match shape {
                ArgShape::Positional => spec.name.clone(),
                ArgShape::Flag => spec.name.to_uppercase(),
            };

            ArgSurface {
                id: spec.name.clone(),
                shape,
                long,
                value_name,
                required: !spec.has_default(),
                default: spec.default.clone(),
                help: help_text(spec),
                negation,
                annotation: spec.annotation.clone(),
            }
        })
        .collect()
}

fn renders_as_flag(spec: &ParameterSpec) -> bool {
    match spec.kind {
        ParameterKind::PositionalOnly => false,
        ParameterKind::PositionalOrKeyword => spec.has_default(),
        ParameterKind::KeywordOnly => true,
    }
}

/// Attached metadata first, then `Default: <value>`.
fn help_text(spec: &ParameterSpec) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(text) = &spec.help_text {
        parts.push(text.clone());
    }
    if let Some(default) = &spec.default {
        parts.push(format!("Default: {}", default));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Render the whole tree as a `clap` command.
pub fn render_command(node: &CommandNode, options: &BuildOptions) -> Command {
    let mut command = Command::new(node.name.clone())
        .disable_help_subcommand(true)
        .args_override_self(true)
        .hide(node.hidden);
    if let Some(help) = &node.help {
        command = command.about(help.clone());
    }

    for surface in derive_surface(&node.parameters, options) {
        command = command.args(render_args(&surface));
    }

    if !node.children.is_empty() {
        command = command
            .subcommand_help_heading("subcommands")
            .subcommand_value_name("{subcommand}")
            .subcommands(node.children.iter().map(|child| render_command(child, options)));
    }

    command
}

fn render_args(surface: &ArgSurface) -> Vec<Arg> {
    let mut arg = Arg::new(surface.id.clone())
        .value_name(surface.value_name.clone())
        .required(surface.required)
        .allow_negative_numbers(true)
        .value_parser(CoercingValueParser::new(surface.annotation.clone()));
    if let Some(help) = &surface.help {
        arg = arg.help(help.clone());
    }

    let Some(long) = &surface.long else {
        return vec![arg.action(ArgAction::Set)];
    };

    // Only flags with a default may appear without a value
    let arity = if surface.required { 1..=1 } else { 0..=1 };
    arg = arg.long(long.clone()).num_args(arity).action(ArgAction::Set);
    if !surface.required && surface.annotation.is_bool() {
        arg = arg.default_missing_value(BARE_BOOL_TOKEN);
    }

    let mut args = vec![arg];
    if let Some(negation) = &surface.negation {
        args.push(
            Arg::new(negation_id(&surface.id))
                .long(negation.clone())
                .action(ArgAction::SetTrue)
                .conflicts_with(surface.id.clone())
                .help(format!("Set {} to False", surface.value_name)),
        );
    }
    args
}

/// Converts a raw token to the parameter's declared type: literal reading
/// (except for `str`) followed by coercion.
#[derive(Debug, Clone)]
pub struct CoercingValueParser {
    annotation: TypeExpr,
}

impl CoercingValueParser {
    pub fn new(annotation: TypeExpr) -> Self {
        Self { annotation }
    }
}

impl TypedValueParser for CoercingValueParser {
    type Value = Value;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let token = value
            .to_str()
            .ok_or_else(|| clap::Error::new(ErrorKind::InvalidUtf8).with_cmd(cmd))?;

        convert_token(token, &self.annotation).map_err(|err| {
            let arg = arg
                .map(ToString::to_string)
                .unwrap_or_else(|| "...".to_string());
            clap::Error::raw(
                ErrorKind::ValueValidation,
                format!("invalid value '{}' for '{}': {}\n", token, arg, err),
            )
            .with_cmd(cmd)
        })
    }
}
