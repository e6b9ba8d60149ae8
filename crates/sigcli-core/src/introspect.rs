use crate::entrypoint::Entrypoint;
use sigcli_types::{DeclaredKind, Error, Parameter, ParameterKind, ParameterSpec, Result};
use std::collections::HashSet;

/// Extract an ordered list of parameter specs from an entrypoint.
pub fn describe_signature(entrypoint: &Entrypoint) -> Result<Vec<ParameterSpec>> {
    describe_parameters(entrypoint.parameters())
}

/// Validate declared parameters and convert them to specs, in declaration
/// order. Unbounded kinds fail the whole extraction.
pub fn describe_parameters(parameters: &[Parameter]) -> Result<Vec<ParameterSpec>> {
    let mut seen = HashSet::new();
    let mut previous_kind: Option<DeclaredKind> = None;
    let mut positional_default = false;
    let mut specs = Vec::with_capacity(parameters.len());

    for parameter in parameters {
        let name = parameter.name.as_str();
        if !is_identifier(name) {
            return Err(Error::InvalidSignature(format!(
                "{:?} is not a valid parameter name",
                name
            )));
        }
        if name == "help" {
            return Err(Error::InvalidSignature(
                "parameter name `help` collides with the help flag".to_string(),
            ));
        }
        if !seen.insert(name) {
            return Err(Error::InvalidSignature(format!(
                "duplicate parameter `{}`",
                name
            )));
        }
        if previous_kind.is_some_and(|previous| parameter.kind < previous) {
            return Err(Error::InvalidSignature(format!(
                "parameter `{}` ({}) declared out of order",
                name, parameter.kind
            )));
        }
        previous_kind = Some(parameter.kind);

        let kind = match parameter.kind {
            DeclaredKind::PositionalOnly => ParameterKind::PositionalOnly,
            DeclaredKind::PositionalOrKeyword => ParameterKind::PositionalOrKeyword,
            DeclaredKind::KeywordOnly => ParameterKind::KeywordOnly,
            kind @ (DeclaredKind::VarPositional | DeclaredKind::VarKeyword) => {
                return Err(Error::UnsupportedKind {
                    parameter: name.to_string(),
                    kind,
                });
            }
        };

        if parameter.kind.is_positional() {
            if parameter.default.is_some() {
                positional_default = true;
            } else if positional_default {
                return Err(Error::InvalidSignature(format!(
                    "non-default parameter `{}` follows a default parameter",
                    name
                )));
            }
        }

        let (annotation, help_text) = parameter.annotation.clone().into_parts();
        specs.push(ParameterSpec {
            name: name.to_string(),
            kind,
            annotation,
            default: parameter.default.clone(),
            help_text,
        });
    }

    Ok(specs)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
