//! Custom assertions for command trees and recorded calls.

use crate::fixtures::{Call, CallLog};
use anyhow::{Context, Result};
use sigcli_runtime::{CommandNode, Target};
use sigcli_types::Value;

/// Assert the subcommand listing of the node at `path`.
pub fn assert_visible_children(root: &CommandNode, path: &[&str], expected: &[&str]) -> Result<()> {
    let node = root
        .find(path)
        .with_context(|| format!("No node at path {:?}", path))?;
    let visible: Vec<&str> = node.visible_children().collect();
    if visible != expected {
        anyhow::bail!(
            "Expected visible subcommands {:?} at {:?}, got {:?}",
            expected,
            path,
            visible
        );
    }
    Ok(())
}

/// Assert that the node at `path` is bound to an entrypoint.
pub fn assert_bound(root: &CommandNode, path: &[&str]) -> Result<()> {
    let node = root
        .find(path)
        .with_context(|| format!("No node at path {:?}", path))?;
    if let Target::Help = node.target {
        anyhow::bail!("Node at {:?} only prints help", path);
    }
    Ok(())
}

/// Assert the most recent call's label and arguments.
pub fn assert_last_call(
    log: &CallLog,
    entrypoint: &str,
    args: &[Value],
    kwargs: &[(&str, Value)],
) -> Result<()> {
    let Call {
        entrypoint: called,
        arguments,
    } = log.last().context("No entrypoint was invoked")?;

    if called != entrypoint {
        anyhow::bail!("Expected call to {}, got {}", entrypoint, called);
    }
    if arguments.args != args {
        anyhow::bail!("Expected positional {:?}, got {:?}", args, arguments.args);
    }
    let expected: Vec<(String, Value)> = kwargs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    if arguments.kwargs != expected {
        anyhow::bail!("Expected keywords {:?}, got {:?}", expected, arguments.kwargs);
    }
    Ok(())
}
