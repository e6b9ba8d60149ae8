use crate::module::Module;
use crate::options::BuildOptions;
use crate::provider::ModuleProvider;
use crate::tree::{CommandNode, Target};
use crate::Result;
use sigcli_core::{Entrypoint, describe_signature};
use std::sync::Arc;
use tracing::{debug, trace};

/// Name of the synthetic child that calls a package's own entrypoint.
pub const SELF_COMMAND: &str = ".";

struct Draft {
    node: CommandNode,
    children: Vec<usize>,
}

impl Draft {
    fn new(name: impl Into<String>, help: Option<&str>) -> Self {
        let mut node = CommandNode::new(name);
        node.hidden = node.name.starts_with('_');
        node.help = help.map(str::to_string);
        Self {
            node,
            children: Vec::new(),
        }
    }
}

/// Build the command tree rooted at `entrypoint`, declared in `module`.
///
/// With `options.submodules` set and `module` a package, every reachable
/// submodule becomes a subcommand; submodules defining an entrypoint of the
/// same name are bound to it, the others print their help. Any entrypoint
/// with an unsupported signature fails the whole build.
pub fn build_tree(
    provider: &dyn ModuleProvider,
    module: Arc<Module>,
    entrypoint: Arc<Entrypoint>,
    options: &BuildOptions,
) -> Result<CommandNode> {
    let entry_name = entrypoint.name().to_string();
    let root_name = options
        .prog
        .clone()
        .unwrap_or_else(|| module.short_name().to_string());
    let root_help = entrypoint.doc().or(module.doc());

    let mut root = Draft::new(root_name, root_help);
    root.node.hidden = false;
    let mut drafts = vec![root];
    let mut worklist = vec![(0usize, module, Some(entrypoint))];

    while let Some((index, module, candidate)) = worklist.pop() {
        let mut bind_to = index;

        if options.submodules && module.is_package() {
            for short_name in provider.list_submodules(&module) {
                let qualified = format!("{}.{}", module.name(), short_name);
                let submodule = provider.import(&qualified)?;
                let sub_candidate = submodule.get_attr(&entry_name);
                let help = sub_candidate
                    .as_ref()
                    .and_then(|e| e.doc())
                    .or(submodule.doc());

                debug!(
                    module = %qualified,
                    bound = sub_candidate.is_some(),
                    "discovered submodule"
                );
                let child = push_child(&mut drafts, index, Draft::new(short_name, help));
                worklist.push((child, submodule, sub_candidate));
            }

            if let Some(entry) = &candidate {
                let help = entry.doc().or(module.doc());
                bind_to = push_child(&mut drafts, index, Draft::new(SELF_COMMAND, help));
            }
        }

        if let Some(entry) = candidate {
            let parameters = describe_signature(&entry)?;
            debug!(
                module = module.name(),
                entrypoint = entry.name(),
                parameters = parameters.len(),
                "bound entrypoint"
            );
            for spec in &parameters {
                trace!(parameter = %spec.name, annotation = %spec.annotation, "installing argument");
            }
            let node = &mut drafts[bind_to].node;
            node.target = Target::Entrypoint(entry);
            node.parameters = parameters;
        }
    }

    Ok(assemble(drafts))
}

fn push_child(drafts: &mut Vec<Draft>, parent: usize, child: Draft) -> usize {
    let index = drafts.len();
    drafts.push(child);
    drafts[parent].children.push(index);
    index
}

/// Children are always pushed after their parent, so folding in reverse index
/// order sees every child complete before its parent.
fn assemble(drafts: Vec<Draft>) -> CommandNode {
    let mut built: Vec<Option<CommandNode>> = Vec::with_capacity(drafts.len());
    let mut pending = Vec::with_capacity(drafts.len());
    for draft in drafts {
        pending.push(draft.children);
        built.push(Some(draft.node));
    }

    for index in (0..built.len()).rev() {
        let children: Vec<CommandNode> = pending[index]
            .iter()
            .filter_map(|child| built[*child].take())
            .collect();
        if let Some(node) = built[index].as_mut() {
            node.children = children;
        }
    }

    built
        .into_iter()
        .next()
        .flatten()
        .unwrap_or_else(|| CommandNode::new(""))
}
