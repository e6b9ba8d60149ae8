use sigcli_core::Entrypoint;
use sigcli_types::ParameterSpec;
use std::sync::Arc;

/// What a node does when it is the deepest one selected on the command line.
#[derive(Debug, Clone)]
pub enum Target {
    /// Print this node's help and return `None`
    Help,
    Entrypoint(Arc<Entrypoint>),
}

impl Target {
    pub fn entrypoint(&self) -> Option<&Arc<Entrypoint>> {
        match self {
            Target::Help => None,
            Target::Entrypoint(entrypoint) => Some(entrypoint),
        }
    }
}

/// One (sub)command of the generated CLI. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct CommandNode {
    pub name: String,
    pub help: Option<String>,
    pub hidden: bool,
    pub target: Target,
    pub parameters: Vec<ParameterSpec>,
    pub children: Vec<CommandNode>,
}

impl CommandNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            hidden: false,
            target: Target::Help,
            parameters: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Follow a subcommand path from this node.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&CommandNode> {
        path.iter()
            .try_fold(self, |node, name| node.child(name.as_ref()))
    }

    /// Names shown in the subcommand listing.
    pub fn visible_children(&self) -> impl Iterator<Item = &str> {
        self.children
            .iter()
            .filter(|child| !child.hidden)
            .map(|child| child.name.as_str())
    }
}
