/// Options controlling how a command tree is built and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Walk the declaring package's submodules and expose them as subcommands
    pub submodules: bool,

    /// Add a `--no-<flag>` switch for boolean flags with a default
    pub negatable_bools: bool,

    /// Program name shown in usage; defaults to the root module's short name
    pub prog: Option<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            submodules: false,
            negatable_bools: true,
            prog: None,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submodules(mut self, enabled: bool) -> Self {
        self.submodules = enabled;
        self
    }

    pub fn negatable_bools(mut self, enabled: bool) -> Self {
        self.negatable_bools = enabled;
        self
    }

    pub fn prog(mut self, prog: impl Into<String>) -> Self {
        self.prog = Some(prog.into());
        self
    }
}
