use crate::module::Module;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Module discovery and loading.
///
/// Responsibilities:
/// - List the immediate submodules of a package, by short name
/// - Resolve a fully qualified name to a loaded module
pub trait ModuleProvider: Send + Sync {
    /// Short names of `module`'s immediate submodules. Empty for non-packages.
    fn list_submodules(&self, module: &Module) -> Vec<String>;

    /// Load a module by its dotted qualified name.
    fn import(&self, qualified_name: &str) -> Result<Arc<Module>>;
}

/// Static registration table of modules keyed by qualified name.
///
/// A module may only be registered once its parent is registered as a
/// package, so the table always describes a single rooted tree per top-level
/// name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules: BTreeMap<String, Arc<Module>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: Module) -> Result<Arc<Module>> {
        let name = module.name();
        if name.split('.').any(|segment| segment.is_empty()) {
            return Err(Error::Registry(format!("invalid module name {:?}", name)));
        }
        if self.modules.contains_key(name) {
            return Err(Error::Registry(format!("module {} already registered", name)));
        }
        if let Some(parent) = module.parent_name() {
            match self.modules.get(parent) {
                Some(p) if p.is_package() => {}
                Some(_) => {
                    return Err(Error::Registry(format!(
                        "cannot register {}: {} is not a package",
                        name, parent
                    )));
                }
                None => {
                    return Err(Error::Registry(format!(
                        "cannot register {}: parent {} is not registered",
                        name, parent
                    )));
                }
            }
        }

        let module = Arc::new(module);
        self.modules
            .insert(module.name().to_string(), module.clone());
        Ok(module)
    }

    /// Chaining form of [`Registry::register`].
    pub fn with_module(mut self, module: Module) -> Result<Self> {
        self.register(module)?;
        Ok(self)
    }

    pub fn get(&self, qualified_name: &str) -> Option<Arc<Module>> {
        self.modules.get(qualified_name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleProvider for Registry {
    fn list_submodules(&self, module: &Module) -> Vec<String> {
        if !module.is_package() {
            return Vec::new();
        }
        let prefix = format!("{}.", module.name());
        self.modules
            .range(prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(&prefix))
            .filter_map(|(name, _)| {
                let rest = &name[prefix.len()..];
                (!rest.contains('.')).then(|| rest.to_string())
            })
            .collect()
    }

    fn import(&self, qualified_name: &str) -> Result<Arc<Module>> {
        self.get(qualified_name)
            .ok_or_else(|| Error::ModuleNotFound(qualified_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Registry {
        Registry::new()
            .with_module(Module::package("prog"))
            .and_then(|r| r.with_module(Module::new("prog.foo")))
            .and_then(|r| r.with_module(Module::new("prog._bar")))
            .and_then(|r| r.with_module(Module::package("prog.baz")))
            .and_then(|r| r.with_module(Module::new("prog.baz.qux")))
            .and_then(|r| r.with_module(Module::new("program")))
            .unwrap()
    }

    #[test]
    fn test_lists_direct_children_sorted() {
        let registry = sample();
        let prog = registry.import("prog").unwrap();
        assert_eq!(registry.list_submodules(&prog), vec!["_bar", "baz", "foo"]);

        let baz = registry.import("prog.baz").unwrap();
        assert_eq!(registry.list_submodules(&baz), vec!["qux"]);

        let foo = registry.import("prog.foo").unwrap();
        assert!(registry.list_submodules(&foo).is_empty());
    }

    #[test]
    fn test_import_unknown_module() {
        assert!(matches!(
            sample().import("prog.missing"),
            Err(Error::ModuleNotFound(name)) if name == "prog.missing"
        ));
    }

    #[test]
    fn test_registration_rules() {
        let mut registry = sample();
        assert!(registry.register(Module::new("prog.foo")).is_err());
        assert!(registry.register(Module::new("prog.foo.deep")).is_err());
        assert!(registry.register(Module::new("other.child")).is_err());
        assert!(registry.register(Module::new("prog..x")).is_err());
        assert!(registry.register(Module::new("prog.new")).is_ok());
    }
}
