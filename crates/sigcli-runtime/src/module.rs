use crate::{Error, Result};
use sigcli_core::Entrypoint;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A unit of entrypoint registration, identified by a dotted qualified name.
/// Packages may contain submodules; plain modules may not.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    doc: Option<String>,
    package: bool,
    entrypoints: BTreeMap<String, Arc<Entrypoint>>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            package: false,
            entrypoints: BTreeMap::new(),
        }
    }

    pub fn package(name: impl Into<String>) -> Self {
        Self {
            package: true,
            ..Self::new(name)
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Define an entrypoint on this module under its own name.
    pub fn with_entrypoint(mut self, entrypoint: Entrypoint) -> Self {
        self.entrypoints
            .insert(entrypoint.name().to_string(), Arc::new(entrypoint));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last segment of the qualified name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(parent, _)| parent)
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn is_package(&self) -> bool {
        self.package
    }

    pub fn get_attr(&self, name: &str) -> Option<Arc<Entrypoint>> {
        self.entrypoints.get(name).cloned()
    }

    /// Like [`Module::get_attr`], failing when the entrypoint is absent.
    pub fn entrypoint(&self, name: &str) -> Result<Arc<Entrypoint>> {
        self.get_attr(name).ok_or_else(|| Error::EntrypointNotFound {
            module: self.name.clone(),
            name: name.to_string(),
        })
    }
}
