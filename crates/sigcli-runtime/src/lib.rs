// Runtime layer: turns registered modules into a command tree, renders it
// with clap and dispatches parsed command lines to entrypoints.

pub mod builder;
pub mod error;
pub mod executor;
pub mod module;
pub mod options;
pub mod provider;
pub mod surface;
pub mod tree;

pub use builder::{SELF_COMMAND, build_tree};
pub use error::{Error, Result};
pub use executor::{Dispatcher, ParsedArgs};
pub use module::Module;
pub use options::BuildOptions;
pub use provider::{ModuleProvider, Registry};
pub use surface::{ArgShape, ArgSurface, CoercingValueParser, derive_surface, render_command};
pub use tree::{CommandNode, Target};
