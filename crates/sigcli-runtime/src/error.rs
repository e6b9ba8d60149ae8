use std::fmt;

/// Result type for sigcli-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or running a CLI
#[derive(Debug)]
pub enum Error {
    /// Signature extraction or value conversion failed
    Types(sigcli_types::Error),

    /// No module registered under the qualified name
    ModuleNotFound(String),

    /// Module does not define the requested entrypoint
    EntrypointNotFound { module: String, name: String },

    /// Invalid module registration
    Registry(String),

    /// Command line rejected by the parser (includes help display requests)
    Parse(clap::Error),

    /// The invoked entrypoint returned an error
    Entrypoint(anyhow::Error),

    /// IO operation failed
    Io(std::io::Error),
}

impl Error {
    /// True when the parser stopped to display help rather than on bad input.
    pub fn is_display_request(&self) -> bool {
        matches!(
            self,
            Error::Parse(err) if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            )
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Types(err) => write!(f, "{}", err),
            Error::ModuleNotFound(name) => write!(f, "Module not found: {}", name),
            Error::EntrypointNotFound { module, name } => {
                write!(f, "Entrypoint not found: {} has no `{}`", module, name)
            }
            Error::Registry(msg) => write!(f, "Registry error: {}", msg),
            Error::Parse(err) => write!(f, "{}", err),
            Error::Entrypoint(err) => write!(f, "Entrypoint failed: {:#}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Types(err) => Some(err),
            Error::Parse(err) => Some(err),
            Error::Entrypoint(err) => Some(&**err),
            Error::Io(err) => Some(err),
            Error::ModuleNotFound(_) | Error::EntrypointNotFound { .. } | Error::Registry(_) => None,
        }
    }
}

impl From<sigcli_types::Error> for Error {
    fn from(err: sigcli_types::Error) -> Self {
        Error::Types(err)
    }
}

impl From<clap::Error> for Error {
    fn from(err: clap::Error) -> Self {
        Error::Parse(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
