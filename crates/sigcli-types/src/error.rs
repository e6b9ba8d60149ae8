use crate::parameter::DeclaredKind;
use crate::type_expr::TypeExpr;
use crate::value::Value;
use std::fmt;

/// Result type for sigcli-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by signature extraction and value coercion
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A value's structure does not fit the declared type
    Coercion(CoercionError),

    /// A command line token is not a valid literal
    Literal(LiteralError),

    /// Unbounded positional or keyword parameter
    UnsupportedKind {
        parameter: String,
        kind: DeclaredKind,
    },

    /// Declaration that no command line surface can be derived from
    InvalidSignature(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Coercion(err) => write!(f, "Coercion error: {}", err),
            Error::Literal(err) => write!(f, "Literal error: {}", err),
            Error::UnsupportedKind { parameter, kind } => write!(
                f,
                "Unsupported parameter kind: {} has kind {}",
                parameter, kind
            ),
            Error::InvalidSignature(msg) => write!(f, "Invalid signature: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Coercion(err) => Some(err),
            Error::Literal(err) => Some(err),
            Error::UnsupportedKind { .. } | Error::InvalidSignature(_) => None,
        }
    }
}

impl From<CoercionError> for Error {
    fn from(err: CoercionError) -> Self {
        Error::Coercion(err)
    }
}

impl From<LiteralError> for Error {
    fn from(err: LiteralError) -> Self {
        Error::Literal(err)
    }
}

/// Names the offending value (rendered with `repr`) and the target type.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionError {
    pub value: String,
    pub target: String,
    pub reason: Option<String>,
}

impl CoercionError {
    pub fn new(value: &Value, target: &TypeExpr) -> Self {
        Self {
            value: value.repr(),
            target: target.to_string(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot coerce {} to {}", self.value, self.target)?;
        if let Some(reason) = &self.reason {
            write!(f, ": {}", reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for CoercionError {}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralError {
    pub input: String,
    pub message: String,
}

impl LiteralError {
    pub fn new(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed literal {:?}: {}", self.input, self.message)
    }
}

impl std::error::Error for LiteralError {}
