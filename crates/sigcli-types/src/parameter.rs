use crate::type_expr::TypeExpr;
use crate::value::Value;
use std::fmt;

/// Parameter kind as declared on a callable, including the two unbounded
/// kinds that a command line surface cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeclaredKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

impl DeclaredKind {
    pub fn is_variadic(&self) -> bool {
        matches!(self, DeclaredKind::VarPositional | DeclaredKind::VarKeyword)
    }

    pub fn is_positional(&self) -> bool {
        matches!(
            self,
            DeclaredKind::PositionalOnly | DeclaredKind::PositionalOrKeyword
        )
    }
}

impl fmt::Display for DeclaredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclaredKind::PositionalOnly => "POSITIONAL_ONLY",
            DeclaredKind::PositionalOrKeyword => "POSITIONAL_OR_KEYWORD",
            DeclaredKind::VarPositional => "VAR_POSITIONAL",
            DeclaredKind::KeywordOnly => "KEYWORD_ONLY",
            DeclaredKind::VarKeyword => "VAR_KEYWORD",
        };
        f.write_str(name)
    }
}

/// Parameter kind of an extracted [`ParameterSpec`]. Unbounded kinds are
/// rejected during extraction and never represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    PositionalOnly,
    PositionalOrKeyword,
    KeywordOnly,
}

impl From<ParameterKind> for DeclaredKind {
    fn from(kind: ParameterKind) -> Self {
        match kind {
            ParameterKind::PositionalOnly => DeclaredKind::PositionalOnly,
            ParameterKind::PositionalOrKeyword => DeclaredKind::PositionalOrKeyword,
            ParameterKind::KeywordOnly => DeclaredKind::KeywordOnly,
        }
    }
}

/// A declared annotation, optionally wrapped with a help string.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Plain(TypeExpr),
    Annotated(TypeExpr, String),
}

impl Annotation {
    pub fn annotated(ty: TypeExpr, metadata: impl Into<String>) -> Self {
        Annotation::Annotated(ty, metadata.into())
    }

    /// Split into the carried type and the attached metadata, if any.
    pub fn into_parts(self) -> (TypeExpr, Option<String>) {
        match self {
            Annotation::Plain(ty) => (ty, None),
            Annotation::Annotated(ty, metadata) => (ty, Some(metadata)),
        }
    }
}

impl From<TypeExpr> for Annotation {
    fn from(ty: TypeExpr) -> Self {
        Annotation::Plain(ty)
    }
}

/// A parameter as registered on an entrypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub kind: DeclaredKind,
    pub annotation: Annotation,
    pub default: Option<Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: DeclaredKind, annotation: impl Into<Annotation>) -> Self {
        Self {
            name: name.into(),
            kind,
            annotation: annotation.into(),
            default: None,
        }
    }

    pub fn positional_only(name: impl Into<String>, annotation: impl Into<Annotation>) -> Self {
        Self::new(name, DeclaredKind::PositionalOnly, annotation)
    }

    pub fn positional_or_keyword(
        name: impl Into<String>,
        annotation: impl Into<Annotation>,
    ) -> Self {
        Self::new(name, DeclaredKind::PositionalOrKeyword, annotation)
    }

    pub fn keyword_only(name: impl Into<String>, annotation: impl Into<Annotation>) -> Self {
        Self::new(name, DeclaredKind::KeywordOnly, annotation)
    }

    pub fn var_positional(name: impl Into<String>, annotation: impl Into<Annotation>) -> Self {
        Self::new(name, DeclaredKind::VarPositional, annotation)
    }

    pub fn var_keyword(name: impl Into<String>, annotation: impl Into<Annotation>) -> Self {
        Self::new(name, DeclaredKind::VarKeyword, annotation)
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Extracted, immutable description of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    pub annotation: TypeExpr,
    pub default: Option<Value>,
    pub help_text: Option<String>,
}

impl ParameterSpec {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Long flag spelling: underscores become hyphens.
    pub fn flag_name(&self) -> String {
        self.name.replace('_', "-")
    }
}
