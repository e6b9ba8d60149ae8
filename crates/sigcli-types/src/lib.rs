pub mod error;
pub mod parameter;
pub mod type_expr;
pub mod value;

pub use error::{CoercionError, Error, LiteralError, Result};
pub use parameter::{Annotation, DeclaredKind, Parameter, ParameterKind, ParameterSpec};
pub use type_expr::{OpaqueType, TypeExpr};
pub use value::{CustomValue, Dict, Value, ValueKind, format_float};
