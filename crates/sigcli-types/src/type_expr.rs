use crate::value::{CustomValue, Value};
use std::fmt;
use std::sync::Arc;

/// Structural description of a parameter's declared type.
///
/// Drawn from a static declaration, so every expression is finite and acyclic.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Bool,
    Int,
    Float,
    Str,
    None,
    Union(Vec<TypeExpr>),
    List(Box<TypeExpr>),
    Set {
        element: Box<TypeExpr>,
        frozen: bool,
    },
    Dict(Box<TypeExpr>, Box<TypeExpr>),
    /// Fixed arity, one type per position. `Tuple(vec![])` is the empty tuple.
    Tuple(Vec<TypeExpr>),
    /// Any length, every element of the same type.
    VariadicTuple(Box<TypeExpr>),
    Opaque(OpaqueType),
}

impl TypeExpr {
    pub fn list(element: TypeExpr) -> Self {
        TypeExpr::List(Box::new(element))
    }

    pub fn set(element: TypeExpr) -> Self {
        TypeExpr::Set {
            element: Box::new(element),
            frozen: false,
        }
    }

    pub fn frozenset(element: TypeExpr) -> Self {
        TypeExpr::Set {
            element: Box::new(element),
            frozen: true,
        }
    }

    pub fn dict(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Dict(Box::new(key), Box::new(value))
    }

    pub fn tuple(elements: impl IntoIterator<Item = TypeExpr>) -> Self {
        TypeExpr::Tuple(elements.into_iter().collect())
    }

    pub fn variadic_tuple(element: TypeExpr) -> Self {
        TypeExpr::VariadicTuple(Box::new(element))
    }

    pub fn optional(inner: TypeExpr) -> Self {
        TypeExpr::union([inner, TypeExpr::None])
    }

    /// Build a union, flattening nested unions and dropping repeated members.
    /// A union with a single distinct member is that member.
    pub fn union(members: impl IntoIterator<Item = TypeExpr>) -> Self {
        let mut flat: Vec<TypeExpr> = Vec::new();
        let mut pending: Vec<TypeExpr> = members.into_iter().collect();
        pending.reverse();
        while let Some(member) = pending.pop() {
            match member {
                TypeExpr::Union(inner) => pending.extend(inner.into_iter().rev()),
                other if flat.contains(&other) => {}
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            TypeExpr::Union(flat)
        }
    }

    pub fn opaque(opaque: OpaqueType) -> Self {
        TypeExpr::Opaque(opaque)
    }

    /// True only for the bare string type; such parameters take their command
    /// line token verbatim instead of reading it as a literal.
    pub fn is_str(&self) -> bool {
        matches!(self, TypeExpr::Str)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, TypeExpr::Bool)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Bool => f.write_str("bool"),
            TypeExpr::Int => f.write_str("int"),
            TypeExpr::Float => f.write_str("float"),
            TypeExpr::Str => f.write_str("str"),
            TypeExpr::None => f.write_str("None"),
            TypeExpr::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            TypeExpr::List(element) => write!(f, "list[{}]", element),
            TypeExpr::Set {
                element,
                frozen: false,
            } => write!(f, "set[{}]", element),
            TypeExpr::Set {
                element,
                frozen: true,
            } => write!(f, "frozenset[{}]", element),
            TypeExpr::Dict(key, value) => write!(f, "dict[{}, {}]", key, value),
            TypeExpr::Tuple(elements) if elements.is_empty() => f.write_str("tuple[()]"),
            TypeExpr::Tuple(elements) => {
                f.write_str("tuple[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("]")
            }
            TypeExpr::VariadicTuple(element) => write!(f, "tuple[{}, ...]", element),
            TypeExpr::Opaque(opaque) => f.write_str(opaque.name()),
        }
    }
}

type Constructor = dyn Fn(Value) -> Result<Value, String> + Send + Sync;

/// A named custom type constructible from a single primitive or container
/// value.
#[derive(Clone)]
pub struct OpaqueType {
    name: Arc<str>,
    construct: Arc<Constructor>,
}

impl OpaqueType {
    /// Register a typed constructor. Successful results are wrapped in
    /// [`Value::Custom`] tagged with `name`.
    pub fn new<T, E, F>(name: &str, constructor: F) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
        E: fmt::Display,
        F: Fn(Value) -> Result<T, E> + Send + Sync + 'static,
    {
        let type_name: Arc<str> = Arc::from(name);
        let tag = type_name.clone();
        Self {
            name: type_name,
            construct: Arc::new(move |value| {
                constructor(value)
                    .map(|constructed| Value::Custom(CustomValue::new(tag.clone(), constructed)))
                    .map_err(|e| e.to_string())
            }),
        }
    }

    /// Register a constructor that produces a [`Value`] directly.
    pub fn from_fn<F>(name: &str, constructor: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            construct: Arc::new(constructor),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn construct(&self, value: Value) -> Result<Value, String> {
        (self.construct)(value)
    }
}

impl PartialEq for OpaqueType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for OpaqueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaqueType").field(&self.name).finish()
    }
}
