//! Coercion of literal values into their declared shape.

use crate::literal::read_literal;
use sigcli_types::{CoercionError, Dict, Result, TypeExpr, Value};

/// Convert `value` so that its structure matches `target`.
///
/// Primitives must already have the declared kind; containers are rebuilt
/// element by element; opaque types are constructed from the raw value.
/// Failures name the innermost offending value and type.
pub fn coerce(value: Value, target: &TypeExpr) -> std::result::Result<Value, CoercionError> {
    match (value, target) {
        (v @ Value::Bool(_), TypeExpr::Bool)
        | (v @ Value::Int(_), TypeExpr::Int)
        | (v @ Value::Float(_), TypeExpr::Float)
        | (v @ Value::Str(_), TypeExpr::Str)
        | (v @ Value::None, TypeExpr::None) => Ok(v),

        // Union members are never used to transform the value
        (value, TypeExpr::Union(members)) if members.iter().any(|m| is_member(&value, m)) => {
            Ok(value)
        }

        (Value::Dict(entries), TypeExpr::Dict(key_type, value_type)) => {
            let mut rebuilt = Dict::new();
            for (key, item) in entries {
                rebuilt.insert(coerce(key, key_type)?, coerce(item, value_type)?);
            }
            Ok(Value::Dict(rebuilt))
        }

        (Value::Set(items) | Value::FrozenSet(items), TypeExpr::Set { element, frozen: true }) => {
            Ok(Value::FrozenSet(coerce_all(items, element)?))
        }

        (Value::Set(items), TypeExpr::Set { element, frozen: false }) => {
            Ok(Value::Set(coerce_all(items, element)?))
        }

        (Value::List(items), TypeExpr::List(element)) => {
            Ok(Value::List(coerce_all(items, element)?))
        }

        (Value::Tuple(items), TypeExpr::VariadicTuple(element)) => {
            Ok(Value::Tuple(coerce_all(items, element)?))
        }

        (Value::Tuple(items), TypeExpr::Tuple(elements)) => {
            if items.len() != elements.len() {
                let reason = format!("expected {} elements, got {}", elements.len(), items.len());
                return Err(CoercionError::new(&Value::Tuple(items), target).with_reason(reason));
            }
            items
                .into_iter()
                .zip(elements)
                .map(|(item, element)| coerce(item, element))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Value::Tuple)
        }

        (value, TypeExpr::Opaque(opaque)) if is_constructible(&value) => {
            let failed = CoercionError::new(&value, target);
            opaque
                .construct(value)
                .map_err(|reason| failed.with_reason(reason))
        }

        (value, target) => Err(CoercionError::new(&value, target)),
    }
}

/// Read a command line token and coerce it to `target`.
///
/// Tokens for `str` parameters are taken verbatim; everything else goes
/// through the literal reader first.
pub fn convert_token(token: &str, target: &TypeExpr) -> Result<Value> {
    let raw = if target.is_str() {
        Value::Str(token.to_string())
    } else {
        read_literal(token)?
    };
    Ok(coerce(raw, target)?)
}

fn coerce_all<C>(items: impl IntoIterator<Item = Value>, element: &TypeExpr) -> std::result::Result<C, CoercionError>
where
    C: FromIterator<Value>,
{
    items.into_iter().map(|item| coerce(item, element)).collect()
}

/// A value satisfies a union member only when its runtime kind is the
/// member itself. Containers never do.
fn is_member(value: &Value, member: &TypeExpr) -> bool {
    match (value, member) {
        (Value::Bool(_), TypeExpr::Bool)
        | (Value::Int(_), TypeExpr::Int)
        | (Value::Float(_), TypeExpr::Float)
        | (Value::Str(_), TypeExpr::Str)
        | (Value::None, TypeExpr::None) => true,
        (Value::Custom(custom), TypeExpr::Opaque(opaque)) => custom.type_name() == opaque.name(),
        _ => false,
    }
}

fn is_constructible(value: &Value) -> bool {
    !matches!(value, Value::None | Value::Custom(_))
}
