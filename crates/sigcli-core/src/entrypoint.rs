use futures::future::{BoxFuture, FutureExt};
use sigcli_types::{Parameter, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

pub type SyncHandler = dyn Fn(Arguments) -> anyhow::Result<Value> + Send + Sync;
pub type AsyncHandler = dyn Fn(Arguments) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync;

/// How an entrypoint is invoked. Async handlers are driven to completion by
/// the dispatcher before their result is returned.
#[derive(Clone)]
pub enum Handler {
    Sync(Arc<SyncHandler>),
    Async(Arc<AsyncHandler>),
}

/// A callable that can be bound to a command node.
#[derive(Clone)]
pub struct Entrypoint {
    name: String,
    doc: Option<String>,
    parameters: Vec<Parameter>,
    handler: Handler,
}

impl Entrypoint {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            doc: None,
            parameters: Vec::new(),
            handler: Handler::Sync(Arc::new(handler)),
        }
    }

    pub fn new_async<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            doc: None,
            parameters: Vec::new(),
            handler: Handler::Async(Arc::new(move |args: Arguments| handler(args).boxed())),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_params(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn is_async(&self) -> bool {
        matches!(self.handler, Handler::Async(_))
    }
}

impl fmt::Debug for Entrypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entrypoint")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("is_async", &self.is_async())
            .finish()
    }
}

/// Arguments passed to an entrypoint: positional-only values in order, then
/// every other parameter by name in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub args: Vec<Value>,
    pub kwargs: Vec<(String, Value)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_positional(&mut self, value: Value) {
        self.args.push(value);
    }

    pub fn push_keyword(&mut self, name: impl Into<String>, value: Value) {
        self.kwargs.push((name.into(), value));
    }

    pub fn positional(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.kwargs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Typed access to a positional argument.
    pub fn arg<T: FromValue>(&self, index: usize) -> anyhow::Result<T> {
        let value = self
            .positional(index)
            .ok_or_else(|| anyhow::anyhow!("missing positional argument {}", index))?;
        T::from_value(value)
    }

    /// Typed access to a keyword argument.
    pub fn kwarg<T: FromValue>(&self, name: &str) -> anyhow::Result<T> {
        let value = self
            .keyword(name)
            .ok_or_else(|| anyhow::anyhow!("missing keyword argument {}", name))?;
        T::from_value(value)
    }
}

/// Extraction of native Rust values from a coerced [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> anyhow::Result<Self>;
}

fn mismatch(expected: &str, value: &Value) -> anyhow::Error {
    anyhow::anyhow!("expected {}, got {} {}", expected, value.kind(), value.repr())
}

impl FromValue for Value {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        value.as_int().ok_or_else(|| mismatch("int", value))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        value.as_float().ok_or_else(|| mismatch("float", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("str", value))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::None => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::List(items) | Value::Tuple(items) => items.iter().map(T::from_value).collect(),
            other => Err(mismatch("list or tuple", other)),
        }
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::Set(items) | Value::FrozenSet(items) => items.iter().map(T::from_value).collect(),
            other => Err(mismatch("set", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let mut args = Arguments::new();
        args.push_positional(Value::Int(3));
        args.push_keyword("names", Value::tuple([Value::from("a"), Value::from("b")]));
        args.push_keyword("limit", Value::None);

        assert_eq!(args.arg::<i64>(0).unwrap(), 3);
        assert_eq!(
            args.kwarg::<Vec<String>>("names").unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(args.kwarg::<Option<f64>>("limit").unwrap(), None);
        assert!(args.arg::<i64>(1).is_err());
        assert!(args.kwarg::<bool>("names").is_err());
    }

    #[test]
    fn test_sync_and_async_handlers() {
        let sync = Entrypoint::new("sync", |_| Ok(Value::None));
        let with_async = Entrypoint::new_async("async", |_| async { Ok::<_, anyhow::Error>(Value::None) });
        assert!(!sync.is_async());
        assert!(with_async.is_async());
    }
}
