//! Deferred field values
//!
//! A [`Lazy`] holds a generator that runs only when a record carrying it is
//! serialized, after the level check. Records filtered out by the threshold
//! never pay for it. The generator runs again for every emitted record; its
//! output is never cached.

use super::error::LazyError;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Something that produces one or more values on demand.
///
/// `arity` describes how many arguments the generator expects. Only niladic
/// generators can be evaluated; anything else fails with
/// [`LazyError::WrongArity`] when the record is serialized.
pub trait ValueProvider: Send + Sync {
    fn arity(&self) -> usize {
        0
    }

    fn evaluate(&self) -> Result<Vec<Value>, LazyError>;
}

struct Single<F>(F);

impl<F, T> ValueProvider for Single<F>
where
    F: Fn() -> T + Send + Sync,
    T: Serialize,
{
    fn evaluate(&self) -> Result<Vec<Value>, LazyError> {
        let value = serde_json::to_value((self.0)())
            .map_err(|e| LazyError::Serialize(e.to_string()))?;
        Ok(vec![value])
    }
}

struct Many<F>(F);

impl<F> ValueProvider for Many<F>
where
    F: Fn() -> Vec<Value> + Send + Sync,
{
    fn evaluate(&self) -> Result<Vec<Value>, LazyError> {
        Ok((self.0)())
    }
}

/// A field value computed at serialization time
#[derive(Clone)]
pub struct Lazy {
    provider: Arc<dyn ValueProvider>,
}

impl Lazy {
    /// Wrap a closure returning a single serializable value
    ///
    /// # Example
    ///
    /// ```
    /// use rust_json_logger::Lazy;
    ///
    /// let greeting = Lazy::new(|| "world");
    /// assert_eq!(greeting.resolve().unwrap(), serde_json::json!("world"));
    /// ```
    pub fn new<F, T>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Serialize,
    {
        Self::from_provider(Single(f))
    }

    /// Wrap a closure returning several values, emitted as a JSON array.
    /// A single-element result is emitted as that element alone.
    pub fn many<F>(f: F) -> Self
    where
        F: Fn() -> Vec<Value> + Send + Sync + 'static,
    {
        Self::from_provider(Many(f))
    }

    pub fn from_provider<P: ValueProvider + 'static>(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Run the generator and collapse its output to one JSON value
    pub fn resolve(&self) -> Result<Value, LazyError> {
        let arity = self.provider.arity();
        if arity != 0 {
            return Err(LazyError::WrongArity { arity });
        }

        let mut values = self.provider.evaluate()?;
        match values.len() {
            0 => Err(LazyError::NoReturnValue),
            1 => Ok(values.remove(0)),
            _ => Ok(Value::Array(values)),
        }
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("arity", &self.provider.arity())
            .finish_non_exhaustive()
    }
}

impl Serialize for Lazy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.resolve() {
            Ok(value) => value.serialize(serializer),
            Err(e) => Err(serde::ser::Error::custom(e)),
        }
    }
}
