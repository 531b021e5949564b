//! Structured logging context for key-value fields
//!
//! This module provides:
//! - `FieldValue`: a single serializable field value, possibly deferred
//! - `Context`: a flat key-to-value mapping, merged with last-write-wins

use super::lazy::Lazy;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::hash_map::{self, HashMap};

/// Value type for structured logging fields
///
/// Numbers and booleans keep their JSON type in the emitted record. Nested
/// structures are carried as `Json`. `Lazy` values are evaluated when the
/// record is serialized.
#[derive(Debug, Clone)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
    Json(Value),
    Lazy(Lazy),
}

impl FieldValue {
    /// Capture any serializable value as a nested JSON field
    pub fn json<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(FieldValue::Json)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::UInt(u) => serializer.serialize_u64(*u),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Json(v) => v.serialize(serializer),
            FieldValue::Lazy(lazy) => lazy.serialize(serializer),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for FieldValue {
            fn from(i: $t) -> Self {
                FieldValue::Int(i64::from(i))
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for FieldValue {
            fn from(u: $t) -> Self {
                FieldValue::UInt(u64::from(u))
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<isize> for FieldValue {
    fn from(i: isize) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::Float(f64::from(f))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Json(v)
    }
}

impl From<Lazy> for FieldValue {
    fn from(lazy: Lazy) -> Self {
        FieldValue::Lazy(lazy)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Key-value fields attached to a logger or to a single log call
///
/// A `Context` has no ordering of its own. When several are merged, later
/// sources override earlier ones on the same key.
#[derive(Debug, Clone, Default)]
pub struct Context {
    fields: HashMap<String, FieldValue>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Add a field to the context
    #[must_use]
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field to the context (mutable version)
    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Get all fields
    pub fn fields(&self) -> &HashMap<String, FieldValue> {
        &self.fields
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    /// Check if context has any fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Overlay `other` onto this context; `other` wins on shared keys
    pub fn merge(&mut self, other: &Context) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Build a fresh context holding `self` overlaid with `other`
    #[must_use]
    pub fn merged(&self, other: &Context) -> Context {
        let mut merged = Context {
            fields: HashMap::with_capacity(self.len() + other.len()),
        };
        merged.merge(self);
        merged.merge(other);
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Context {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for Context
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.fields.insert(k.into(), v.into());
        }
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = hash_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_creation() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_context_with_fields() {
        let ctx = Context::new()
            .with_field("user_id", 123)
            .with_field("username", "john_doe")
            .with_field("active", true);

        assert_eq!(ctx.len(), 3);
        assert!(!ctx.is_empty());
    }

    #[test]
    fn test_merge_later_source_wins() {
        let mut base = Context::new()
            .with_field("key", "logger_value")
            .with_field("service", "api");
        let call = Context::new().with_field("key", "call_value");

        base.merge(&call);

        assert_eq!(base.len(), 2);
        match base.get("key") {
            Some(FieldValue::String(s)) => assert_eq!(s, "call_value"),
            other => panic!("Expected string value, got {:?}", other),
        }
    }

    #[test]
    fn test_merged_leaves_sources_untouched() {
        let parent = Context::new().with_field("service", "api");
        let extra = Context::new().with_field("request_id", "abc");

        let child = parent.merged(&extra);

        assert_eq!(child.len(), 2);
        assert_eq!(parent.len(), 1);
        assert!(!parent.contains_key("request_id"));
    }

    #[test]
    fn test_typed_values_keep_json_types() {
        let ctx = Context::new()
            .with_field("int", 987654321)
            .with_field("float", 1.5)
            .with_field("bool", false)
            .with_field("big", u64::MAX)
            .with_field("none", Option::<i32>::None);

        assert_eq!(serde_json::to_value(ctx.get("int").unwrap()).unwrap(), json!(987654321));
        assert_eq!(serde_json::to_value(ctx.get("float").unwrap()).unwrap(), json!(1.5));
        assert_eq!(serde_json::to_value(ctx.get("bool").unwrap()).unwrap(), json!(false));
        assert_eq!(serde_json::to_value(ctx.get("big").unwrap()).unwrap(), json!(u64::MAX));
        assert_eq!(serde_json::to_value(ctx.get("none").unwrap()).unwrap(), Value::Null);
    }

    #[test]
    fn test_nested_json_value() {
        let nested = FieldValue::json(&vec![1, 2, 3]).unwrap();
        let ctx = Context::new().with_field("list", nested);
        assert_eq!(
            serde_json::to_value(ctx.get("list").unwrap()).unwrap(),
            json!([1, 2, 3])
        );
    }

    #[test]
    fn test_collect_from_pairs() {
        let ctx: Context = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(ctx.len(), 2);
        assert!(ctx.contains_key("a"));
    }
}
