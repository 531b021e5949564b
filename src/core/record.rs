//! One log record, assembled and encoded as a JSON line
//!
//! Fields are layered in a fixed order: logger context, then each call-site
//! context in argument order, then metadata. Each layer overwrites keys set
//! by the ones before it, so metadata keys always carry metadata. Keys are
//! kept sorted, which makes the encoded object deterministic.

use super::error::Result;
use super::log_context::{Context, FieldValue};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug)]
enum Slot<'a> {
    Field(&'a FieldValue),
    Text(&'a str),
    Value(Value),
}

impl Serialize for Slot<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Slot::Field(field) => field.serialize(serializer),
            Slot::Text(text) => serializer.serialize_str(text),
            Slot::Value(value) => value.serialize(serializer),
        }
    }
}

#[derive(Debug, Default)]
pub struct Record<'a> {
    fields: BTreeMap<&'a str, Slot<'a>>,
}

impl<'a> Record<'a> {
    /// Merge the logger's context with the call-site contexts
    pub fn merged(base: &'a Context, overlays: &'a [Context]) -> Self {
        let mut fields = BTreeMap::new();
        for (key, value) in std::iter::once(base).chain(overlays).flatten() {
            fields.insert(key.as_str(), Slot::Field(value));
        }
        Self { fields }
    }

    pub fn set_text(&mut self, key: &'a str, text: &'a str) {
        self.fields.insert(key, Slot::Text(text));
    }

    pub fn set_value(&mut self, key: &'a str, value: Value) {
        self.fields.insert(key, Slot::Value(value));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize as a single JSON object followed by `\n`.
    ///
    /// Lazy values run here. A failing generator fails the whole record.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec(&self.fields)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
