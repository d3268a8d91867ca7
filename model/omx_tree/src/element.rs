//! Construction events.
//!
//! An [`Element`] is one construction event from the parser collaborator:
//! the record type name plus an ordered field mapping whose values are
//! literals, nested elements, or lists of either. The writer direction is
//! the mirror image, produced by the model's serializers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Value;

/// Ordered field mapping of a construction event.
///
/// Insertion order is preserved; it is the order fields serialize back in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    entries: IndexMap<String, Value>,
}

impl FieldMap {
    pub fn new() -> Self {
        FieldMap::default()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Remove and return a field, preserving the order of the rest.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.entries.shift_remove(name)
    }

    /// Insert a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Insert a repeated child: a second write under one name promotes the
    /// slot to a list and appends, the way repeated markup children
    /// collapse onto one plural field.
    pub fn push_repeated(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.get_mut(&name) {
            None => {
                self.entries.insert(name, value);
            }
            Some(Value::List(items)) => items.push(value),
            Some(slot) => {
                let first = std::mem::replace(slot, Value::Bool(false));
                *slot = Value::List(vec![first, value]);
            }
        }
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Drain all fields in insertion order.
    pub fn drain(&mut self) -> impl Iterator<Item = (String, Value)> + '_ {
        self.entries.drain(..)
    }
}

impl FromIterator<(String, Value)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        FieldMap {
            entries: iter.into_iter().collect(),
        }
    }
}

/// One construction event: a record type name and its fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Record type name, e.g. `"Image"` or `"Label"`.
    pub name: String,
    pub fields: FieldMap,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            fields: FieldMap::new(),
        }
    }

    /// Builder-style field insertion, for tests and fixtures.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name, value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn take_field(&mut self, name: &str) -> Option<Value> {
        self.fields.take(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }
}
