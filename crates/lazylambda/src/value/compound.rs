//! Compound value types: records and slices

use indexmap::IndexMap;

use super::Value;

/// A record instance with named fields.
///
/// Uses IndexMap to preserve field order (for predictable iteration
/// and printing).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The record's type name (e.g., "Point", "Person")
    pub type_name: String,

    /// The record's fields in definition order
    pub fields: IndexMap<String, Value>,
}

impl Record {
    /// Create a new record without fields
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field (builder pattern)
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// A slice object: every bound is either `None` or an integer.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceValue {
    /// First index (inclusive)
    pub start: Value,
    /// Last index (exclusive)
    pub stop: Value,
    /// Stride
    pub step: Value,
}

impl SliceValue {
    /// Create a slice from its three bounds
    pub fn new(start: Value, stop: Value, step: Value) -> Self {
        Self { start, stop, step }
    }
}
