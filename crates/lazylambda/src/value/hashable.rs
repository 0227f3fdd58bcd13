//! Hashable wrapper for Value to enable use as mapping keys

use std::hash::{Hash, Hasher};

use super::Value;
use crate::error::type_name;
use crate::EvalError;

/// A wrapper for Value that implements Hash and Eq.
///
/// Only `None`, booleans, integers, strings and tuples of those can be
/// used as keys. Floats are excluded so that `Eq` stays consistent with
/// the numeric equality of `Value`.
#[derive(Debug, Clone)]
pub struct HashableValue(Value);

impl HashableValue {
    /// Wrap a value, checking it can be hashed.
    ///
    /// # Errors
    ///
    /// Returns `Unhashable` for floats, containers other than tuples,
    /// and callables.
    pub fn new(value: Value) -> Result<Self, EvalError> {
        if Self::is_hashable(&value) {
            Ok(Self(value))
        } else {
            Err(EvalError::Unhashable(type_name(&value).to_string()))
        }
    }

    /// Check if a value can be hashed
    pub fn is_hashable(value: &Value) -> bool {
        match value {
            Value::None | Value::Bool(_) | Value::Int(_) | Value::Str(_) => true,
            Value::Tuple(items) => items.iter().all(Self::is_hashable),
            _ => false,
        }
    }

    /// The wrapped value
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Unwrap the value
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Hash for HashableValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(&self.0, state);
    }
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        // Equal values hash equally, so `True` and `1` share a hash
        Value::Bool(_) | Value::Int(_) => {
            0u8.hash(state);
            value.as_i64().hash(state);
        }
        Value::Str(s) => {
            1u8.hash(state);
            s.hash(state);
        }
        Value::Tuple(items) => {
            2u8.hash(state);
            items.len().hash(state);
            for item in items.iter() {
                hash_value(item, state);
            }
        }
        // Only reachable for None: the constructor rejects the rest
        _ => 3u8.hash(state),
    }
}

impl PartialEq for HashableValue {
    fn eq(&self, other: &Self) -> bool {
        // Delegate to Value's PartialEq
        self.0 == other.0
    }
}

impl Eq for HashableValue {}
