//! Attribute access evaluation

use crate::{EvalError, Value};

/// Evaluate `receiver.name`.
///
/// # Errors
///
/// `AttributeError` when the receiver has no such attribute.
pub fn get_attr(receiver: &Value, name: &str) -> Result<Value, EvalError> {
    let found = match (receiver, name) {
        (Value::Record(record), name) => record.get(name).cloned(),

        (Value::Int(_) | Value::Bool(_), "real" | "numerator") => receiver.as_i64().map(Value::Int),
        (Value::Int(_) | Value::Bool(_), "imag") => Some(Value::Int(0)),
        (Value::Int(_) | Value::Bool(_), "denominator") => Some(Value::Int(1)),
        (Value::Float(x), "real") => Some(Value::Float(*x)),
        (Value::Float(_), "imag") => Some(Value::Float(0.0)),

        (Value::Slice(slice), "start") => Some(slice.start.clone()),
        (Value::Slice(slice), "stop") => Some(slice.stop.clone()),
        (Value::Slice(slice), "step") => Some(slice.step.clone()),

        (Value::Function(func), "__name__") => Some(Value::string(func.name.as_ref())),

        _ => None,
    };

    found.ok_or_else(|| EvalError::AttributeError {
        type_name: receiver_type(receiver),
        attr: name.to_string(),
    })
}

/// Type name used in attribute errors; records report their own type.
pub(crate) fn receiver_type(receiver: &Value) -> String {
    match receiver {
        Value::Record(record) => record.type_name.clone(),
        other => other.type_name().to_string(),
    }
}
