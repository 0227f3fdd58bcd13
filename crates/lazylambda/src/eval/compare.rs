//! Comparison and membership evaluation

use std::cmp::Ordering;

use crate::expr::CompareOp;
use crate::{EvalError, HashableValue, Value};

/// Apply a comparison or membership test to two resolved values.
///
/// # Errors
///
/// `TypeError` when ordering incomparable types or testing membership in a
/// non-container, `Unhashable` for unhashable dict lookups.
pub fn eval_compare(op: CompareOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let result = match op {
        CompareOp::Eq => left == right,
        CompareOp::Ne => left != right,
        CompareOp::Lt => order(op, left, right)? == Some(Ordering::Less),
        CompareOp::Le => matches!(
            order(op, left, right)?,
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Gt => order(op, left, right)? == Some(Ordering::Greater),
        CompareOp::Ge => matches!(
            order(op, left, right)?,
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::In => contains(right, left)?,
        CompareOp::NotIn => !contains(right, left)?,
    };
    Ok(Value::Bool(result))
}

/// Order two values. `None` means unordered (a NaN was involved).
///
/// # Errors
///
/// `TypeError` when the types cannot be ordered.
pub fn order(op: CompareOp, left: &Value, right: &Value) -> Result<Option<Ordering>, EvalError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.as_str().cmp(b.as_str()))),
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            order_sequences(op, a, b)
        }
        _ => match (numeric(left), numeric(right)) {
            (Some(Numeric::Int(a)), Some(Numeric::Int(b))) => Ok(Some(a.cmp(&b))),
            (Some(Numeric::Float(a)), Some(Numeric::Float(b))) => Ok(a.partial_cmp(&b)),
            (Some(Numeric::Int(a)), Some(Numeric::Float(b))) => Ok(order_int_float(a, b)),
            (Some(Numeric::Float(a)), Some(Numeric::Int(b))) => {
                Ok(order_int_float(b, a).map(Ordering::reverse))
            }
            _ => Err(EvalError::TypeError(format!(
                "'{}' not supported between instances of '{}' and '{}'",
                op.as_symbol(),
                left.type_name(),
                right.type_name()
            ))),
        },
    }
}

fn order_sequences(
    op: CompareOp,
    left: &[Value],
    right: &[Value],
) -> Result<Option<Ordering>, EvalError> {
    // The first differing pair decides
    for (a, b) in left.iter().zip(right) {
        if a != b {
            return order(op, a, b);
        }
    }
    Ok(Some(left.len().cmp(&right.len())))
}

#[derive(Clone, Copy)]
enum Numeric {
    Int(i64),
    Float(f64),
}

/// Exact ordering of an int against a float, without rounding the int.
fn order_int_float(n: i64, x: f64) -> Option<Ordering> {
    // 2**63, exactly representable
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if x.is_nan() {
        return None;
    }
    if x >= LIMIT {
        return Some(Ordering::Less);
    }
    if x < -LIMIT {
        return Some(Ordering::Greater);
    }
    let whole = x.floor();
    Some(n.cmp(&(whole as i64)).then(if x > whole {
        Ordering::Less
    } else {
        Ordering::Equal
    }))
}

fn numeric(value: &Value) -> Option<Numeric> {
    match value {
        Value::Float(x) => Some(Numeric::Float(*x)),
        other => other.as_i64().map(Numeric::Int),
    }
}

/// Membership test, `item in container`.
///
/// # Errors
///
/// `TypeError` for non-containers, `Unhashable` for unhashable dict lookups.
pub fn contains(container: &Value, item: &Value) -> Result<bool, EvalError> {
    match container {
        Value::Str(haystack) => match item {
            Value::Str(needle) => Ok(haystack.contains(needle.as_str())),
            other => Err(EvalError::TypeError(format!(
                "'in <string>' requires string as left operand, not {}",
                other.type_name()
            ))),
        },
        Value::List(items) | Value::Tuple(items) => Ok(items.contains(item)),
        Value::Dict(map) => Ok(map.contains_key(&HashableValue::new(item.clone())?)),
        other => Err(EvalError::TypeError(format!(
            "argument of type '{}' is not iterable",
            other.type_name()
        ))),
    }
}
