//! Subscription and slicing

use crate::{EvalError, HashableValue, SliceValue, Value};

/// Evaluate `container[key]`.
///
/// Sequences accept integer indices (negative counts from the end) and
/// slices; dicts accept any hashable key.
///
/// # Errors
///
/// `IndexError`, `KeyError`, `Unhashable` or `TypeError`.
pub fn subscript(container: &Value, key: &Value) -> Result<Value, EvalError> {
    match (container, key) {
        (Value::Dict(map), key) => {
            let lookup = HashableValue::new(key.clone())?;
            map.get(&lookup)
                .cloned()
                .ok_or_else(|| EvalError::KeyError(key.repr()))
        }

        (Value::List(items), Value::Slice(slice)) => {
            Ok(Value::list(pick(items, &slice_indices(slice, items.len())?)))
        }
        (Value::Tuple(items), Value::Slice(slice)) => {
            Ok(Value::tuple(pick(items, &slice_indices(slice, items.len())?)))
        }
        (Value::Str(s), Value::Slice(slice)) => {
            let chars: Vec<char> = s.chars().collect();
            let indices = slice_indices(slice, chars.len())?;
            Ok(Value::string(indices.iter().map(|&i| chars[i]).collect::<String>()))
        }

        (Value::List(items), index) => {
            let i = normalize_index(index, items.len(), "list")?;
            Ok(items[i].clone())
        }
        (Value::Tuple(items), index) => {
            let i = normalize_index(index, items.len(), "tuple")?;
            Ok(items[i].clone())
        }
        (Value::Str(s), index) => {
            let len = s.chars().count();
            let i = normalize_index(index, len, "string")?;
            Ok(s.chars().nth(i).map(Value::from).unwrap_or(Value::None))
        }

        (other, _) => Err(EvalError::TypeError(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

fn pick(items: &[Value], indices: &[usize]) -> Vec<Value> {
    indices.iter().map(|&i| items[i].clone()).collect()
}

fn normalize_index(index: &Value, len: usize, kind: &str) -> Result<usize, EvalError> {
    let n = match index {
        Value::Int(_) | Value::Bool(_) => index.as_i64().unwrap_or_default(),
        other => {
            return Err(EvalError::TypeError(format!(
                "{} indices must be integers or slices, not {}",
                kind,
                other.type_name()
            )))
        }
    };
    let len = i64::try_from(len).map_err(|_| EvalError::IntegerOverflow)?;
    let resolved = if n < 0 { n + len } else { n };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).map_err(|_| EvalError::IndexError(kind.to_string()))
    } else {
        Err(EvalError::IndexError(kind.to_string()))
    }
}

fn slice_bound(value: &Value) -> Result<Option<i64>, EvalError> {
    match value {
        Value::None => Ok(None),
        Value::Int(_) | Value::Bool(_) => Ok(value.as_i64()),
        _ => Err(EvalError::TypeError(
            "slice indices must be integers or None".to_string(),
        )),
    }
}

/// Resolve a slice against a sequence length into the selected positions.
///
/// Bounds are clamped the way sequence slicing clamps them: out-of-range
/// bounds never fail, negative bounds count from the end.
///
/// # Errors
///
/// `ValueError` for a zero step, `TypeError` for non-integer bounds.
pub fn slice_indices(slice: &SliceValue, len: usize) -> Result<Vec<usize>, EvalError> {
    let step = slice_bound(&slice.step)?.unwrap_or(1);
    if step == 0 {
        return Err(EvalError::ValueError("slice step cannot be zero".to_string()));
    }
    let len = i64::try_from(len).map_err(|_| EvalError::IntegerOverflow)?;
    let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

    let clamp = |bound: Option<i64>, default: i64| match bound {
        None => default,
        Some(n) if n < 0 => (n + len).max(lower),
        Some(n) => n.min(upper),
    };
    let start = clamp(
        slice_bound(&slice.start)?,
        if step < 0 { upper } else { lower },
    );
    let stop = clamp(
        slice_bound(&slice.stop)?,
        if step < 0 { lower } else { upper },
    );

    let mut indices = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        // Clamping keeps i within 0..len here
        if let Ok(index) = usize::try_from(i) {
            indices.push(index);
        }
        i = match i.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Value {
        Value::list(values.iter().copied().map(Value::Int).collect())
    }

    fn slice(start: impl Into<Value>, stop: impl Into<Value>, step: impl Into<Value>) -> Value {
        Value::slice(start.into(), stop.into(), step.into())
    }

    #[test]
    fn test_negative_index() {
        let list = ints(&[1, 2, 3]);
        assert_eq!(subscript(&list, &Value::Int(-1)).unwrap(), Value::Int(3));
        assert_eq!(
            subscript(&list, &Value::Int(3)),
            Err(EvalError::IndexError("list".to_string()))
        );
    }

    #[test]
    fn test_string_slicing() {
        let s = Value::from("hello world");
        assert_eq!(subscript(&s, &slice(0, 4, ())).unwrap(), Value::from("hell"));
        assert_eq!(subscript(&s, &slice((), (), -1)).unwrap(), Value::from("dlrow olleh"));
        assert_eq!(subscript(&s, &slice(-5, (), ())).unwrap(), Value::from("world"));
        assert_eq!(subscript(&s, &slice(100, (), ())).unwrap(), Value::from(""));
        assert_eq!(subscript(&s, &Value::Int(1)).unwrap(), Value::from("e"));
    }

    #[test]
    fn test_list_slicing_with_step() {
        let list = ints(&[0, 1, 2, 3, 4, 5]);
        assert_eq!(subscript(&list, &slice(1, (), 2)).unwrap(), ints(&[1, 3, 5]));
        assert_eq!(subscript(&list, &slice(4, 1, -1)).unwrap(), ints(&[4, 3, 2]));
        assert_eq!(subscript(&list, &slice(-100, 100, ())).unwrap(), list);
        assert!(matches!(
            subscript(&list, &slice((), (), 0)),
            Err(EvalError::ValueError(_))
        ));
    }

    #[test]
    fn test_dict_lookup() {
        let dict = Value::dict(vec![("a", 1)]).unwrap();
        assert_eq!(subscript(&dict, &Value::from("a")).unwrap(), Value::Int(1));
        assert_eq!(
            subscript(&dict, &Value::from("b")),
            Err(EvalError::KeyError("'b'".to_string()))
        );
        assert!(matches!(
            subscript(&dict, &Value::list(vec![])),
            Err(EvalError::Unhashable(_))
        ));
    }

    #[test]
    fn test_not_subscriptable() {
        assert!(matches!(
            subscript(&Value::Int(1), &Value::Int(0)),
            Err(EvalError::TypeError(_))
        ));
    }
}
