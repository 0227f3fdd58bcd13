//! Method dispatch on resolved values
//!
//! The receiver type set is fixed, so dispatch is a match per type rather
//! than a lookup through trait objects.

use std::sync::Arc;

use super::compare::order;
use super::field::receiver_type;
use super::format::format_template;
use crate::expr::CompareOp;
use crate::value::Kwargs;
use crate::{EvalError, Value};

/// Call `receiver.name(args, **kwargs)`.
///
/// # Errors
///
/// `AttributeError` for unknown methods, `ArityMismatch` or `TypeError`
/// for bad arguments, or the method's own error.
pub fn call_method(
    receiver: &Value,
    name: &str,
    args: &[Value],
    kwargs: &Kwargs,
) -> Result<Value, EvalError> {
    match receiver {
        Value::Str(s) => dispatch_str(s, name, args, kwargs),
        Value::List(items) => dispatch_sequence(items, true, name, args, kwargs),
        Value::Tuple(items) => dispatch_sequence(items, false, name, args, kwargs),
        Value::Dict(_) => dispatch_dict(receiver, name, args, kwargs),
        Value::Int(_) | Value::Bool(_) | Value::Float(_) => {
            dispatch_numeric(receiver, name, args, kwargs)
        }
        // A record field holding a function behaves like a method
        Value::Record(record) => match record.get(name) {
            Some(Value::Function(func)) => func.call(args, kwargs),
            Some(other) => Err(EvalError::NotCallable(other.type_name().to_string())),
            None => Err(no_such_method(receiver, name)),
        },
        other => Err(no_such_method(other, name)),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Argument Helpers
// ═══════════════════════════════════════════════════════════════════════

fn no_such_method(receiver: &Value, name: &str) -> EvalError {
    EvalError::AttributeError {
        type_name: receiver_type(receiver),
        attr: name.to_string(),
    }
}

fn require_args(method: &str, min: usize, max: usize, args: &[Value]) -> Result<(), EvalError> {
    if args.len() < min || args.len() > max {
        return Err(EvalError::ArityMismatch {
            name: method.to_string(),
            expected: if args.len() < min { min } else { max },
            got: args.len(),
        });
    }
    Ok(())
}

fn no_kwargs(method: &str, kwargs: &Kwargs) -> Result<(), EvalError> {
    match kwargs.keys().next() {
        Some(key) => Err(EvalError::TypeError(format!(
            "{}() got an unexpected keyword argument '{}'",
            method, key
        ))),
        None => Ok(()),
    }
}

fn str_arg<'a>(method: &str, value: &'a Value) -> Result<&'a str, EvalError> {
    value.as_str().ok_or_else(|| {
        EvalError::TypeError(format!(
            "{}() argument must be str, not {}",
            method,
            value.type_name()
        ))
    })
}

fn int_arg(method: &str, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Int(_) | Value::Bool(_) => Ok(value.as_i64().unwrap_or_default()),
        other => Err(EvalError::TypeError(format!(
            "{}() argument must be int, not {}",
            method,
            other.type_name()
        ))),
    }
}

/// Optional string argument at `index`; `None` when absent or `None`.
fn opt_str_arg<'a>(
    method: &str,
    args: &'a [Value],
    index: usize,
) -> Result<Option<&'a str>, EvalError> {
    match args.get(index) {
        None | Some(Value::None) => Ok(None),
        Some(value) => str_arg(method, value).map(Some),
    }
}

fn strings(items: Vec<&str>) -> Value {
    Value::list(items.into_iter().map(Value::from).collect())
}

// ═══════════════════════════════════════════════════════════════════════
// str
// ═══════════════════════════════════════════════════════════════════════

fn dispatch_str(
    s: &Arc<String>,
    name: &str,
    args: &[Value],
    kwargs: &Kwargs,
) -> Result<Value, EvalError> {
    if name == "format" {
        return format_template(s, args, kwargs).map(Value::string);
    }
    if name == "split" {
        return str_split(s, args, kwargs);
    }
    no_kwargs(name, kwargs)?;

    match name {
        "lower" => {
            require_args(name, 0, 0, args)?;
            Ok(Value::string(s.to_lowercase()))
        }
        "upper" => {
            require_args(name, 0, 0, args)?;
            Ok(Value::string(s.to_uppercase()))
        }
        "title" => {
            require_args(name, 0, 0, args)?;
            Ok(Value::string(title_case(s)))
        }
        "capitalize" => {
            require_args(name, 0, 0, args)?;
            let mut chars = s.chars();
            let capitalized = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            };
            Ok(Value::string(capitalized))
        }
        "islower" => {
            require_args(name, 0, 0, args)?;
            Ok(Value::Bool(cased_only(s, char::is_lowercase, char::is_uppercase)))
        }
        "isupper" => {
            require_args(name, 0, 0, args)?;
            Ok(Value::Bool(cased_only(s, char::is_uppercase, char::is_lowercase)))
        }
        "isdigit" => {
            require_args(name, 0, 0, args)?;
            Ok(Value::Bool(!s.is_empty() && s.chars().all(|c| c.is_ascii_digit())))
        }
        "isalpha" => {
            require_args(name, 0, 0, args)?;
            Ok(Value::Bool(!s.is_empty() && s.chars().all(char::is_alphabetic)))
        }
        "strip" | "lstrip" | "rstrip" => {
            require_args(name, 0, 1, args)?;
            let chars: Option<Vec<char>> = opt_str_arg(name, args, 0)?.map(|c| c.chars().collect());
            let strip = |c: char| match &chars {
                Some(set) => set.contains(&c),
                None => c.is_whitespace(),
            };
            let stripped = match name {
                "strip" => s.trim_matches(strip),
                "lstrip" => s.trim_start_matches(strip),
                _ => s.trim_end_matches(strip),
            };
            Ok(Value::string(stripped))
        }
        "startswith" | "endswith" => {
            require_args(name, 1, 1, args)?;
            let candidates: Vec<&str> = match &args[0] {
                Value::Tuple(items) => items
                    .iter()
                    .map(|item| str_arg(name, item))
                    .collect::<Result<_, _>>()?,
                other => vec![str_arg(name, other)?],
            };
            let found = candidates.iter().any(|candidate| {
                if name == "startswith" {
                    s.starts_with(candidate)
                } else {
                    s.ends_with(candidate)
                }
            });
            Ok(Value::Bool(found))
        }
        "join" => {
            require_args(name, 1, 1, args)?;
            let parts = match &args[0] {
                Value::List(items) | Value::Tuple(items) => items
                    .iter()
                    .map(|item| str_arg(name, item))
                    .collect::<Result<Vec<_>, _>>()?,
                Value::Str(chars) => return Ok(Value::string(join_chars(chars, s))),
                other => {
                    return Err(EvalError::TypeError(format!(
                        "can only join an iterable, not {}",
                        other.type_name()
                    )))
                }
            };
            Ok(Value::string(parts.join(s.as_str())))
        }
        "replace" => {
            require_args(name, 2, 3, args)?;
            let old = str_arg(name, &args[0])?;
            let new = str_arg(name, &args[1])?;
            let replaced = match args.get(2) {
                Some(count) => match usize::try_from(int_arg(name, count)?) {
                    Ok(count) => s.replacen(old, new, count),
                    Err(_) => s.replace(old, new),
                },
                None => s.replace(old, new),
            };
            Ok(Value::string(replaced))
        }
        "find" => {
            require_args(name, 1, 1, args)?;
            let needle = str_arg(name, &args[0])?;
            let position = match s.find(needle) {
                Some(byte) => i64::try_from(s[..byte].chars().count()).unwrap_or(i64::MAX),
                None => -1,
            };
            Ok(Value::Int(position))
        }
        "count" => {
            require_args(name, 1, 1, args)?;
            let needle = str_arg(name, &args[0])?;
            let count = if needle.is_empty() {
                s.chars().count() + 1
            } else {
                s.matches(needle).count()
            };
            Ok(Value::Int(i64::try_from(count).unwrap_or(i64::MAX)))
        }
        _ => Err(no_such_method(&Value::Str(Arc::clone(s)), name)),
    }
}

/// At least one cased character, and none of the opposite case.
fn cased_only(s: &str, wanted: fn(char) -> bool, opposite: fn(char) -> bool) -> bool {
    let mut cased = false;
    for c in s.chars() {
        if opposite(c) {
            return false;
        }
        cased |= wanted(c);
    }
    cased
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_cased = false;
    for c in s.chars() {
        if previous_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_cased = c.is_alphabetic();
    }
    out
}

fn join_chars(chars: &str, separator: &str) -> String {
    chars
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(separator)
}

fn str_split(s: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value, EvalError> {
    require_args("split", 0, 2, args)?;
    let mut sep = args.first().cloned().unwrap_or(Value::None);
    let mut maxsplit = args.get(1).cloned().unwrap_or(Value::Int(-1));
    for (key, value) in kwargs {
        match key.as_str() {
            "sep" => sep = value.clone(),
            "maxsplit" => maxsplit = value.clone(),
            other => {
                return Err(EvalError::TypeError(format!(
                    "split() got an unexpected keyword argument '{}'",
                    other
                )))
            }
        }
    }
    let limit = usize::try_from(int_arg("split", &maxsplit)?).ok();

    match sep {
        Value::None => {
            let words: Vec<&str> = s.split_whitespace().collect();
            match limit {
                Some(limit) if limit < words.len() => {
                    // Keep the remainder unsplit, as a single trailing part
                    let mut parts: Vec<&str> = words[..limit].to_vec();
                    let mut rest = s.trim_start();
                    for word in &words[..limit] {
                        rest = rest[word.len()..].trim_start();
                    }
                    parts.push(rest);
                    Ok(strings(parts))
                }
                _ => Ok(strings(words)),
            }
        }
        ref value => {
            let sep = str_arg("split", value)?;
            if sep.is_empty() {
                return Err(EvalError::ValueError("empty separator".to_string()));
            }
            let parts: Vec<&str> = match limit {
                Some(limit) => s.splitn(limit + 1, sep).collect(),
                None => s.split(sep).collect(),
            };
            Ok(strings(parts))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// list / tuple
// ═══════════════════════════════════════════════════════════════════════

fn dispatch_sequence(
    items: &Arc<Vec<Value>>,
    is_list: bool,
    name: &str,
    args: &[Value],
    kwargs: &Kwargs,
) -> Result<Value, EvalError> {
    no_kwargs(name, kwargs)?;
    match name {
        "index" => {
            require_args(name, 1, 1, args)?;
            items
                .iter()
                .position(|item| item == &args[0])
                .map(|i| Value::Int(i64::try_from(i).unwrap_or(i64::MAX)))
                .ok_or_else(|| EvalError::ValueError(format!("{} is not in sequence", args[0].repr())))
        }
        "count" => {
            require_args(name, 1, 1, args)?;
            let count = items.iter().filter(|item| *item == &args[0]).count();
            Ok(Value::Int(i64::try_from(count).unwrap_or(i64::MAX)))
        }
        "copy" if is_list => {
            require_args(name, 0, 0, args)?;
            Ok(Value::list(items.to_vec()))
        }
        _ => {
            let receiver = if is_list {
                Value::List(Arc::clone(items))
            } else {
                Value::Tuple(Arc::clone(items))
            };
            Err(no_such_method(&receiver, name))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// dict
// ═══════════════════════════════════════════════════════════════════════

fn dispatch_dict(
    receiver: &Value,
    name: &str,
    args: &[Value],
    kwargs: &Kwargs,
) -> Result<Value, EvalError> {
    let Value::Dict(map) = receiver else {
        return Err(no_such_method(receiver, name));
    };
    no_kwargs(name, kwargs)?;
    match name {
        "get" => {
            require_args(name, 1, 2, args)?;
            let default = args.get(1).cloned().unwrap_or(Value::None);
            let key = crate::HashableValue::new(args[0].clone())?;
            Ok(map.get(&key).cloned().unwrap_or(default))
        }
        "keys" => {
            require_args(name, 0, 0, args)?;
            Ok(Value::list(map.keys().map(|k| k.value().clone()).collect()))
        }
        "values" => {
            require_args(name, 0, 0, args)?;
            Ok(Value::list(map.values().cloned().collect()))
        }
        "items" => {
            require_args(name, 0, 0, args)?;
            Ok(Value::list(
                map.iter()
                    .map(|(k, v)| Value::tuple(vec![k.value().clone(), v.clone()]))
                    .collect(),
            ))
        }
        _ => Err(no_such_method(receiver, name)),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// int / float
// ═══════════════════════════════════════════════════════════════════════

fn dispatch_numeric(
    receiver: &Value,
    name: &str,
    args: &[Value],
    kwargs: &Kwargs,
) -> Result<Value, EvalError> {
    no_kwargs(name, kwargs)?;
    require_args(name, 0, 0, args)?;
    match (receiver, name) {
        (Value::Float(x), "conjugate") => Ok(Value::Float(*x)),
        (Value::Float(x), "is_integer") => Ok(Value::Bool(x.is_finite() && x.fract() == 0.0)),
        (Value::Int(_) | Value::Bool(_), "conjugate") => {
            Ok(Value::Int(receiver.as_i64().unwrap_or_default()))
        }
        (Value::Int(_) | Value::Bool(_), "is_integer") => Ok(Value::Bool(true)),
        (Value::Int(_) | Value::Bool(_), "bit_length") => {
            let n = receiver.as_i64().unwrap_or_default();
            Ok(Value::Int(i64::from(u64::BITS - n.unsigned_abs().leading_zeros())))
        }
        _ => Err(no_such_method(receiver, name)),
    }
}

/// Order two values for `min`/`max`/`sorted`-like natives.
pub(crate) fn less_than(left: &Value, right: &Value) -> Result<bool, EvalError> {
    Ok(order(CompareOp::Lt, left, right)? == Some(std::cmp::Ordering::Less))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use crate::NativeFn;
    use pretty_assertions::assert_eq;

    fn call(receiver: impl Into<Value>, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        call_method(&receiver.into(), name, args, &Kwargs::new())
    }

    #[test]
    fn test_case_predicates() {
        assert_eq!(call("hello", "islower", &[]).unwrap(), Value::Bool(true));
        assert_eq!(call("Hello", "islower", &[]).unwrap(), Value::Bool(false));
        assert_eq!(call("123", "islower", &[]).unwrap(), Value::Bool(false));
        assert_eq!(call("ABC1", "isupper", &[]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_string_transforms() {
        assert_eq!(call("hello world", "title", &[]).unwrap(), Value::from("Hello World"));
        assert_eq!(call("hELLO", "capitalize", &[]).unwrap(), Value::from("Hello"));
        assert_eq!(call("  pad ", "strip", &[]).unwrap(), Value::from("pad"));
        assert_eq!(
            call("xxpadxx", "lstrip", &[Value::from("x")]).unwrap(),
            Value::from("padxx")
        );
        assert_eq!(
            call("a-b-c", "replace", &[Value::from("-"), Value::from("+"), Value::Int(1)]).unwrap(),
            Value::from("a+b-c")
        );
    }

    #[test]
    fn test_split_and_join() {
        let words = call(" a  b c ", "split", &[]).unwrap();
        assert_eq!(words, Value::list(vec!["a".into(), "b".into(), "c".into()]));
        let limited = call("a b c", "split", &[Value::None, Value::Int(1)]).unwrap();
        assert_eq!(limited, Value::list(vec!["a".into(), "b c".into()]));
        let commas = call("a,,b", "split", &[Value::from(",")]).unwrap();
        assert_eq!(commas, Value::list(vec!["a".into(), "".into(), "b".into()]));
        assert_eq!(
            call("-", "join", &[Value::list(vec!["x".into(), "y".into()])]).unwrap(),
            Value::from("x-y")
        );
    }

    #[test]
    fn test_find_and_count() {
        assert_eq!(call("héllo", "find", &[Value::from("l")]).unwrap(), Value::Int(2));
        assert_eq!(call("hello", "find", &[Value::from("z")]).unwrap(), Value::Int(-1));
        assert_eq!(call("banana", "count", &[Value::from("a")]).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_prefix_tuple() {
        let prefixes = Value::tuple(vec!["x".into(), "he".into()]);
        assert_eq!(call("hello", "startswith", &[prefixes]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_sequence_and_dict_methods() {
        let list = Value::list(vec![Value::Int(5), Value::Int(7), Value::Int(5)]);
        assert_eq!(call(list.clone(), "index", &[Value::Int(7)]).unwrap(), Value::Int(1));
        assert_eq!(call(list.clone(), "count", &[Value::Int(5)]).unwrap(), Value::Int(2));
        assert!(call(list, "index", &[Value::Int(9)]).is_err());

        let dict = Value::dict(vec![("a", 1)]).unwrap();
        assert_eq!(call(dict.clone(), "get", &[Value::from("b"), Value::Int(0)]).unwrap(), Value::Int(0));
        assert_eq!(call(dict, "keys", &[]).unwrap(), Value::list(vec!["a".into()]));
    }

    #[test]
    fn test_numeric_methods() {
        assert_eq!(call(255, "bit_length", &[]).unwrap(), Value::Int(8));
        assert_eq!(call(2.0, "is_integer", &[]).unwrap(), Value::Bool(true));
        assert_eq!(call(2.5, "is_integer", &[]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_record_function_field() {
        let area = NativeFn::new("area", 0, |_, _| Ok(Value::Int(12)));
        let shape = Value::record(Record::new("Shape").with_field("area", area));
        assert_eq!(call(shape, "area", &[]).unwrap(), Value::Int(12));
    }

    #[test]
    fn test_unknown_method() {
        assert_eq!(
            call("s", "frobnicate", &[]),
            Err(EvalError::AttributeError {
                type_name: "str".to_string(),
                attr: "frobnicate".to_string(),
            })
        );
    }
}
