//! Workaround constructors
//!
//! Rust's `usize`, `bool`, `String` conversions and the `for` protocol can't
//! return a deferred expression, and `&&`, `||` or `!` on truth values have
//! no capturable form. These functions build the equivalent nodes instead:
//! `len(&l)` prints as `len(l)` and evaluates to the length.
//!
//! Called with literals only, each runs immediately like any other
//! operation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::adapter::Adapter;
use crate::eval::binary::eval_binary;
use crate::eval::format::format_value;
use crate::expr::{built, BinaryOp, CompareOp, Expr, Op, UnaryOp};
use crate::value::{HashableValue, Kwargs, NativeFn};
use crate::{EvalError, Value};

type Builtin = fn(&[Value], &Kwargs) -> Result<Value, EvalError>;

#[track_caller]
fn call_builtin(name: &'static str, arity: i32, func: Builtin, args: Vec<Expr>) -> Expr {
    let adapter = Adapter::function(name, NativeFn::new(name, arity, func));
    built(Expr::apply(Op::Apply(adapter), args, IndexMap::new()))
}

macro_rules! builtin {
    ($(#[$doc:meta])* $fn_name:ident => $name:literal, $func:ident($($arg:ident),+)) => {
        $(#[$doc])*
        ///
        /// # Panics
        ///
        /// Panics if the arguments refer to different input variables, or
        /// if every argument is a literal and the call fails.
        #[track_caller]
        pub fn $fn_name($($arg: impl Into<Expr>),+) -> Expr {
            let arity = [$(stringify!($arg)),+].len() as i32;
            call_builtin($name, arity, $func, vec![$($arg.into()),+])
        }
    };
}

builtin!(
    /// `len(value)`: length of a string, list, tuple or dict.
    len => "len", eval_len(value)
);
builtin!(
    /// `int(value)`: truncates floats and parses strings.
    int => "int", eval_int(value)
);
builtin!(
    /// `float(value)`
    float => "float", eval_float(value)
);
builtin!(
    /// `bool(value)`: the truth value.
    bool_ => "bool", eval_bool(value)
);
builtin!(
    /// `str(value)`
    str_ => "str", eval_str(value)
);
builtin!(
    /// `repr(value)`
    repr => "repr", eval_repr(value)
);
builtin!(
    /// `hash(value)`; only hashable values succeed.
    hash => "hash", eval_hash(value)
);
builtin!(
    /// `format(value, spec)`
    format => "format", eval_format(value, spec)
);
builtin!(
    /// `any(iterable)`
    any => "any", eval_any(iterable)
);
builtin!(
    /// `all(iterable)`
    all => "all", eval_all(iterable)
);
builtin!(
    /// `iter(iterable)`, materialized as a list.
    iter => "iter", eval_iter(iterable)
);
builtin!(
    /// `reversed(iterable)`, materialized as a list.
    reversed => "reversed", eval_reversed(iterable)
);
builtin!(
    /// `abs(value)`
    abs => "abs", eval_abs(value)
);
builtin!(
    /// `round(value, ndigits)`; pass `()` for `ndigits` to round to an int.
    /// Ties go to the even neighbour.
    round => "round", eval_round(value, ndigits)
);
builtin!(
    /// `divmod(a, b)`, the tuple `(a // b, a % b)`.
    divmod => "divmod", eval_divmod(a, b)
);

/// `not value`
///
/// # Panics
///
/// Panics only if `value` is a literal (never for deferred operands).
#[track_caller]
pub fn not_(value: impl Into<Expr>) -> Expr {
    built(Expr::try_unary(UnaryOp::Not, value))
}

/// `item in container`
#[track_caller]
pub fn is_in(item: impl Into<Expr>, container: impl Into<Expr>) -> Expr {
    built(Expr::try_compare(CompareOp::In, item, container))
}

/// `item not in container`
#[track_caller]
pub fn not_in(item: impl Into<Expr>, container: impl Into<Expr>) -> Expr {
    built(Expr::try_compare(CompareOp::NotIn, item, container))
}

/// `container[key]`
///
/// Use [`slice`] for the key to print the colon form: `get(&l, slice(1, (), ()))`
/// prints as `l[1:]`.
#[track_caller]
pub fn get(container: impl Into<Expr>, key: impl Into<Expr>) -> Expr {
    built(container.into().try_get(key))
}

/// `slice(start, stop, step)`; pass `()` for an omitted bound.
#[track_caller]
pub fn slice(start: impl Into<Expr>, stop: impl Into<Expr>, step: impl Into<Expr>) -> Expr {
    built(Expr::apply(
        Op::Slice,
        vec![start.into(), stop.into(), step.into()],
        IndexMap::new(),
    ))
}

// ═══════════════════════════════════════════════════════════════════════
// Implementations
// ═══════════════════════════════════════════════════════════════════════

fn single(args: &[Value]) -> &Value {
    args.first().unwrap_or(&Value::None)
}

fn items_of(value: &Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::List(items) | Value::Tuple(items) => Ok(items.to_vec()),
        Value::Dict(entries) => Ok(entries.keys().map(|key| key.value().clone()).collect()),
        Value::Str(s) => Ok(s.chars().map(Value::from).collect()),
        other => Err(EvalError::TypeError(format!(
            "'{}' object is not iterable",
            other.type_name()
        ))),
    }
}

fn eval_len(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    let len = match single(args) {
        Value::Str(s) => s.chars().count(),
        Value::List(items) | Value::Tuple(items) => items.len(),
        Value::Dict(entries) => entries.len(),
        other => {
            return Err(EvalError::TypeError(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )))
        }
    };
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| EvalError::IntegerOverflow)
}

fn eval_int(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    match single(args) {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Float(x) if !x.is_finite() => Err(EvalError::ValueError(format!(
            "cannot convert float {} to integer",
            Value::Float(*x).repr()
        ))),
        Value::Float(x) => {
            let truncated = x.trunc();
            if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                return Err(EvalError::IntegerOverflow);
            }
            Ok(Value::Int(truncated as i64))
        }
        Value::Str(s) => s
            .trim()
            .replace('_', "")
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| {
                EvalError::ValueError(format!(
                    "invalid literal for int() with base 10: {}",
                    Value::from(s.as_str()).repr()
                ))
            }),
        other => Err(EvalError::TypeError(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn eval_float(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    match single(args) {
        Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            EvalError::ValueError(format!(
                "could not convert string to float: {}",
                Value::from(s.as_str()).repr()
            ))
        }),
        other => other.as_f64().map(Value::Float).ok_or_else(|| {
            EvalError::TypeError(format!(
                "float() argument must be a string or a number, not '{}'",
                other.type_name()
            ))
        }),
    }
}

fn eval_bool(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    Ok(Value::Bool(single(args).is_truthy()))
}

fn eval_str(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    Ok(Value::from(single(args).to_string()))
}

fn eval_repr(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    Ok(Value::from(single(args).repr()))
}

fn eval_hash(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    let key = HashableValue::new(single(args).clone())?;
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    Ok(Value::Int(hasher.finish() as i64))
}

fn eval_format(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    match args {
        [value, Value::Str(spec)] => Ok(Value::from(format_value(value, spec)?)),
        [value, Value::None] => Ok(Value::from(format_value(value, "")?)),
        [_, spec] => Err(EvalError::TypeError(format!(
            "format() argument 2 must be str, not {}",
            spec.type_name()
        ))),
        _ => Err(EvalError::TypeError("format() takes 2 arguments".to_string())),
    }
}

fn eval_any(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    let items = items_of(single(args))?;
    Ok(Value::Bool(items.iter().any(Value::is_truthy)))
}

fn eval_all(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    let items = items_of(single(args))?;
    Ok(Value::Bool(items.iter().all(Value::is_truthy)))
}

fn eval_iter(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    Ok(Value::list(items_of(single(args))?))
}

fn eval_reversed(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    let mut items = items_of(single(args))?;
    items.reverse();
    Ok(Value::list(items))
}

fn eval_abs(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    match single(args) {
        Value::Int(n) => n.checked_abs().map(Value::Int).ok_or(EvalError::IntegerOverflow),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => Err(EvalError::TypeError(format!(
            "bad operand type for abs(): '{}'",
            other.type_name()
        ))),
    }
}

fn eval_round(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    let (value, ndigits) = match args {
        [value, ndigits] => (value, ndigits),
        _ => return Err(EvalError::TypeError("round() takes 2 arguments".to_string())),
    };
    let ndigits = match ndigits {
        Value::None => None,
        Value::Int(n) => Some(*n),
        other => {
            return Err(EvalError::TypeError(format!(
                "'{}' object cannot be interpreted as an integer",
                other.type_name()
            )))
        }
    };
    match (value, ndigits) {
        (Value::Int(_) | Value::Bool(_), None) => {
            Ok(Value::Int(value.as_i64().unwrap_or_default()))
        }
        (Value::Int(n), Some(digits)) if digits >= 0 => Ok(Value::Int(*n)),
        (Value::Int(n), Some(digits)) => {
            let scale = u32::try_from(-digits)
                .ok()
                .and_then(|exp| 10_i64.checked_pow(exp));
            match scale {
                Some(scale) => {
                    let rounded = (*n as f64 / scale as f64).round_ties_even() as i64;
                    rounded.checked_mul(scale).map(Value::Int).ok_or(EvalError::IntegerOverflow)
                }
                None => Ok(Value::Int(0)),
            }
        }
        (Value::Float(x), None) => {
            let rounded = x.round_ties_even();
            if !rounded.is_finite() {
                return Err(EvalError::ValueError(format!(
                    "cannot convert float {} to integer",
                    value.repr()
                )));
            }
            if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
                return Err(EvalError::IntegerOverflow);
            }
            Ok(Value::Int(rounded as i64))
        }
        (Value::Float(x), Some(digits)) => {
            let scale = 10_f64.powi(i32::try_from(digits).unwrap_or(i32::MAX));
            if !scale.is_finite() || scale == 0.0 {
                return Ok(Value::Float(*x));
            }
            Ok(Value::Float((x * scale).round_ties_even() / scale))
        }
        (other, _) => Err(EvalError::TypeError(format!(
            "type {} doesn't define __round__ method",
            other.type_name()
        ))),
    }
}

fn eval_divmod(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    match args {
        [a, b] => Ok(Value::tuple(vec![
            eval_binary(BinaryOp::FloorDiv, a, b)?,
            eval_binary(BinaryOp::Mod, a, b)?,
        ])),
        _ => Err(EvalError::TypeError("divmod expected 2 arguments".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_len_is_deferred() {
        let l = vars::l();
        let expr = len(&l);
        assert_eq!(expr.to_repr().unwrap(), "len(l)");
        let input = Value::list(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(expr.evaluate(input).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_literal_arguments_run_immediately() {
        assert_eq!(len("abc").literal_value(), Some(&Value::Int(3)));
        assert_eq!(abs(-4).literal_value(), Some(&Value::Int(4)));
    }

    #[test]
    fn test_conversions() {
        let s = vars::s();
        assert_eq!(int(&s).evaluate(" 42 ").unwrap(), Value::Int(42));
        assert!(int(&s).evaluate("4x").is_err());
        assert_eq!(float(&s).evaluate("2.5").unwrap(), Value::Float(2.5));
        assert_eq!(str_(&vars::n()).evaluate(7).unwrap(), Value::from("7"));
        assert_eq!(repr(&s).evaluate("a").unwrap(), Value::from("'a'"));
        assert_eq!(bool_(&s).evaluate("").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_not_and_membership() {
        let x = vars::x();
        let expr = not_(x.gt(1));
        assert_eq!(expr.to_repr().unwrap(), "not x > 1");
        assert_eq!(expr.evaluate(0).unwrap(), Value::Bool(true));

        let l = vars::l();
        let member = is_in(2, &l);
        assert_eq!(member.to_repr().unwrap(), "2 in l");
        let input = Value::list(vec![Value::Int(2)]);
        assert_eq!(member.evaluate(input.clone()).unwrap(), Value::Bool(true));
        assert_eq!(not_in(2, &l).evaluate(input).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_get_with_slice() {
        let s = vars::s();
        let expr = get(&s, slice(1, (), ()));
        assert_eq!(expr.to_repr().unwrap(), "s[1:]");
        assert_eq!(expr.evaluate("abc").unwrap(), Value::from("bc"));
    }

    #[test]
    fn test_round_ties_to_even() {
        let x = vars::x();
        assert_eq!(round(&x, ()).evaluate(2.5).unwrap(), Value::Int(2));
        assert_eq!(round(&x, ()).evaluate(3.5).unwrap(), Value::Int(4));
        assert_eq!(round(&x, 1).evaluate(0.25).unwrap(), Value::Float(0.2));
        assert_eq!(round(&x, ()).to_repr().unwrap(), "round(x, None)");
    }

    #[test]
    fn test_divmod_and_aggregates() {
        let n = vars::n();
        let pair = Value::tuple(vec![Value::Int(-4), Value::Int(1)]);
        assert_eq!(divmod(&n, 3).evaluate(-11).unwrap(), pair);

        let l = vars::l();
        let input = Value::list(vec![Value::Int(0), Value::Int(1)]);
        assert_eq!(any(&l).evaluate(input.clone()).unwrap(), Value::Bool(true));
        assert_eq!(all(&l).evaluate(input.clone()).unwrap(), Value::Bool(false));
        let flipped = Value::list(vec![Value::Int(1), Value::Int(0)]);
        assert_eq!(reversed(&l).evaluate(input).unwrap(), flipped);
    }

    #[test]
    fn test_format_and_hash() {
        let x = vars::x();
        let expr = format(&x, ".2f");
        assert_eq!(expr.to_repr().unwrap(), "format(x, '.2f')");
        assert_eq!(expr.evaluate(3.14159).unwrap(), Value::from("3.14"));
        assert!(hash(&vars::l()).evaluate(Value::list(vec![])).is_err());
        assert_eq!(
            hash(&vars::s()).evaluate("k").unwrap(),
            hash(&vars::s()).evaluate("k").unwrap()
        );
    }
}
