//! The standard catalog of adapted math functions and constants
//!
//! A static table of `(name, arity, precedence, kind)` records. Loading it
//! into an [`AdapterRegistry`](crate::AdapterRegistry) turns each record
//! into an adapter or a named constant.

use crate::eval::binary::eval_binary;
use crate::eval::method::less_than;
use crate::expr::{BinaryOp, Precedence};
use crate::value::{Kwargs, VARIADIC};
use crate::{EvalError, Value};

/// Native function signature used by catalog records.
pub type CatalogFn = fn(&[Value], &Kwargs) -> Result<Value, EvalError>;

/// What a catalog record provides.
#[derive(Clone, Copy)]
pub enum CatalogKind {
    /// A function adapter
    Function(CatalogFn),
    /// A named numeric constant
    Constant(f64),
}

/// One catalog record.
#[derive(Clone, Copy)]
pub struct CatalogEntry {
    /// Display and lookup name
    pub name: &'static str,
    /// Declared arity, `VARIADIC` for any
    pub arity: i32,
    /// Precedence of the printed form
    pub precedence: Precedence,
    /// Function or constant
    pub kind: CatalogKind,
}

const fn function(name: &'static str, arity: i32, func: CatalogFn) -> CatalogEntry {
    CatalogEntry {
        name,
        arity,
        precedence: Precedence::POSTFIX,
        kind: CatalogKind::Function(func),
    }
}

const fn constant(name: &'static str, value: f64) -> CatalogEntry {
    CatalogEntry {
        name,
        arity: 0,
        precedence: Precedence::ATOM,
        kind: CatalogKind::Constant(value),
    }
}

/// The catalog records.
pub static CATALOG: &[CatalogEntry] = &[
    function("sin", 1, sin),
    function("cos", 1, cos),
    function("tan", 1, tan),
    function("asin", 1, asin),
    function("acos", 1, acos),
    function("atan", 1, atan),
    function("exp", 1, exp),
    function("log", VARIADIC, log),
    function("log10", 1, log10),
    function("sqrt", 1, sqrt),
    function("floor", 1, floor),
    function("ceil", 1, ceil),
    function("trunc", 1, trunc),
    function("fabs", 1, fabs),
    function("isfinite", 1, isfinite),
    function("isnan", 1, isnan),
    function("min", VARIADIC, min),
    function("max", VARIADIC, max),
    function("sum", VARIADIC, sum),
    constant("pi", std::f64::consts::PI),
    constant("e", std::f64::consts::E),
    constant("tau", std::f64::consts::TAU),
    constant("inf", f64::INFINITY),
    constant("nan", f64::NAN),
];

// ═══════════════════════════════════════════════════════════════════════
// Math Functions
// ═══════════════════════════════════════════════════════════════════════

fn float_arg(name: &str, value: &Value) -> Result<f64, EvalError> {
    value.as_f64().ok_or_else(|| {
        EvalError::TypeError(format!(
            "{}() must be a real number, not {}",
            name,
            value.type_name()
        ))
    })
}

fn domain_error() -> EvalError {
    EvalError::ValueError("math domain error".to_string())
}

fn first(args: &[Value]) -> &Value {
    args.first().unwrap_or(&Value::None)
}

macro_rules! float_function {
    ($($name:ident => $body:expr;)+) => {
        $(
            fn $name(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
                let x = float_arg(stringify!($name), first(args))?;
                let f: fn(f64) -> Result<Value, EvalError> = $body;
                f(x)
            }
        )+
    };
}

float_function! {
    sin => |x| Ok(Value::Float(x.sin()));
    cos => |x| Ok(Value::Float(x.cos()));
    tan => |x| Ok(Value::Float(x.tan()));
    asin => |x| if (-1.0..=1.0).contains(&x) { Ok(Value::Float(x.asin())) } else { Err(domain_error()) };
    acos => |x| if (-1.0..=1.0).contains(&x) { Ok(Value::Float(x.acos())) } else { Err(domain_error()) };
    atan => |x| Ok(Value::Float(x.atan()));
    exp => |x| Ok(Value::Float(x.exp()));
    log10 => |x| if x > 0.0 { Ok(Value::Float(x.log10())) } else { Err(domain_error()) };
    sqrt => |x| if x >= 0.0 { Ok(Value::Float(x.sqrt())) } else { Err(domain_error()) };
    fabs => |x| Ok(Value::Float(x.abs()));
    isfinite => |x| Ok(Value::Bool(x.is_finite()));
    isnan => |x| Ok(Value::Bool(x.is_nan()));
}

fn log(args: &[Value], kwargs: &Kwargs) -> Result<Value, EvalError> {
    if kwargs.contains_key("base") && args.len() == 1 {
        let base = kwargs.get("base").cloned().unwrap_or(Value::None);
        return log(&[args[0].clone(), base], &Kwargs::new());
    }
    let x = match args {
        [x] | [x, _] => float_arg("log", x)?,
        _ => {
            return Err(EvalError::TypeError(format!(
                "log expected 1 or 2 arguments, got {}",
                args.len()
            )))
        }
    };
    if x <= 0.0 {
        return Err(domain_error());
    }
    match args.get(1) {
        None => Ok(Value::Float(x.ln())),
        Some(base) => {
            let base = float_arg("log", base)?;
            if base <= 0.0 || base == 1.0 {
                return Err(if base == 1.0 {
                    EvalError::ZeroDivision
                } else {
                    domain_error()
                });
            }
            Ok(Value::Float(x.ln() / base.ln()))
        }
    }
}

fn to_int(x: f64) -> Result<Value, EvalError> {
    if !x.is_finite() {
        return Err(EvalError::ValueError(format!(
            "cannot convert float {} to integer",
            Value::Float(x).repr()
        )));
    }
    if x < i64::MIN as f64 || x >= i64::MAX as f64 {
        return Err(EvalError::IntegerOverflow);
    }
    Ok(Value::Int(x as i64))
}

fn integral(name: &str, args: &[Value], round: fn(f64) -> f64) -> Result<Value, EvalError> {
    match first(args) {
        value @ (Value::Int(_) | Value::Bool(_)) => {
            Ok(Value::Int(value.as_i64().unwrap_or_default()))
        }
        value => to_int(round(float_arg(name, value)?)),
    }
}

fn floor(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    integral("floor", args, f64::floor)
}

fn ceil(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    integral("ceil", args, f64::ceil)
}

fn trunc(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
    integral("trunc", args, f64::trunc)
}

// ═══════════════════════════════════════════════════════════════════════
// Aggregates
// ═══════════════════════════════════════════════════════════════════════

/// A single iterable argument, or the arguments themselves.
fn candidates<'a>(name: &str, args: &'a [Value]) -> Result<&'a [Value], EvalError> {
    let items = match args {
        [single] => single.as_sequence().ok_or_else(|| {
            EvalError::TypeError(format!("'{}' object is not iterable", single.type_name()))
        })?,
        many => many,
    };
    if items.is_empty() {
        return Err(EvalError::ValueError(format!("{}() arg is an empty sequence", name)));
    }
    Ok(items)
}

fn extreme(name: &str, args: &[Value], kwargs: &Kwargs, want_less: bool) -> Result<Value, EvalError> {
    if let Some(key) = kwargs.keys().next() {
        return Err(EvalError::TypeError(format!(
            "{}() got an unexpected keyword argument '{}'",
            name, key
        )));
    }
    let items = candidates(name, args)?;
    let mut best = &items[0];
    for item in &items[1..] {
        let better = if want_less {
            less_than(item, best)?
        } else {
            less_than(best, item)?
        };
        if better {
            best = item;
        }
    }
    Ok(best.clone())
}

fn min(args: &[Value], kwargs: &Kwargs) -> Result<Value, EvalError> {
    extreme("min", args, kwargs, true)
}

fn max(args: &[Value], kwargs: &Kwargs) -> Result<Value, EvalError> {
    extreme("max", args, kwargs, false)
}

fn sum(args: &[Value], kwargs: &Kwargs) -> Result<Value, EvalError> {
    let (iterable, start) = match args {
        [iterable] => (iterable, kwargs.get("start").cloned().unwrap_or(Value::Int(0))),
        [iterable, start] => (iterable, start.clone()),
        _ => {
            return Err(EvalError::TypeError(format!(
                "sum() takes 1 or 2 arguments, got {}",
                args.len()
            )))
        }
    };
    let items = iterable.as_sequence().ok_or_else(|| {
        EvalError::TypeError(format!("'{}' object is not iterable", iterable.type_name()))
    })?;
    items
        .iter()
        .try_fold(start, |total, item| eval_binary(BinaryOp::Add, &total, item))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Result<Value, EvalError> {
        let entry = CATALOG.iter().find(|entry| entry.name == name).unwrap();
        match entry.kind {
            CatalogKind::Function(func) => func(args, &Kwargs::new()),
            CatalogKind::Constant(value) => Ok(Value::Float(value)),
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = CATALOG.iter().map(|entry| entry.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn test_math_functions() {
        assert_eq!(call("sqrt", &[Value::Int(16)]).unwrap(), Value::Float(4.0));
        assert_eq!(call("floor", &[Value::Float(-1.5)]).unwrap(), Value::Int(-2));
        assert_eq!(call("ceil", &[Value::Float(1.2)]).unwrap(), Value::Int(2));
        assert_eq!(call("isnan", &[Value::Float(f64::NAN)]).unwrap(), Value::Bool(true));
        assert_eq!(
            call("sqrt", &[Value::Int(-1)]),
            Err(EvalError::ValueError("math domain error".to_string()))
        );
    }

    #[test]
    fn test_log_with_base() {
        let value = call("log", &[Value::Int(1000), Value::Int(10)]).unwrap();
        let x = value.as_f64().unwrap();
        assert!((x - 3.0).abs() < 1e-12);
        assert!(call("log", &[Value::Int(0)]).is_err());
    }

    #[test]
    fn test_aggregates() {
        let list = Value::list(vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
        assert_eq!(call("min", &[list.clone()]).unwrap(), Value::Int(1));
        assert_eq!(call("max", &[Value::Int(4), Value::Int(9)]).unwrap(), Value::Int(9));
        assert_eq!(call("sum", &[list]).unwrap(), Value::Int(6));
        assert!(call("min", &[Value::list(vec![])]).is_err());
    }
}
