//! Binary operation evaluation

use std::sync::Arc;

use crate::expr::BinaryOp;
use crate::{EvalError, Value};

/// A numeric operand after bool promotion.
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Num::Int(i64::from(*b))),
            Value::Int(n) => Some(Num::Int(*n)),
            Value::Float(x) => Some(Num::Float(*x)),
            _ => None,
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(x) => x,
        }
    }
}

/// Apply a binary operator to two resolved values.
///
/// # Errors
///
/// `InvalidBinaryOperands` for unsupported type pairs, `ZeroDivision`,
/// `IntegerOverflow`, or `ValueError` for negative shift counts.
pub fn eval_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => eval_add(left, right),
        BinaryOp::Sub => eval_sub(left, right),
        BinaryOp::Mul => eval_mul(left, right),
        BinaryOp::Div => eval_div(left, right),
        BinaryOp::FloorDiv => eval_floordiv(left, right),
        BinaryOp::Mod => eval_mod(left, right),
        BinaryOp::Pow => eval_pow(left, right),
        BinaryOp::Shl => eval_shl(left, right),
        BinaryOp::Shr => eval_shr(left, right),
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => eval_bitwise(op, left, right),
    }
}

fn numeric_pair(op: BinaryOp, left: &Value, right: &Value) -> Result<(Num, Num), EvalError> {
    match (Num::of(left), Num::of(right)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(EvalError::binary(op.as_symbol(), left, right)),
    }
}

fn overflow<T>(result: Option<T>) -> Result<T, EvalError> {
    result.ok_or(EvalError::IntegerOverflow)
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic Operations
// ═══════════════════════════════════════════════════════════════════════

fn eval_add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        // String concatenation
        (Value::Str(a), Value::Str(b)) => Ok(Value::string(format!("{}{}", a, b))),

        (Value::List(a), Value::List(b)) => Ok(Value::list(concat(a, b))),
        (Value::Tuple(a), Value::Tuple(b)) => Ok(Value::tuple(concat(a, b))),

        _ => match numeric_pair(BinaryOp::Add, left, right)? {
            (Num::Int(a), Num::Int(b)) => overflow(a.checked_add(b)).map(Value::Int),
            (a, b) => Ok(Value::Float(a.to_f64() + b.to_f64())),
        },
    }
}

fn concat(a: &Arc<Vec<Value>>, b: &Arc<Vec<Value>>) -> Vec<Value> {
    a.iter().chain(b.iter()).cloned().collect()
}

fn eval_sub(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match numeric_pair(BinaryOp::Sub, left, right)? {
        (Num::Int(a), Num::Int(b)) => overflow(a.checked_sub(b)).map(Value::Int),
        (a, b) => Ok(Value::Float(a.to_f64() - b.to_f64())),
    }
}

fn eval_mul(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        // Sequence repetition
        (Value::Str(s), count) | (count, Value::Str(s)) if is_int(count) => {
            Ok(Value::string(repeat_str(s, count)?))
        }
        (Value::List(items), count) | (count, Value::List(items)) if is_int(count) => {
            Ok(Value::list(repeat_items(items, count)?))
        }
        (Value::Tuple(items), count) | (count, Value::Tuple(items)) if is_int(count) => {
            Ok(Value::tuple(repeat_items(items, count)?))
        }

        _ => match numeric_pair(BinaryOp::Mul, left, right)? {
            (Num::Int(a), Num::Int(b)) => overflow(a.checked_mul(b)).map(Value::Int),
            (a, b) => Ok(Value::Float(a.to_f64() * b.to_f64())),
        },
    }
}

fn is_int(value: &Value) -> bool {
    matches!(value, Value::Int(_) | Value::Bool(_))
}

/// Repetition count for a sequence occupying `size` bytes. Negative counts
/// repeat zero times; a result larger than `isize::MAX` bytes is an overflow.
fn repeat_count(size: usize, count: &Value) -> Result<usize, EvalError> {
    let count = count
        .as_i64()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    match size.checked_mul(count) {
        Some(total) if isize::try_from(total).is_ok() => Ok(count),
        _ => Err(EvalError::IntegerOverflow),
    }
}

fn repeat_str(s: &str, count: &Value) -> Result<String, EvalError> {
    let count = repeat_count(s.len(), count)?;
    if s.is_empty() {
        return Ok(String::new());
    }
    let mut out = String::new();
    out.try_reserve_exact(s.len() * count)
        .map_err(|_| EvalError::IntegerOverflow)?;
    for _ in 0..count {
        out.push_str(s);
    }
    Ok(out)
}

fn repeat_items(items: &[Value], count: &Value) -> Result<Vec<Value>, EvalError> {
    let count = repeat_count(std::mem::size_of_val(items), count)?;
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    out.try_reserve_exact(items.len() * count)
        .map_err(|_| EvalError::IntegerOverflow)?;
    for _ in 0..count {
        out.extend_from_slice(items);
    }
    Ok(out)
}

fn eval_div(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (a, b) = numeric_pair(BinaryOp::Div, left, right)?;
    let divisor = b.to_f64();
    if divisor == 0.0 {
        return Err(EvalError::ZeroDivision);
    }
    Ok(Value::Float(a.to_f64() / divisor))
}

fn eval_floordiv(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match numeric_pair(BinaryOp::FloorDiv, left, right)? {
        (Num::Int(_), Num::Int(0)) => Err(EvalError::ZeroDivision),
        (Num::Int(a), Num::Int(b)) => {
            let quotient = overflow(a.checked_div(b))?;
            // Round toward negative infinity
            if a % b != 0 && ((a < 0) != (b < 0)) {
                Ok(Value::Int(quotient - 1))
            } else {
                Ok(Value::Int(quotient))
            }
        }
        (a, b) => {
            let divisor = b.to_f64();
            if divisor == 0.0 {
                return Err(EvalError::ZeroDivision);
            }
            Ok(Value::Float((a.to_f64() / divisor).floor()))
        }
    }
}

fn eval_mod(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match numeric_pair(BinaryOp::Mod, left, right)? {
        (Num::Int(_), Num::Int(0)) => Err(EvalError::ZeroDivision),
        (Num::Int(a), Num::Int(b)) => {
            // The result takes the sign of the divisor
            let rem = a.wrapping_rem(b);
            if rem != 0 && ((rem < 0) != (b < 0)) {
                Ok(Value::Int(rem + b))
            } else {
                Ok(Value::Int(rem))
            }
        }
        (a, b) => {
            let (a, b) = (a.to_f64(), b.to_f64());
            if b == 0.0 {
                return Err(EvalError::ZeroDivision);
            }
            let rem = a % b;
            if rem != 0.0 && ((rem < 0.0) != (b < 0.0)) {
                Ok(Value::Float(rem + b))
            } else {
                Ok(Value::Float(rem))
            }
        }
    }
}

fn eval_pow(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match numeric_pair(BinaryOp::Pow, left, right)? {
        (Num::Int(base), Num::Int(exp)) if exp >= 0 => {
            let exp = u32::try_from(exp).map_err(|_| EvalError::IntegerOverflow)?;
            overflow(base.checked_pow(exp)).map(Value::Int)
        }
        (base, exp) => {
            let (base, exp) = (base.to_f64(), exp.to_f64());
            if base == 0.0 && exp < 0.0 {
                return Err(EvalError::ZeroDivision);
            }
            if base < 0.0 && exp.fract() != 0.0 {
                return Err(EvalError::ValueError(
                    "negative number cannot be raised to a fractional power".to_string(),
                ));
            }
            Ok(Value::Float(base.powf(exp)))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Bitwise Operations
// ═══════════════════════════════════════════════════════════════════════

fn int_pair(op: BinaryOp, left: &Value, right: &Value) -> Result<(i64, i64), EvalError> {
    match (left, right) {
        (Value::Int(_) | Value::Bool(_), Value::Int(_) | Value::Bool(_)) => {
            match (left.as_i64(), right.as_i64()) {
                (Some(a), Some(b)) => Ok((a, b)),
                _ => Err(EvalError::binary(op.as_symbol(), left, right)),
            }
        }
        _ => Err(EvalError::binary(op.as_symbol(), left, right)),
    }
}

fn shift_count(count: i64) -> Result<i64, EvalError> {
    if count < 0 {
        Err(EvalError::ValueError("negative shift count".to_string()))
    } else {
        Ok(count)
    }
}

fn eval_shl(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (a, b) = int_pair(BinaryOp::Shl, left, right)?;
    let count = shift_count(b)?;
    if a == 0 {
        return Ok(Value::Int(0));
    }
    let count = u32::try_from(count)
        .ok()
        .filter(|c| *c < i64::BITS)
        .ok_or(EvalError::IntegerOverflow)?;
    let shifted = a << count;
    if shifted >> count != a {
        return Err(EvalError::IntegerOverflow);
    }
    Ok(Value::Int(shifted))
}

fn eval_shr(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (a, b) = int_pair(BinaryOp::Shr, left, right)?;
    let count = shift_count(b)?;
    match u32::try_from(count).ok().filter(|c| *c < i64::BITS) {
        Some(count) => Ok(Value::Int(a >> count)),
        None => Ok(Value::Int(if a < 0 { -1 } else { 0 })),
    }
}

fn eval_bitwise(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
        let result = match op {
            BinaryOp::BitAnd => a & b,
            BinaryOp::BitOr => a | b,
            _ => a ^ b,
        };
        return Ok(Value::Bool(result));
    }

    let (a, b) = int_pair(op, left, right)?;
    let result = match op {
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        _ => a ^ b,
    };
    Ok(Value::Int(result))
}
