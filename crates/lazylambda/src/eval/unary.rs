//! Unary operation evaluation

use crate::expr::UnaryOp;
use crate::{EvalError, Value};

/// Apply a unary operator to a resolved value.
///
/// `~` on a boolean is logical negation, so that `!expr` reads naturally on
/// predicates; on integers it is bitwise inversion.
///
/// # Errors
///
/// `InvalidUnaryOperand` for non-numeric operands (`not` accepts anything),
/// `IntegerOverflow` when negating `i64::MIN`.
pub fn eval_unary(op: UnaryOp, operand: &Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Neg => eval_neg(operand),
        UnaryOp::Pos => eval_pos(operand),
        UnaryOp::Invert => eval_invert(operand),
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
    }
}

fn eval_neg(operand: &Value) -> Result<Value, EvalError> {
    match operand {
        Value::Int(n) => n.checked_neg().map(Value::Int).ok_or(EvalError::IntegerOverflow),
        Value::Bool(b) => Ok(Value::Int(-i64::from(*b))),
        Value::Float(x) => Ok(Value::Float(-x)),
        other => Err(EvalError::unary("-", other)),
    }
}

fn eval_pos(operand: &Value) -> Result<Value, EvalError> {
    match operand {
        Value::Int(_) | Value::Float(_) => Ok(operand.clone()),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        other => Err(EvalError::unary("+", other)),
    }
}

fn eval_invert(operand: &Value) -> Result<Value, EvalError> {
    match operand {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        Value::Int(n) => Ok(Value::Int(!n)),
        other => Err(EvalError::unary("~", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negation() {
        assert_eq!(eval_unary(UnaryOp::Neg, &Value::Int(3)).unwrap(), Value::Int(-3));
        assert_eq!(
            eval_unary(UnaryOp::Neg, &Value::Float(0.5)).unwrap(),
            Value::Float(-0.5)
        );
        assert_eq!(
            eval_unary(UnaryOp::Neg, &Value::Int(i64::MIN)),
            Err(EvalError::IntegerOverflow)
        );
        assert!(eval_unary(UnaryOp::Neg, &Value::from("a")).is_err());
    }

    #[test]
    fn test_invert() {
        assert_eq!(eval_unary(UnaryOp::Invert, &Value::Int(5)).unwrap(), Value::Int(-6));
        assert_eq!(
            eval_unary(UnaryOp::Invert, &Value::Bool(true)).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_not_uses_truthiness() {
        assert_eq!(eval_unary(UnaryOp::Not, &Value::from("")).unwrap(), Value::Bool(true));
        assert_eq!(eval_unary(UnaryOp::Not, &Value::Int(2)).unwrap(), Value::Bool(false));
    }
}
