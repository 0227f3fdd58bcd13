//! Error types for building, evaluating and printing lambda expressions

use thiserror::Error;

use crate::Value;

/// Errors raised while an expression tree is being built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    /// Two distinct input variables were combined in one expression
    #[error(
        "it is not allowed to combine several input variables (`{left}` and `{right}`) \
         in the same expression"
    )]
    MixedVariables {
        /// Name of the variable already present in the tree
        left: String,
        /// Name of the conflicting variable
        right: String,
    },

    /// A host-checked operation was applied to a deferred expression
    #[error("`{op}` cannot be applied to a lambda expression; use the `{workaround}` replacement instead")]
    Unsupported {
        /// The native operation that was attempted
        op: &'static str,
        /// The constructor that builds the equivalent node
        workaround: &'static str,
    },

    /// Variable names must be identifiers
    #[error("invalid variable name {0:?}: expected a non-empty identifier such as `x`")]
    InvalidVariableName(String),

    /// A closure or function pointer was adapted without a display name
    #[error("`{0}` has no usable name (it is a closure or a function pointer), so a display name is mandatory")]
    AnonymousTarget(String),

    /// All operands were literals and the eager evaluation failed
    #[error("evaluating `{expr}` failed: {source}")]
    Eager {
        /// Rendering of the operation that failed
        expr: String,
        /// The underlying evaluation error
        #[source]
        source: EvalError,
    },
}

/// Errors raised while evaluating an expression against an input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Binary operator applied to incompatible operands
    #[error("unsupported operand type(s) for {op}: '{left_type}' and '{right_type}'")]
    InvalidBinaryOperands {
        /// Operator symbol
        op: String,
        /// Left operand type name
        left_type: String,
        /// Right operand type name
        right_type: String,
    },

    /// Unary operator applied to an incompatible operand
    #[error("bad operand type for unary {op}: '{operand_type}'")]
    InvalidUnaryOperand {
        /// Operator symbol
        op: String,
        /// Operand type name
        operand_type: String,
    },

    /// Division or modulo by zero
    #[error("division by zero")]
    ZeroDivision,

    /// Integer result does not fit in 64 bits
    #[error("integer overflow")]
    IntegerOverflow,

    /// Missing mapping key
    #[error("key not found: {0}")]
    KeyError(String),

    /// Sequence index out of range
    #[error("{0} index out of range")]
    IndexError(String),

    /// Unknown attribute or method
    #[error("'{type_name}' object has no attribute '{attr}'")]
    AttributeError {
        /// Type of the receiver
        type_name: String,
        /// Requested attribute
        attr: String,
    },

    /// Call on a value that is not a function
    #[error("'{0}' object is not callable")]
    NotCallable(String),

    /// Wrong number of arguments for a native function
    #[error("{name}() takes {expected} argument(s) but {got} were given")]
    ArityMismatch {
        /// Function name
        name: String,
        /// Declared arity
        expected: usize,
        /// Number of arguments received
        got: usize,
    },

    /// Value cannot be used as a mapping key
    #[error("unhashable type: '{0}'")]
    Unhashable(String),

    /// Generic type error raised by a native operation
    #[error("type error: {0}")]
    TypeError(String),

    /// Generic value error raised by a native operation
    #[error("value error: {0}")]
    ValueError(String),

    /// The tree is deeper than the configured limit
    #[error("maximum evaluation depth ({0}) exceeded")]
    DepthExceeded(usize),

    /// Error raised while applying the operation of a sub-expression
    #[error("{source} (while evaluating `{expr}`)")]
    InExpression {
        /// Rendering of the failing sub-expression
        expr: String,
        /// The error raised by the operation
        #[source]
        source: Box<EvalError>,
    },
}

impl EvalError {
    /// The error raised by the operation itself, without location context.
    pub fn root_cause(&self) -> &EvalError {
        match self {
            EvalError::InExpression { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The rendering of the sub-expression that failed, if known.
    pub fn failing_expr(&self) -> Option<&str> {
        match self {
            EvalError::InExpression { expr, .. } => Some(expr),
            _ => None,
        }
    }

    pub(crate) fn in_expression(self, expr: impl FnOnce() -> String) -> Self {
        match self {
            located @ EvalError::InExpression { .. } => located,
            other => EvalError::InExpression {
                expr: expr(),
                source: Box::new(other),
            },
        }
    }

    pub(crate) fn binary(op: &str, left: &Value, right: &Value) -> Self {
        EvalError::InvalidBinaryOperands {
            op: op.to_string(),
            left_type: type_name(left).to_string(),
            right_type: type_name(right).to_string(),
        }
    }

    pub(crate) fn unary(op: &str, operand: &Value) -> Self {
        EvalError::InvalidUnaryOperand {
            op: op.to_string(),
            operand_type: type_name(operand).to_string(),
        }
    }
}

/// Errors raised when a string representation is requested.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReprError {
    /// Representation was switched off for the expression or wrapper
    #[error("string representation is disabled for this lambda expression")]
    Disabled,
}

/// Main error type for lazylambda operations
#[derive(Error, Debug)]
pub enum LambdaError {
    /// Building a tree failed
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Evaluating a tree failed
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Printing a tree failed
    #[error(transparent)]
    Repr(#[from] ReprError),
}

/// Result type alias for lazylambda operations
pub type Result<T> = std::result::Result<T, LambdaError>;

/// Type name of a value, used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::None => "NoneType",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::Str(_) => "str",
        Value::List(_) => "list",
        Value::Tuple(_) => "tuple",
        Value::Dict(_) => "dict",
        Value::Slice(_) => "slice",
        Value::Record(_) => "record",
        Value::Function(_) => "function",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_strips_location() {
        let err = EvalError::ZeroDivision.in_expression(|| "x / 0".to_string());
        assert_eq!(err.root_cause(), &EvalError::ZeroDivision);
        assert_eq!(err.failing_expr(), Some("x / 0"));
        assert_eq!(
            err.to_string(),
            "division by zero (while evaluating `x / 0`)"
        );
    }

    #[test]
    fn test_location_attached_once() {
        let inner = EvalError::ZeroDivision.in_expression(|| "x / 0".to_string());
        let outer = inner.in_expression(|| "(x / 0) + 1".to_string());
        assert_eq!(outer.failing_expr(), Some("x / 0"));
    }

    #[test]
    fn test_binary_error_message() {
        let err = EvalError::binary("+", &Value::Int(1), &Value::from("a"));
        assert_eq!(
            err.to_string(),
            "unsupported operand type(s) for +: 'int' and 'str'"
        );
    }

    #[test]
    fn test_lambda_error_from() {
        let err: LambdaError = ReprError::Disabled.into();
        assert!(matches!(err, LambdaError::Repr(ReprError::Disabled)));
    }
}
