//! Callable wrappers around finished expressions
//!
//! A [`Lambda`] freezes an [`Expr`]: calling it evaluates the tree, and its
//! `Display` form is the printed expression, rendered once on first use.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::eval;
use crate::expr::Expr;
use crate::printer::{self, OPAQUE_MARKER};
use crate::value::Kwargs;
use crate::{EvalContext, EvalError, NativeFn, ReprError, Value};

/// A single-argument function built from an expression.
#[derive(Clone)]
pub struct Lambda {
    expr: Expr,
    repr_enabled: bool,
    display: Arc<OnceLock<String>>,
}

impl Lambda {
    /// Wrap `expr`.
    pub fn new(expr: Expr) -> Self {
        Self {
            repr_enabled: expr.repr_enabled(),
            expr,
            display: Arc::new(OnceLock::new()),
        }
    }

    /// Evaluate the wrapped expression with `input` bound to its variable.
    ///
    /// # Errors
    ///
    /// Whatever the failing operation raised, annotated with the
    /// sub-expression it came from.
    pub fn call(&self, input: impl Into<Value>) -> Result<Value, EvalError> {
        eval::evaluate(&self.expr, &input.into())
    }

    /// Evaluate with an explicit context.
    ///
    /// # Errors
    ///
    /// See [`Lambda::call`].
    pub fn call_with(&self, input: &Value, ctx: &EvalContext) -> Result<Value, EvalError> {
        eval::evaluate_with(&self.expr, input, ctx)
    }

    /// A plain closure performing [`Lambda::call`].
    pub fn as_fn(&self) -> impl Fn(Value) -> Result<Value, EvalError> + Send + Sync + 'static {
        let expr = self.expr.clone();
        move |input| eval::evaluate(&expr, &input)
    }

    /// Name of the parameter, `None` for a closed expression.
    pub fn param_name(&self) -> Option<&str> {
        self.expr.variable().map(|var| var.name())
    }

    /// The wrapped expression
    pub fn as_expr(&self) -> &Expr {
        &self.expr
    }

    /// Printed form of the wrapped expression.
    ///
    /// # Errors
    ///
    /// `ReprError::Disabled` when printing is switched off.
    pub fn try_repr(&self) -> Result<&str, ReprError> {
        if self.repr_enabled {
            Ok(self.rendered())
        } else {
            Err(ReprError::Disabled)
        }
    }

    /// Copy of this wrapper with printing switched on or off.
    pub fn with_repr(&self, enabled: bool) -> Self {
        Self {
            expr: self.expr.clone(),
            repr_enabled: enabled,
            display: Arc::clone(&self.display),
        }
    }

    /// A native function value calling this lambda, named after its printed form.
    ///
    /// The native function takes exactly one argument.
    pub fn to_native(&self) -> NativeFn {
        let name = match self.try_repr() {
            Ok(repr) => repr.to_string(),
            Err(_) => OPAQUE_MARKER.to_string(),
        };
        let expr = self.expr.clone();
        NativeFn::new(name, 1, move |args: &[Value], _: &Kwargs| {
            eval::evaluate(&expr, args.first().unwrap_or(&Value::None))
        })
    }

    fn rendered(&self) -> &str {
        self.display.get_or_init(|| printer::render(&self.expr.with_repr(true)))
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_repr() {
            Ok(repr) => f.write_str(repr),
            Err(_) => f.write_str(OPAQUE_MARKER),
        }
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.param_name() {
            Some(param) => write!(f, "Lambda({} -> {})", param, self),
            None => write!(f, "Lambda({})", self),
        }
    }
}

impl From<Expr> for Lambda {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}

impl From<&Expr> for Lambda {
    fn from(expr: &Expr) -> Self {
        Self::new(expr.clone())
    }
}

/// Freeze an expression into a [`Lambda`].
pub fn lambda(expr: &Expr) -> Lambda {
    Lambda::new(expr.clone())
}

/// Freeze several expressions at once.
///
/// ```
/// use lazylambda::{lambdas, vars::x, Value};
///
/// let functions = lambdas([x() * 2, x().pow(2)]);
/// assert_eq!(functions[0].call(3).unwrap(), Value::Int(6));
/// assert_eq!(functions[1].to_string(), "x ** 2");
/// ```
pub fn lambdas<I>(exprs: I) -> Vec<Lambda>
where
    I: IntoIterator,
    I::Item: Into<Lambda>,
{
    exprs.into_iter().map(Into::into).collect()
}

// ═══════════════════════════════════════════════════════════════════════
// FunctionLike
// ═══════════════════════════════════════════════════════════════════════

/// Anything a consumer might accept where a function is expected: an
/// already wrapped lambda, a still deferred expression, or a plain value.
#[derive(Clone, Debug)]
pub enum FunctionLike {
    /// A finished wrapper
    Lambda(Lambda),
    /// An expression that has not been wrapped yet
    Expr(Expr),
    /// Any other value, native functions included
    Value(Value),
}

impl FunctionLike {
    /// Whether this is a deferred expression that still needs wrapping
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Expr(_))
    }

    /// Wrap a deferred expression; everything else is returned unchanged.
    pub fn to_function(self) -> Self {
        match self {
            Self::Expr(expr) => Self::Lambda(Lambda::new(expr)),
            other => other,
        }
    }

    /// Call this as a one-argument function.
    ///
    /// Expressions are evaluated as if wrapped first.
    ///
    /// # Errors
    ///
    /// `NotCallable` for non-function values, or whatever the call raises.
    pub fn call(&self, input: impl Into<Value>) -> Result<Value, EvalError> {
        let input = input.into();
        match self {
            Self::Lambda(lambda) => eval::evaluate(lambda.as_expr(), &input),
            Self::Expr(expr) => eval::evaluate(expr, &input),
            Self::Value(callee) => {
                eval::call::call_value(callee, std::slice::from_ref(&input), &Kwargs::new())
            }
        }
    }
}

impl From<Lambda> for FunctionLike {
    fn from(lambda: Lambda) -> Self {
        Self::Lambda(lambda)
    }
}

impl From<Expr> for FunctionLike {
    fn from(expr: Expr) -> Self {
        Self::Expr(expr)
    }
}

impl From<&Expr> for FunctionLike {
    fn from(expr: &Expr) -> Self {
        Self::Expr(expr.clone())
    }
}

impl From<Value> for FunctionLike {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Produce a function from `value`, wrapping it if it is still deferred.
pub fn as_function(value: impl Into<FunctionLike>) -> FunctionLike {
    value.into().to_function()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_call_and_display() {
        let x = vars::x();
        let f = lambda(&(&x * 2 + 1));
        assert_eq!(f.call(4).unwrap(), Value::Int(9));
        assert_eq!(f.to_string(), "x * 2 + 1");
        assert_eq!(f.try_repr().unwrap(), "x * 2 + 1");
        assert_eq!(f.param_name(), Some("x"));
        assert_eq!(format!("{:?}", f), "Lambda(x -> x * 2 + 1)");
    }

    #[test]
    fn test_as_fn_closure() {
        let s = vars::s();
        let upper = s.method("upper", ()).as_function().as_fn();
        let words: Vec<Value> = ["a", "bc"]
            .into_iter()
            .map(|w| upper(Value::from(w)).unwrap())
            .collect();
        assert_eq!(words, vec![Value::from("A"), Value::from("BC")]);
    }

    #[test]
    fn test_repr_disabled() {
        let f = lambda(&vars::x()).with_repr(false);
        assert_eq!(f.try_repr(), Err(ReprError::Disabled));
        assert_eq!(f.to_string(), OPAQUE_MARKER);
        assert_eq!(f.call(1).unwrap(), Value::Int(1));

        let from_expr = Lambda::new(vars::x().with_repr(false));
        assert_eq!(from_expr.try_repr(), Err(ReprError::Disabled));
    }

    #[test]
    fn test_closed_lambda_has_no_parameter() {
        let f = lambda(&Expr::literal(3));
        assert_eq!(f.param_name(), None);
        assert_eq!(f.call(()).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_function_like() {
        let x = vars::x();
        let deferred = FunctionLike::from(&x + 1);
        assert!(deferred.is_deferred());
        let wrapped = as_function(&x + 1);
        assert!(!wrapped.is_deferred());
        assert!(matches!(wrapped, FunctionLike::Lambda(_)));
        assert_eq!(wrapped.call(1).unwrap(), Value::Int(2));

        let native = FunctionLike::from(Value::Function(lambda(&(&x * 3)).to_native()));
        assert_eq!(native.clone().to_function().call(2).unwrap(), Value::Int(6));
        assert!(FunctionLike::from(Value::Int(1)).call(1).is_err());
    }
}
