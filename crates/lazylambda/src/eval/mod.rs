//! Expression evaluation

pub mod binary;
pub mod call;
pub mod compare;
pub mod field;
pub mod format;
pub mod index;
pub mod method;
pub mod unary;

use crate::expr::{Expr, Node, Op, Operation};
use crate::value::Kwargs;
use crate::{printer, EvalContext, EvalError, Value};

/// Per-evaluation state threaded through the recursive walk.
#[derive(Debug)]
pub struct Frame<'a> {
    /// The value bound to the input variable
    pub input: &'a Value,
    /// Current nesting depth
    pub depth: usize,
}

impl<'a> Frame<'a> {
    /// Start a walk with `input` bound to the variable.
    pub fn new(input: &'a Value) -> Self {
        Self { input, depth: 0 }
    }
}

/// Trait for evaluating tree nodes to values.
///
/// This is the core abstraction of the tree-walking evaluator: operands are
/// resolved first, then the node's own operation is applied to them.
pub trait Evaluate {
    /// Evaluate this node against the input held by `frame`.
    fn eval(&self, frame: &mut Frame<'_>, ctx: &EvalContext) -> Result<Value, EvalError>;
}

/// Evaluate `expr` with `input` and the default context.
///
/// # Errors
///
/// Any error raised by an operation, located at the failing sub-expression.
pub fn evaluate(expr: &Expr, input: &Value) -> Result<Value, EvalError> {
    evaluate_with(expr, input, &EvalContext::default())
}

/// Evaluate `expr` with `input` under `ctx`.
///
/// # Errors
///
/// Any error raised by an operation, located at the failing sub-expression,
/// or `DepthExceeded`.
pub fn evaluate_with(expr: &Expr, input: &Value, ctx: &EvalContext) -> Result<Value, EvalError> {
    let mut frame = Frame::new(input);
    expr.eval(&mut frame, ctx)
}

// ═══════════════════════════════════════════════════════════════════════
// Main Node Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Expr {
    fn eval(&self, frame: &mut Frame<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        if frame.depth >= ctx.max_depth {
            return Err(EvalError::DepthExceeded(ctx.max_depth));
        }
        frame.depth += 1;

        let result = match self.node() {
            Node::Var(_) => Ok(frame.input.clone()),
            Node::Literal(value) => Ok(value.clone()),
            Node::Constant(constant) => Ok(constant.value.clone()),
            Node::Operation(operation) => operation
                .eval(frame, ctx)
                .map_err(|err| err.in_expression(|| printer::render(self))),
        };

        frame.depth -= 1;

        if ctx.trace {
            match &result {
                Ok(value) => tracing::trace!(
                    expr = %printer::render(self),
                    depth = frame.depth,
                    value = ?value,
                    "evaluated"
                ),
                Err(err) => tracing::trace!(
                    expr = %printer::render(self),
                    depth = frame.depth,
                    error = %err,
                    "failed"
                ),
            }
        }

        result
    }
}

impl Evaluate for Operation {
    fn eval(&self, frame: &mut Frame<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        let operands = self
            .operands
            .iter()
            .map(|operand| operand.eval(frame, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        let mut keywords = Kwargs::with_capacity(self.keywords.len());
        for (name, operand) in &self.keywords {
            keywords.insert(name.clone(), operand.eval(frame, ctx)?);
        }

        apply(&self.op, &operands, &keywords)
    }
}

/// Apply one operation to already resolved operand values.
pub(crate) fn apply(op: &Op, operands: &[Value], keywords: &Kwargs) -> Result<Value, EvalError> {
    match (op, operands) {
        (Op::Unary(op), [operand]) => unary::eval_unary(*op, operand),
        (Op::Binary(op), [left, right]) => binary::eval_binary(*op, left, right),
        (Op::Compare(op), [left, right]) => compare::eval_compare(*op, left, right),
        (Op::Attr(name), [receiver]) => field::get_attr(receiver, name),
        (Op::Method(name), [receiver, args @ ..]) => {
            method::call_method(receiver, name, args, keywords)
        }
        (Op::Subscript, [container, key]) => index::subscript(container, key),
        (Op::Call, [callee, args @ ..]) => call::call_value(callee, args, keywords),
        (Op::Apply(adapter), args) => adapter.invoke(args, keywords),
        (Op::List, items) => Ok(Value::list(items.to_vec())),
        (Op::Tuple, items) => Ok(Value::tuple(items.to_vec())),
        (Op::Slice, [start, stop, step]) => {
            Ok(Value::slice(start.clone(), stop.clone(), step.clone()))
        }
        (op, operands) => Err(EvalError::TypeError(format!(
            "malformed {} with {} operand(s)",
            op.kind_name(),
            operands.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars;

    #[test]
    fn test_post_order_substitution() {
        let x = vars::x();
        let expr = (&x + 1) * (&x - 1);
        assert_eq!(evaluate(&expr, &Value::Int(3)).unwrap(), Value::Int(8));
    }

    #[test]
    fn test_error_is_located_at_failing_node() {
        let x = vars::x();
        let expr = (Expr::from(1) / &x) + 1;
        let err = evaluate(&expr, &Value::Int(0)).unwrap_err();
        assert_eq!(err.root_cause(), &EvalError::ZeroDivision);
        assert_eq!(err.failing_expr(), Some("1 / x"));
    }

    #[test]
    fn test_depth_limit() {
        let x = vars::x();
        let mut expr = x.clone();
        for _ in 0..10 {
            expr = expr + 1;
        }
        let ctx = EvalContext::with_max_depth(5);
        let err = evaluate_with(&expr, &Value::Int(0), &ctx).unwrap_err();
        assert_eq!(err.root_cause(), &EvalError::DepthExceeded(5));
        assert_eq!(evaluate(&expr, &Value::Int(0)).unwrap(), Value::Int(10));
    }

    #[test]
    fn test_tracing_does_not_change_results() {
        let x = vars::x();
        let ctx = EvalContext::new().traced(true);
        let value = evaluate_with(&(&x * 2), &Value::Int(4), &ctx).unwrap();
        assert_eq!(value, Value::Int(8));
    }
}
