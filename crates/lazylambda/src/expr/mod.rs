//! Expression trees: placeholders, literals, named constants and deferred operations

mod args;
mod build;
mod native;
pub mod op;
mod ops;
mod var;

pub use args::IntoArgs;
pub use op::{Associativity, BinaryOp, CompareOp, Op, Precedence, UnaryOp};
pub use var::{input_var, typed_var, Var, VarId};
pub(crate) use build::built;
pub(crate) use var::is_identifier;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::{printer, DefinitionError, EvalContext, EvalError, Lambda, ReprError, Value};

/// An immutable lambda expression.
///
/// Every operator, comparison, attribute access, method call, subscript or
/// call applied to an `Expr` returns a *new* `Expr` describing the deferred
/// operation; nothing is evaluated until [`Expr::evaluate`] is called or the
/// expression is wrapped with [`Expr::as_function`].
///
/// Cloning is cheap: nodes are reference counted and never mutated, so one
/// placeholder can be reused across any number of expressions and threads.
///
/// `Expr` deliberately implements neither `Display`, `PartialEq` nor
/// `IntoIterator`: those host-level protocols would have to return a concrete
/// string, boolean or iterator immediately. Use [`Expr::to_repr`],
/// [`Expr::eq`] and [`crate::builtins::iter`] instead.
#[derive(Clone)]
pub struct Expr {
    inner: Arc<ExprInner>,
}

#[derive(Clone)]
struct ExprInner {
    node: Node,
    root: Option<Var>,
    repr_enabled: bool,
}

/// The tagged variants an expression node can take.
#[derive(Clone)]
pub enum Node {
    /// The input placeholder
    Var(Var),
    /// A captured literal, printed through its `repr`
    Literal(Value),
    /// A named constant, printed through its name
    Constant(Constant),
    /// A deferred operation on sub-expressions
    Operation(Operation),
}

/// A value that appears in printed expressions under a chosen name.
#[derive(Clone, Debug)]
pub struct Constant {
    /// Display name
    pub name: Arc<str>,
    /// The value substituted at evaluation time
    pub value: Value,
    /// Binding strength of the name when printed
    pub precedence: Precedence,
}

/// A deferred operation and its operand sub-expressions.
#[derive(Clone, Debug)]
pub struct Operation {
    /// What to apply
    pub op: Op,
    /// Positional operands, in evaluation order
    pub operands: Vec<Expr>,
    /// Keyword operands, for calls only
    pub keywords: IndexMap<String, Expr>,
}

impl Expr {
    pub(crate) fn from_parts(node: Node, root: Option<Var>) -> Self {
        Self {
            inner: Arc::new(ExprInner {
                node,
                root,
                repr_enabled: true,
            }),
        }
    }

    /// Wrap a literal value as a leaf expression.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::from_parts(Node::Literal(value.into()), None)
    }

    /// Create a named constant leaf.
    pub fn constant(name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        Self::constant_with_precedence(name, value, Precedence::ATOM)
    }

    pub(crate) fn constant_with_precedence(
        name: impl Into<Arc<str>>,
        value: impl Into<Value>,
        precedence: Precedence,
    ) -> Self {
        Self::from_parts(
            Node::Constant(Constant {
                name: name.into(),
                value: value.into(),
                precedence,
            }),
            None,
        )
    }

    /// Build an operation node.
    ///
    /// When every operand is a literal the operation is applied right away
    /// and the result is returned as a literal leaf; otherwise the operation
    /// is deferred.
    ///
    /// # Errors
    ///
    /// Returns `MixedVariables` if operands refer to two distinct input
    /// variables, or `Eager` if applying an all-literal operation fails.
    pub fn apply(
        op: Op,
        operands: Vec<Expr>,
        keywords: IndexMap<String, Expr>,
    ) -> Result<Self, DefinitionError> {
        let root = common_root(operands.iter().chain(keywords.values()))?;
        let eager = operands.iter().chain(keywords.values()).all(Expr::is_literal);

        if let Op::Binary(bin) = &op {
            if bin.is_bitwise() && root.is_some() {
                warn_constant_side(*bin, &operands);
            }
        }

        let expr = Self::from_parts(
            Node::Operation(Operation {
                op,
                operands,
                keywords,
            }),
            root,
        );

        if !eager {
            return Ok(expr);
        }
        crate::eval::evaluate(&expr, &Value::None)
            .map(Expr::literal)
            .map_err(|err| DefinitionError::Eager {
                expr: printer::render(&expr),
                source: err.root_cause().clone(),
            })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// The node at the root of this tree
    pub fn node(&self) -> &Node {
        &self.inner.node
    }

    /// The input variable this tree depends on, `None` for closed trees
    pub fn variable(&self) -> Option<&Var> {
        self.inner.root.as_ref()
    }

    /// Whether no input variable is reachable: the tree evaluates to a
    /// constant whatever the input.
    pub fn is_closed(&self) -> bool {
        self.inner.root.is_none()
    }

    /// Whether this is a bare literal leaf
    pub fn is_literal(&self) -> bool {
        matches!(self.inner.node, Node::Literal(_))
    }

    /// The literal value, for literal leaves
    pub fn literal_value(&self) -> Option<&Value> {
        match &self.inner.node {
            Node::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// The operation, for operation nodes
    pub fn operation(&self) -> Option<&Operation> {
        match &self.inner.node {
            Node::Operation(operation) => Some(operation),
            _ => None,
        }
    }

    /// Binding strength of the top-level construct.
    pub fn precedence(&self) -> Precedence {
        match &self.inner.node {
            Node::Var(_) => Precedence::ATOM,
            Node::Constant(c) => c.precedence,
            Node::Literal(value) if is_negative_number(value) => Precedence::UNARY,
            Node::Literal(_) => Precedence::ATOM,
            Node::Operation(operation) => operation.op.precedence(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Printing
    // ═══════════════════════════════════════════════════════════════════

    /// Whether this node prints its structure
    pub fn repr_enabled(&self) -> bool {
        self.inner.repr_enabled
    }

    /// Copy of this node with printing switched on or off.
    ///
    /// A disabled node prints as an opaque marker inside larger expressions
    /// and makes [`Expr::to_repr`] fail.
    pub fn with_repr(&self, enabled: bool) -> Self {
        let mut inner = (*self.inner).clone();
        inner.repr_enabled = enabled;
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Minimal, precedence-correct source form of this expression.
    ///
    /// # Errors
    ///
    /// Returns `ReprError::Disabled` when printing was switched off for
    /// this node.
    pub fn to_repr(&self) -> Result<String, ReprError> {
        if self.repr_enabled() {
            Ok(printer::render(self))
        } else {
            Err(ReprError::Disabled)
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Evaluation
    // ═══════════════════════════════════════════════════════════════════

    /// Evaluate this expression with `input` bound to its variable.
    ///
    /// Calling an expression with [`Expr::call`] is *not* evaluation: it
    /// builds a new deferred call node.
    ///
    /// # Errors
    ///
    /// Propagates the error raised by the failing operation, annotated with
    /// the sub-expression that raised it.
    pub fn evaluate(&self, input: impl Into<Value>) -> Result<Value, EvalError> {
        crate::eval::evaluate(self, &input.into())
    }

    /// Evaluate with an explicit context.
    ///
    /// # Errors
    ///
    /// See [`Expr::evaluate`]; also `DepthExceeded` past `ctx.max_depth`.
    pub fn evaluate_with(&self, input: &Value, ctx: &EvalContext) -> Result<Value, EvalError> {
        crate::eval::evaluate_with(self, input, ctx)
    }

    /// Freeze this expression into a callable [`Lambda`].
    pub fn as_function(&self) -> Lambda {
        Lambda::new(self.clone())
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", printer::render(self))
    }
}

/// Resolve the single input variable shared by `exprs`.
fn common_root<'a>(
    exprs: impl IntoIterator<Item = &'a Expr>,
) -> Result<Option<Var>, DefinitionError> {
    let mut root: Option<&Var> = None;
    for expr in exprs {
        let Some(var) = expr.variable() else {
            continue;
        };
        match root {
            None => root = Some(var),
            Some(existing) if existing == var => {}
            Some(existing) => {
                return Err(DefinitionError::MixedVariables {
                    left: existing.name().to_string(),
                    right: var.name().to_string(),
                })
            }
        }
    }
    Ok(root.cloned())
}

fn warn_constant_side(op: BinaryOp, operands: &[Expr]) {
    let constant_bool = operands
        .iter()
        .any(|operand| matches!(operand.literal_value(), Some(Value::Bool(_))));
    if constant_bool {
        tracing::warn!(
            op = op.as_symbol(),
            "one side of a bitwise operator is a constant boolean and will always have the same \
             value whatever the input; this is most probably a mistake in the expression"
        );
    }
}

fn is_negative_number(value: &Value) -> bool {
    match value {
        Value::Int(n) => *n < 0,
        Value::Float(x) => x.is_sign_negative() && !x.is_nan(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars;

    #[test]
    fn test_variable_is_identity() {
        let x = input_var("x").unwrap();
        assert_eq!(x.evaluate(5).unwrap(), Value::Int(5));
        assert!(!x.is_closed());
    }

    #[test]
    fn test_mixing_variables_fails() {
        let a = input_var("x").unwrap();
        let b = input_var("x").unwrap();
        let err = Expr::try_binary(BinaryOp::Add, a, b).unwrap_err();
        assert!(matches!(err, DefinitionError::MixedVariables { .. }));
    }

    #[test]
    fn test_same_variable_combines() {
        let x = vars::x();
        let expr = Expr::try_binary(BinaryOp::Sub, &x, &x).unwrap();
        assert_eq!(expr.variable(), x.variable());
    }

    #[test]
    fn test_all_literal_operands_apply_eagerly() {
        let expr = Expr::try_binary(BinaryOp::Add, Expr::literal(1), Expr::literal(2)).unwrap();
        assert_eq!(expr.literal_value(), Some(&Value::Int(3)));
    }

    #[test]
    fn test_eager_failure_is_a_definition_error() {
        let err = Expr::try_binary(BinaryOp::Div, Expr::literal(1), Expr::literal(0)).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::Eager {
                expr: "1 / 0".to_string(),
                source: EvalError::ZeroDivision,
            }
        );
    }

    #[test]
    fn test_named_constants_defer() {
        let e = Expr::constant("e", std::f64::consts::E);
        let expr = Expr::try_binary(BinaryOp::Add, &e, &e).unwrap();
        assert!(expr.is_closed());
        assert!(!expr.is_literal());
        assert_eq!(expr.to_repr().unwrap(), "e + e");
    }

    #[test]
    fn test_repr_toggle() {
        let x = vars::x();
        let hidden = x.with_repr(false);
        assert_eq!(hidden.to_repr(), Err(ReprError::Disabled));
        assert!(x.to_repr().is_ok());
    }
}
