//! Builder methods that capture operations on an expression
//!
//! Every operation comes in two forms: a fallible `try_*` form returning
//! `Result<Expr, DefinitionError>`, and a convenience form used by the
//! operator impls that panics on a definition error.

use indexmap::IndexMap;

use super::{BinaryOp, CompareOp, Expr, IntoArgs, Op, UnaryOp};
use crate::DefinitionError;

/// Unwrap a construction result, panicking with the definition error.
#[track_caller]
pub(crate) fn built(result: Result<Expr, DefinitionError>) -> Expr {
    match result {
        Ok(expr) => expr,
        Err(err) => panic!("{}", err),
    }
}

fn collect_keywords<I, K, E>(kwargs: I) -> IndexMap<String, Expr>
where
    I: IntoIterator<Item = (K, E)>,
    K: Into<String>,
    E: Into<Expr>,
{
    kwargs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════
// Fallible Builders
// ═══════════════════════════════════════════════════════════════════

impl Expr {
    /// Capture a unary operator.
    ///
    /// # Errors
    ///
    /// Returns `Eager` if the operand is a literal and the operator fails.
    pub fn try_unary(op: UnaryOp, operand: impl Into<Expr>) -> Result<Expr, DefinitionError> {
        Expr::apply(Op::Unary(op), vec![operand.into()], IndexMap::new())
    }

    /// Capture a binary operator.
    ///
    /// # Errors
    ///
    /// See [`Expr::apply`].
    pub fn try_binary(
        op: BinaryOp,
        left: impl Into<Expr>,
        right: impl Into<Expr>,
    ) -> Result<Expr, DefinitionError> {
        Expr::apply(Op::Binary(op), vec![left.into(), right.into()], IndexMap::new())
    }

    /// Capture a comparison.
    ///
    /// # Errors
    ///
    /// See [`Expr::apply`].
    pub fn try_compare(
        op: CompareOp,
        left: impl Into<Expr>,
        right: impl Into<Expr>,
    ) -> Result<Expr, DefinitionError> {
        Expr::apply(Op::Compare(op), vec![left.into(), right.into()], IndexMap::new())
    }

    /// Capture attribute access, `self.name`.
    ///
    /// # Errors
    ///
    /// See [`Expr::apply`].
    pub fn try_attr(&self, name: &str) -> Result<Expr, DefinitionError> {
        Expr::apply(Op::Attr(name.into()), vec![self.clone()], IndexMap::new())
    }

    /// Capture a method call, `self.name(args)`.
    ///
    /// # Errors
    ///
    /// See [`Expr::apply`].
    pub fn try_method(&self, name: &str, args: impl IntoArgs) -> Result<Expr, DefinitionError> {
        self.try_method_with(name, args, Vec::<(String, Expr)>::new())
    }

    /// Capture a method call with keyword arguments.
    ///
    /// # Errors
    ///
    /// See [`Expr::apply`].
    pub fn try_method_with<I, K, E>(
        &self,
        name: &str,
        args: impl IntoArgs,
        kwargs: I,
    ) -> Result<Expr, DefinitionError>
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Expr>,
    {
        let mut operands = vec![self.clone()];
        operands.extend(args.into_args());
        Expr::apply(Op::Method(name.into()), operands, collect_keywords(kwargs))
    }

    /// Capture calling the result of this expression, `self(args)`.
    ///
    /// # Errors
    ///
    /// See [`Expr::apply`].
    pub fn try_call(&self, args: impl IntoArgs) -> Result<Expr, DefinitionError> {
        self.try_call_with(args, Vec::<(String, Expr)>::new())
    }

    /// Capture calling the result of this expression with keyword arguments.
    ///
    /// # Errors
    ///
    /// See [`Expr::apply`].
    pub fn try_call_with<I, K, E>(&self, args: impl IntoArgs, kwargs: I) -> Result<Expr, DefinitionError>
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Expr>,
    {
        let mut operands = vec![self.clone()];
        operands.extend(args.into_args());
        Expr::apply(Op::Call, operands, collect_keywords(kwargs))
    }

    /// Capture subscription, `self[key]`.
    ///
    /// # Errors
    ///
    /// See [`Expr::apply`].
    pub fn try_get(&self, key: impl Into<Expr>) -> Result<Expr, DefinitionError> {
        Expr::apply(Op::Subscript, vec![self.clone(), key.into()], IndexMap::new())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Convenience Builders
// ═══════════════════════════════════════════════════════════════════

macro_rules! compare_methods {
    ($($(#[$doc:meta])* $method:ident => $op:ident;)+) => {
        impl Expr {
            $(
                $(#[$doc])*
                ///
                /// # Panics
                ///
                /// Panics if the operands refer to different input variables.
                #[track_caller]
                pub fn $method(&self, other: impl Into<Expr>) -> Expr {
                    built(Expr::try_compare(CompareOp::$op, self.clone(), other))
                }
            )+
        }
    };
}

compare_methods! {
    /// `self < other`
    lt => Lt;
    /// `self <= other`
    le => Le;
    /// `self > other`
    gt => Gt;
    /// `self >= other`
    ge => Ge;
    /// `self == other`
    eq => Eq;
    /// `self != other`
    ne => Ne;
}

impl Expr {
    /// `self ** exponent`
    ///
    /// # Panics
    ///
    /// Panics if the operands refer to different input variables.
    #[track_caller]
    pub fn pow(&self, exponent: impl Into<Expr>) -> Expr {
        built(Expr::try_binary(BinaryOp::Pow, self.clone(), exponent))
    }

    /// `self // divisor`
    ///
    /// # Panics
    ///
    /// Panics if the operands refer to different input variables.
    #[track_caller]
    pub fn floordiv(&self, divisor: impl Into<Expr>) -> Expr {
        built(Expr::try_binary(BinaryOp::FloorDiv, self.clone(), divisor))
    }

    /// `divmod(self, divisor)`
    #[track_caller]
    pub fn divmod(&self, divisor: impl Into<Expr>) -> Expr {
        crate::builtins::divmod(self.clone(), divisor)
    }

    /// `not self`, the stand-in for `!` on truth values.
    #[track_caller]
    pub fn not_(&self) -> Expr {
        built(Expr::try_unary(UnaryOp::Not, self.clone()))
    }

    /// `any(self)`
    #[track_caller]
    pub fn any_(&self) -> Expr {
        crate::builtins::any(self.clone())
    }

    /// `all(self)`
    #[track_caller]
    pub fn all_(&self) -> Expr {
        crate::builtins::all(self.clone())
    }

    /// `item in self`
    #[track_caller]
    pub fn contains(&self, item: impl Into<Expr>) -> Expr {
        built(Expr::try_compare(CompareOp::In, item, self.clone()))
    }

    /// `self in container`
    #[track_caller]
    pub fn is_in(&self, container: impl Into<Expr>) -> Expr {
        built(Expr::try_compare(CompareOp::In, self.clone(), container))
    }

    /// `self not in container`
    #[track_caller]
    pub fn not_in(&self, container: impl Into<Expr>) -> Expr {
        built(Expr::try_compare(CompareOp::NotIn, self.clone(), container))
    }

    /// `self.format(args)`, the deferred form of `str.format`.
    #[track_caller]
    pub fn format(&self, args: impl IntoArgs) -> Expr {
        self.method("format", args)
    }

    /// `self.name`
    ///
    /// # Panics
    ///
    /// Panics if `self` is a literal without that attribute.
    #[track_caller]
    pub fn attr(&self, name: &str) -> Expr {
        built(self.try_attr(name))
    }

    /// `self.name(args)`
    ///
    /// # Panics
    ///
    /// Panics if arguments refer to another input variable, or if every
    /// operand is a literal and the call fails.
    #[track_caller]
    pub fn method(&self, name: &str, args: impl IntoArgs) -> Expr {
        built(self.try_method(name, args))
    }

    /// `self.name(args, key=value...)`
    ///
    /// # Panics
    ///
    /// See [`Expr::method`].
    #[track_caller]
    pub fn method_with<I, K, E>(&self, name: &str, args: impl IntoArgs, kwargs: I) -> Expr
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Expr>,
    {
        built(self.try_method_with(name, args, kwargs))
    }

    /// `self(args)`: a deferred call of whatever `self` evaluates to.
    ///
    /// This never evaluates `self`; see [`Expr::evaluate`] for that.
    ///
    /// # Panics
    ///
    /// See [`Expr::method`].
    #[track_caller]
    pub fn call(&self, args: impl IntoArgs) -> Expr {
        built(self.try_call(args))
    }

    /// `self(args, key=value...)`
    ///
    /// # Panics
    ///
    /// See [`Expr::method`].
    #[track_caller]
    pub fn call_with<I, K, E>(&self, args: impl IntoArgs, kwargs: I) -> Expr
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Expr>,
    {
        built(self.try_call_with(args, kwargs))
    }

    /// `self[key]`. Ranges convert to slices: `s.get(0..4)` is `s[0:4]`.
    ///
    /// # Panics
    ///
    /// Panics if `key` refers to another input variable.
    #[track_caller]
    pub fn get(&self, key: impl Into<Expr>) -> Expr {
        built(self.try_get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{vars, Value};
    use pretty_assertions::assert_eq;

    fn repr(expr: &Expr) -> String {
        expr.to_repr().unwrap()
    }

    #[test]
    fn test_method_chain() {
        let s = vars::s();
        let expr = s.method("strip", ()).method("lower", ());
        assert_eq!(repr(&expr), "s.strip().lower()");
        assert_eq!(expr.evaluate("  HeLLo ").unwrap(), Value::from("hello"));
    }

    #[test]
    fn test_contains_and_is_in() {
        let s = vars::s();
        assert_eq!(repr(&s.contains("a")), "'a' in s");
        assert_eq!(repr(&s.is_in(vec![Value::from("a")])), "s in ['a']");
        assert_eq!(repr(&s.not_in("abc")), "s not in 'abc'");
    }

    #[test]
    fn test_call_is_deferred() {
        let f = vars::f();
        let expr = f.call((1, 2));
        assert_eq!(repr(&expr), "f(1, 2)");
        assert!(!expr.is_closed());
    }

    #[test]
    fn test_literal_method_is_eager() {
        let expr = Expr::literal("abc").method("upper", ());
        assert_eq!(expr.literal_value(), Some(&Value::from("ABC")));
    }

    #[test]
    fn test_try_forms_report_mixing() {
        let x = vars::x();
        let y = vars::y();
        assert!(x.try_get(&y).is_err());
        assert!(x.try_method("index", (&y,)).is_err());
    }

    #[test]
    #[should_panic(expected = "not allowed to combine several input variables")]
    fn test_convenience_forms_panic_on_mixing() {
        let _ = vars::x().lt(vars::y());
    }
}
