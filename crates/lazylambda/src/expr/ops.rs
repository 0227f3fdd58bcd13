//! Operator overloading and literal conversions for `Expr`
//!
//! Arithmetic and bitwise operators build deferred nodes through
//! [`std::ops`]. Comparisons cannot be overloaded to return an expression,
//! so they are the [`Expr::lt`] family of methods instead.
//!
//! `!expr` is `~expr` (bitwise inversion, logical negation on booleans);
//! use [`Expr::not_`] for the `not` keyword.

use std::ops::{
    Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Range, RangeFrom, RangeFull, RangeTo, Rem,
    Shl, Shr, Sub,
};

use super::build::built;
use super::{BinaryOp, Expr, UnaryOp};
use crate::Value;

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl<R: Into<Expr>> $trait<R> for Expr {
            type Output = Expr;

            #[track_caller]
            fn $method(self, rhs: R) -> Expr {
                built(Expr::try_binary(BinaryOp::$op, self, rhs))
            }
        }

        impl<R: Into<Expr>> $trait<R> for &Expr {
            type Output = Expr;

            #[track_caller]
            fn $method(self, rhs: R) -> Expr {
                built(Expr::try_binary(BinaryOp::$op, self.clone(), rhs))
            }
        }

        binary_operator!(@reflected $trait, $method, $op, i32, i64, f64);
    };
    (@reflected $trait:ident, $method:ident, $op:ident, $($lhs:ty),+) => {
        $(
            impl $trait<Expr> for $lhs {
                type Output = Expr;

                #[track_caller]
                fn $method(self, rhs: Expr) -> Expr {
                    built(Expr::try_binary(BinaryOp::$op, self, rhs))
                }
            }

            impl $trait<&Expr> for $lhs {
                type Output = Expr;

                #[track_caller]
                fn $method(self, rhs: &Expr) -> Expr {
                    built(Expr::try_binary(BinaryOp::$op, self, rhs.clone()))
                }
            }
        )+
    };
}

binary_operator!(Add, add, Add);
binary_operator!(Sub, sub, Sub);
binary_operator!(Mul, mul, Mul);
binary_operator!(Div, div, Div);
binary_operator!(Rem, rem, Mod);
binary_operator!(Shl, shl, Shl);
binary_operator!(Shr, shr, Shr);
binary_operator!(BitAnd, bitand, BitAnd);
binary_operator!(BitOr, bitor, BitOr);
binary_operator!(BitXor, bitxor, BitXor);

// `'Hello, ' + s`
impl Add<Expr> for &str {
    type Output = Expr;

    #[track_caller]
    fn add(self, rhs: Expr) -> Expr {
        built(Expr::try_binary(BinaryOp::Add, self, rhs))
    }
}

impl Add<&Expr> for &str {
    type Output = Expr;

    #[track_caller]
    fn add(self, rhs: &Expr) -> Expr {
        built(Expr::try_binary(BinaryOp::Add, self, rhs.clone()))
    }
}

macro_rules! unary_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl $trait for Expr {
            type Output = Expr;

            #[track_caller]
            fn $method(self) -> Expr {
                built(Expr::try_unary(UnaryOp::$op, self))
            }
        }

        impl $trait for &Expr {
            type Output = Expr;

            #[track_caller]
            fn $method(self) -> Expr {
                built(Expr::try_unary(UnaryOp::$op, self.clone()))
            }
        }
    };
}

unary_operator!(Neg, neg, Neg);
unary_operator!(Not, not, Invert);

impl Expr {
    /// `+self`
    #[track_caller]
    pub fn pos(&self) -> Expr {
        built(Expr::try_unary(UnaryOp::Pos, self.clone()))
    }
}

// ═══════════════════════════════════════════════════════════════════
// Literal Conversions
// ═══════════════════════════════════════════════════════════════════

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::literal(value)
    }
}

macro_rules! literal_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    Expr::literal(value)
                }
            }
        )+
    };
}

literal_from!((), bool, i32, i64, u32, f32, f64, char, String, Vec<Value>);

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::literal(value)
    }
}

fn slice_literal(start: Option<i64>, stop: Option<i64>) -> Expr {
    Expr::literal(Value::slice(start.into(), stop.into(), Value::None))
}

macro_rules! range_from {
    ($($int:ty),+) => {
        $(
            impl From<Range<$int>> for Expr {
                fn from(range: Range<$int>) -> Self {
                    slice_literal(Some(range.start.into()), Some(range.end.into()))
                }
            }

            impl From<RangeFrom<$int>> for Expr {
                fn from(range: RangeFrom<$int>) -> Self {
                    slice_literal(Some(range.start.into()), None)
                }
            }

            impl From<RangeTo<$int>> for Expr {
                fn from(range: RangeTo<$int>) -> Self {
                    slice_literal(None, Some(range.end.into()))
                }
            }
        )+
    };
}

range_from!(i32, i64);

impl From<RangeFull> for Expr {
    fn from(_: RangeFull) -> Self {
        slice_literal(None, None)
    }
}
