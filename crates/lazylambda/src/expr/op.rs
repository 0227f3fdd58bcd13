//! Operation descriptors and the precedence table used by the printer

use std::fmt;
use std::sync::Arc;

use crate::Adapter;

/// Binding strength of an operation, higher binds tighter.
///
/// Levels follow the operator precedence of the rendered source syntax:
///
/// | level | operators                          |
/// |-------|------------------------------------|
/// | 4     | `not x`                            |
/// | 5     | `<` `<=` `>` `>=` `==` `!=` `in`   |
/// | 6     | `\|`                               |
/// | 7     | `^`                                |
/// | 8     | `&`                                |
/// | 9     | `<<` `>>`                          |
/// | 10    | `+` `-`                            |
/// | 11    | `*` `/` `//` `%`                   |
/// | 12    | `-x` `+x` `~x`                     |
/// | 13    | `**`                               |
/// | 15    | `x.attr` `x[k]` `f(x)`             |
/// | 16    | `[a, b]` `(a, b)`                  |
/// | 17    | names and literals                 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precedence(u8);

impl Precedence {
    /// `not x`
    pub const NOT: Self = Self(4);
    /// Comparisons and membership tests
    pub const COMPARISON: Self = Self(5);
    /// `|`
    pub const BIT_OR: Self = Self(6);
    /// `^`
    pub const BIT_XOR: Self = Self(7);
    /// `&`
    pub const BIT_AND: Self = Self(8);
    /// `<<`, `>>`
    pub const SHIFT: Self = Self(9);
    /// `+`, `-`
    pub const ADDITIVE: Self = Self(10);
    /// `*`, `/`, `//`, `%`
    pub const MULTIPLICATIVE: Self = Self(11);
    /// Unary `-`, `+`, `~`
    pub const UNARY: Self = Self(12);
    /// `**`
    pub const POWER: Self = Self(13);
    /// Attribute access, subscription, calls
    pub const POSTFIX: Self = Self(15);
    /// List and tuple displays
    pub const DISPLAY: Self = Self(16);
    /// Names and literals
    pub const ATOM: Self = Self(17);

    /// Precedence from a raw level.
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    /// The raw level
    pub const fn level(self) -> u8 {
        self.0
    }

    /// The next tighter level: an operand of exactly `self` needs parentheses.
    pub(crate) const fn tighter(self) -> Self {
        Self(self.0 + 1)
    }
}

/// How operators of equal precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a - b - c` is `(a - b) - c`
    Left,
    /// `a ** b ** c` is `a ** (b ** c)`
    Right,
    /// Operands of equal precedence are always grouped explicitly
    None,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `~x`
    Invert,
    /// `not x`
    Not,
}

impl UnaryOp {
    /// Source symbol, including the trailing space of keyword operators.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
            Self::Invert => "~",
            Self::Not => "not ",
        }
    }

    /// Returns the precedence level of this operator.
    pub const fn precedence(self) -> Precedence {
        match self {
            Self::Not => Precedence::NOT,
            Self::Neg | Self::Pos | Self::Invert => Precedence::UNARY,
        }
    }
}

/// Binary arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/` (true division)
    Div,
    /// `//` (floor division)
    FloorDiv,
    /// `%`
    Mod,
    /// `**`
    Pow,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
}

impl BinaryOp {
    /// Source symbol
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
        }
    }

    /// Returns the precedence level of this operator.
    pub const fn precedence(self) -> Precedence {
        match self {
            Self::Pow => Precedence::POWER,
            Self::Mul | Self::Div | Self::FloorDiv | Self::Mod => Precedence::MULTIPLICATIVE,
            Self::Add | Self::Sub => Precedence::ADDITIVE,
            Self::Shl | Self::Shr => Precedence::SHIFT,
            Self::BitAnd => Precedence::BIT_AND,
            Self::BitXor => Precedence::BIT_XOR,
            Self::BitOr => Precedence::BIT_OR,
        }
    }

    /// Returns the associativity of this operator.
    pub const fn associativity(self) -> Associativity {
        match self {
            Self::Pow => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Whether this is one of the bitwise operators standing in for `and`/`or`.
    pub const fn is_bitwise(self) -> bool {
        matches!(self, Self::BitAnd | Self::BitOr | Self::BitXor)
    }
}

/// Comparison and membership operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `in`
    In,
    /// `not in`
    NotIn,
}

impl CompareOp {
    /// Source symbol
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }
}

/// The deferred operation held by an operation node.
///
/// Operand layout per kind:
/// - `Unary`: `[operand]`
/// - `Binary`, `Compare`: `[left, right]`
/// - `Attr`: `[receiver]`
/// - `Method`: `[receiver, args..]`, keyword operands allowed
/// - `Subscript`: `[container, key]`
/// - `Call`: `[callee, args..]`, keyword operands allowed
/// - `Apply`: `[args..]`, keyword operands allowed
/// - `List`, `Tuple`: `[items..]`
/// - `Slice`: `[start, stop, step]`
#[derive(Clone)]
pub enum Op {
    /// Prefix operator
    Unary(UnaryOp),
    /// Infix arithmetic or bitwise operator
    Binary(BinaryOp),
    /// Infix comparison
    Compare(CompareOp),
    /// Attribute access, `x.name`
    Attr(Arc<str>),
    /// Method call, `x.name(args)`
    Method(Arc<str>),
    /// Subscription, `x[key]`
    Subscript,
    /// Calling the value of an expression, `x(args)`
    Call,
    /// Calling an adapted function, `name(args)`
    Apply(Adapter),
    /// List display, `[a, b]`
    List,
    /// Tuple display, `(a, b)`
    Tuple,
    /// Slice construction, `start:stop:step`
    Slice,
}

impl Op {
    /// Returns the precedence level of this operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Op::Unary(op) => op.precedence(),
            Op::Binary(op) => op.precedence(),
            Op::Compare(_) => Precedence::COMPARISON,
            Op::Apply(adapter) => adapter.precedence(),
            Op::Attr(_) | Op::Method(_) | Op::Subscript | Op::Call | Op::Slice => {
                Precedence::POSTFIX
            }
            Op::List | Op::Tuple => Precedence::DISPLAY,
        }
    }

    /// Returns the associativity of this operation.
    pub fn associativity(&self) -> Associativity {
        match self {
            Op::Binary(op) => op.associativity(),
            Op::Compare(_) => Associativity::None,
            _ => Associativity::Left,
        }
    }

    /// Short human-readable name of the operation kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Op::Unary(_) => "unary operation",
            Op::Binary(_) => "binary operation",
            Op::Compare(_) => "comparison",
            Op::Attr(_) => "attribute access",
            Op::Method(_) => "method call",
            Op::Subscript => "subscript",
            Op::Call => "call",
            Op::Apply(_) => "function call",
            Op::List => "list display",
            Op::Tuple => "tuple display",
            Op::Slice => "slice",
        }
    }
}

impl fmt::Debug for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Unary(op) => write!(f, "Unary({:?})", op),
            Op::Binary(op) => write!(f, "Binary({:?})", op),
            Op::Compare(op) => write!(f, "Compare({:?})", op),
            Op::Attr(name) => write!(f, "Attr({})", name),
            Op::Method(name) => write!(f, "Method({})", name),
            Op::Apply(adapter) => write!(f, "Apply({})", adapter.name()),
            _ => write!(f, "{}", self.kind_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(Precedence::POWER > Precedence::UNARY);
        assert!(Precedence::UNARY > Precedence::MULTIPLICATIVE);
        assert!(Precedence::MULTIPLICATIVE > Precedence::ADDITIVE);
        assert!(Precedence::BIT_AND > Precedence::BIT_XOR);
        assert!(Precedence::BIT_XOR > Precedence::BIT_OR);
        assert!(Precedence::BIT_OR > Precedence::COMPARISON);
        assert!(Precedence::COMPARISON > Precedence::NOT);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(BinaryOp::FloorDiv.as_symbol(), "//");
        assert_eq!(UnaryOp::Not.as_symbol(), "not ");
        assert_eq!(CompareOp::NotIn.as_symbol(), "not in");
    }

    #[test]
    fn test_only_power_is_right_associative() {
        assert_eq!(BinaryOp::Pow.associativity(), Associativity::Right);
        assert_eq!(BinaryOp::Sub.associativity(), Associativity::Left);
        assert_eq!(Op::Compare(CompareOp::Lt).associativity(), Associativity::None);
    }
}
