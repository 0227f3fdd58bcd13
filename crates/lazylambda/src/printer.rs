//! Minimal-parentheses rendering of expression trees
//!
//! An operand is parenthesized exactly when its own precedence is lower than
//! the minimum its position in the parent accepts:
//!
//! | parent                  | left / receiver  | right            |
//! |-------------------------|------------------|------------------|
//! | left-associative binary | `p`              | `p + 1`          |
//! | `**`                    | `POWER + 1`      | `UNARY`          |
//! | comparison              | `p + 1`          | `p + 1`          |
//! | `-x` `+x` `~x`          |                  | `UNARY`          |
//! | `not x`                 |                  | `NOT`            |
//! | `.attr` `[k]` `(args)`  | `POSTFIX`        | none             |
//!
//! Rendering reads the tree only, never an input value, so it is
//! deterministic.

use indexmap::IndexMap;

use crate::expr::{Associativity, BinaryOp, Expr, Node, Op, Operation, Precedence};
use crate::Value;

/// What a node with printing switched off renders as.
pub const OPAQUE_MARKER: &str = "<lambda>";

/// Render `expr` as minimal, precedence-correct source text.
///
/// Nodes with printing switched off render as [`OPAQUE_MARKER`].
pub fn render(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn write_expr(out: &mut String, expr: &Expr) {
    if !expr.repr_enabled() {
        out.push_str(OPAQUE_MARKER);
        return;
    }
    match expr.node() {
        Node::Var(var) => out.push_str(var.name()),
        Node::Constant(constant) => out.push_str(&constant.name),
        Node::Literal(value) => write_literal(out, value),
        Node::Operation(operation) => write_operation(out, operation),
    }
}

fn write_literal(out: &mut String, value: &Value) {
    match value {
        Value::Function(func) => out.push_str(&func.name),
        other => out.push_str(&other.repr()),
    }
}

fn precedence_of(expr: &Expr) -> Precedence {
    if expr.repr_enabled() {
        expr.precedence()
    } else {
        Precedence::ATOM
    }
}

fn write_operand(out: &mut String, expr: &Expr, min: Precedence) {
    if precedence_of(expr) < min {
        out.push('(');
        write_expr(out, expr);
        out.push(')');
    } else {
        write_expr(out, expr);
    }
}

fn binary_bounds(op: BinaryOp) -> (Precedence, Precedence) {
    let p = op.precedence();
    match op {
        // `**` binds tighter than a unary operator on its left only: `-x ** -y`
        BinaryOp::Pow => (p.tighter(), Precedence::UNARY),
        _ => match op.associativity() {
            Associativity::Left => (p, p.tighter()),
            Associativity::Right => (p.tighter(), p),
            Associativity::None => (p.tighter(), p.tighter()),
        },
    }
}

fn write_operation(out: &mut String, operation: &Operation) {
    let operands = operation.operands.as_slice();
    match (&operation.op, operands) {
        (Op::Unary(op), [operand]) => {
            out.push_str(op.as_symbol());
            write_operand(out, operand, op.precedence());
        }
        (Op::Binary(op), [left, right]) => {
            let (left_min, right_min) = binary_bounds(*op);
            write_operand(out, left, left_min);
            out.push(' ');
            out.push_str(op.as_symbol());
            out.push(' ');
            write_operand(out, right, right_min);
        }
        (Op::Compare(op), [left, right]) => {
            let min = Precedence::COMPARISON.tighter();
            write_operand(out, left, min);
            out.push(' ');
            out.push_str(op.as_symbol());
            out.push(' ');
            write_operand(out, right, min);
        }
        (Op::Attr(name), [receiver]) => {
            write_operand(out, receiver, Precedence::POSTFIX);
            out.push('.');
            out.push_str(name);
        }
        (Op::Method(name), [receiver, args @ ..]) => {
            write_operand(out, receiver, Precedence::POSTFIX);
            out.push('.');
            out.push_str(name);
            write_arguments(out, args, &operation.keywords);
        }
        (Op::Call, [callee, args @ ..]) => {
            write_operand(out, callee, Precedence::POSTFIX);
            write_arguments(out, args, &operation.keywords);
        }
        (Op::Subscript, [container, key]) => {
            write_operand(out, container, Precedence::POSTFIX);
            out.push('[');
            write_subscript_key(out, key);
            out.push(']');
        }
        (Op::Apply(adapter), args) => {
            out.push_str(adapter.name());
            write_arguments(out, args, &operation.keywords);
        }
        (Op::List, items) => {
            out.push('[');
            write_items(out, items);
            out.push(']');
        }
        (Op::Tuple, items) => {
            out.push('(');
            write_items(out, items);
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        (Op::Slice, bounds) => {
            out.push_str("slice");
            write_arguments(out, bounds, &operation.keywords);
        }
        // Operand counts are fixed by the builders
        (op, _) => out.push_str(op.kind_name()),
    }
}

fn write_items(out: &mut String, items: &[Expr]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, item);
    }
}

fn write_arguments(out: &mut String, args: &[Expr], keywords: &IndexMap<String, Expr>) {
    out.push('(');
    write_items(out, args);
    for (i, (name, value)) in keywords.iter().enumerate() {
        if i > 0 || !args.is_empty() {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push('=');
        write_expr(out, value);
    }
    out.push(')');
}

/// Slices in key position use the colon form, `s[1:-1]`.
fn write_subscript_key(out: &mut String, key: &Expr) {
    if key.repr_enabled() {
        match key.node() {
            Node::Literal(Value::Slice(slice)) => {
                let bounds = [&slice.start, &slice.stop, &slice.step].map(|bound| {
                    (!bound.is_none()).then(|| bound.repr())
                });
                write_colon_slice(out, bounds);
                return;
            }
            Node::Operation(Operation {
                op: Op::Slice,
                operands,
                ..
            }) if operands.len() == 3 => {
                let bounds = [&operands[0], &operands[1], &operands[2]].map(|bound| {
                    let omitted = matches!(bound.literal_value(), Some(Value::None));
                    (!omitted).then(|| render(bound))
                });
                write_colon_slice(out, bounds);
                return;
            }
            _ => {}
        }
    }
    write_expr(out, key);
}

fn write_colon_slice(out: &mut String, [start, stop, step]: [Option<String>; 3]) {
    if let Some(start) = start {
        out.push_str(&start);
    }
    out.push(':');
    if let Some(stop) = stop {
        out.push_str(&stop);
    }
    if let Some(step) = step {
        out.push(':');
        out.push_str(&step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::{get, slice};
    use crate::vars;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_left_associativity() {
        let x = vars::x();
        assert_eq!(render(&(&x - 1 - 2)), "x - 1 - 2");
        assert_eq!(render(&(&x - (&x - 1))), "x - (x - 1)");
        assert_eq!(render(&((&x + 1) * 2)), "(x + 1) * 2");
        assert_eq!(render(&(&x * 2 + 1)), "x * 2 + 1");
    }

    #[test]
    fn test_power_binding() {
        let x = vars::x();
        assert_eq!(render(&(-&x).pow(-&x)), "(-x) ** -x");
        assert_eq!(render(&-x.pow(-&x)), "-x ** -x");
        assert_eq!(render(&x.pow(x.pow(2))), "x ** x ** 2");
        assert_eq!(render(&x.pow(2).pow(3)), "(x ** 2) ** 3");
        assert_eq!(render(&Expr::literal(-2).pow(&x)), "(-2) ** x");
    }

    #[test]
    fn test_comparison_and_bitwise_grouping() {
        let x = vars::x();
        let difference: Expr = 1 - 2 * &x;
        let left = difference.le(-&x);
        let right = (-&x).gt(x.pow(2));
        assert_eq!(render(&(left | right)), "(1 - 2 * x <= -x) | (-x > x ** 2)");
        assert_eq!(render(&(&x & 1).eq(0)), "x & 1 == 0");
        assert_eq!(render(&x.gt(0).not_()), "not x > 0");
        assert_eq!(render(&x.not_().eq(false)), "(not x) == False");
    }

    #[test]
    fn test_postfix_receivers() {
        let x = vars::x();
        assert_eq!(render(&(&x + 1).attr("real")), "(x + 1).real");
        assert_eq!(render(&(-&x).method("conjugate", ())), "(-x).conjugate()");
        assert_eq!(render(&x.attr("real").attr("imag")), "x.real.imag");
    }

    #[test]
    fn test_slice_rendering() {
        let s = vars::s();
        assert_eq!(render(&s.get(0..4).method("upper", ())), "s[0:4].upper()");
        assert_eq!(render(&get(&s, slice((), (), -1))), "s[::-1]");
        assert_eq!(render(&s.get(slice(1, &s.method("count", ("a",)), ()))), "s[1:s.count('a')]");
        assert_eq!(render(&slice(&s.method("count", ("a",)), (), ())), "slice(s.count('a'), None, None)");
    }

    #[test]
    fn test_keywords_and_displays() {
        let f = vars::f();
        let expr = f.call_with((1,), [("key", Expr::from("v"))]);
        assert_eq!(render(&expr), "f(1, key='v')");
        let no_positional = f.call_with((), [("key", Expr::from(2))]);
        assert_eq!(render(&no_positional), "f(key=2)");
    }

    #[test]
    fn test_disabled_nodes_are_opaque() {
        let x = vars::x();
        let hidden = (&x + 1).with_repr(false);
        assert_eq!(render(&(hidden * 2)), "<lambda> * 2");
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let x = vars::x();
        let expr = (&x + 1).pow(2) % 7;
        assert_eq!(render(&expr), render(&expr));
        assert_eq!(render(&expr), "(x + 1) ** 2 % 7");
    }
}
