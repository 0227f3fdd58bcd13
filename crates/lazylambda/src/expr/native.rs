//! Native conversions that cannot be deferred
//!
//! `bool`, `len`, `int`, `float` and `str` must produce a concrete value
//! right away, so they cannot be captured. Each conversion fails with an
//! error naming the constructor that builds the equivalent node.

use super::Expr;
use crate::DefinitionError;

macro_rules! unsupported_conversion {
    ($target:ty, $op:literal, $workaround:literal) => {
        impl TryFrom<&Expr> for $target {
            type Error = DefinitionError;

            fn try_from(_: &Expr) -> Result<Self, Self::Error> {
                Err(DefinitionError::Unsupported {
                    op: $op,
                    workaround: $workaround,
                })
            }
        }

        impl TryFrom<Expr> for $target {
            type Error = DefinitionError;

            fn try_from(expr: Expr) -> Result<Self, Self::Error> {
                <$target>::try_from(&expr)
            }
        }
    };
}

unsupported_conversion!(bool, "bool", "builtins::bool_ or Expr::not_");
unsupported_conversion!(usize, "len", "builtins::len");
unsupported_conversion!(i64, "int", "builtins::int");
unsupported_conversion!(f64, "float", "builtins::float");
unsupported_conversion!(String, "str", "builtins::str_");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars;

    #[test]
    fn test_native_length_is_rejected() {
        let err = usize::try_from(&vars::l()).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::Unsupported {
                op: "len",
                workaround: "builtins::len",
            }
        );
        assert!(err.to_string().contains("builtins::len"));
    }

    #[test]
    fn test_truth_value_is_rejected() {
        let x = vars::x();
        assert!(bool::try_from(x.gt(0)).is_err());
        assert!(String::try_from(&x).is_err());
        assert!(i64::try_from(&x).is_err());
        assert!(f64::try_from(&x).is_err());
    }
}
