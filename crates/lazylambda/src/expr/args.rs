//! Positional argument lists for deferred calls

use super::Expr;

/// Anything that can serve as the positional arguments of a deferred call.
///
/// Implemented for `()`, tuples of up to six `Into<Expr>` items, arrays and
/// vectors:
///
/// ```
/// use lazylambda::vars::s;
///
/// let no_args = s().method("lower", ());
/// let one_arg = s().method("startswith", ("he",));
/// let two_args = s().method("replace", ("l", "L"));
/// # let _ = (no_args, one_arg, two_args);
/// ```
pub trait IntoArgs {
    /// Convert into an ordered argument list.
    fn into_args(self) -> Vec<Expr>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Expr> {
        Vec::new()
    }
}

impl<E: Into<Expr>> IntoArgs for Vec<E> {
    fn into_args(self) -> Vec<Expr> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<E: Into<Expr>, const N: usize> IntoArgs for [E; N] {
    fn into_args(self) -> Vec<Expr> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! tuple_args {
    ($($name:ident),+) => {
        impl<$($name: Into<Expr>),+> IntoArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<Expr> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

tuple_args!(A);
tuple_args!(A, B);
tuple_args!(A, B, C);
tuple_args!(A, B, C, D);
tuple_args!(A, B, C, D, E);
tuple_args!(A, B, C, D, E, F);
