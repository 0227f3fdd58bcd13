//! Ready-made placeholder variables
//!
//! Each function returns the same process-wide variable on every call, so
//! `x() + x()` stays a single-variable expression. The type tags are
//! documentary only.
//!
//! ```
//! use lazylambda::vars::x;
//!
//! let double = (x() * 2).as_function();
//! assert_eq!(double.to_string(), "x * 2");
//! ```

use std::sync::OnceLock;

use crate::expr::{Expr, Var};

macro_rules! placeholders {
    ($($(#[$doc:meta])* $name:ident: $tag:literal;)+) => {
        $(
            $(#[$doc])*
            pub fn $name() -> Expr {
                static VAR: OnceLock<Expr> = OnceLock::new();
                VAR.get_or_init(|| {
                    Expr::var(Var::from_static(stringify!($name)).with_type_tag($tag))
                })
                .clone()
            }
        )+
    };
}

placeholders! {
    /// A string input
    s: "str";
    /// A boolean input
    b: "bool";
    /// A number input
    x: "float";
    /// A second number placeholder, for functions that are not combined with `x`
    y: "float";
    /// An integer input
    i: "int";
    /// Another integer placeholder
    j: "int";
    /// An integer count
    n: "int";
    /// A list input
    l: "list";
    /// A dict input
    d: "dict";
    /// A callable input
    f: "callable";
}
