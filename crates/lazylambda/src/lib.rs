//! # lazylambda
//!
//! Printable single-argument lambda expressions.
//!
//! Operators, comparisons, method calls and subscripts applied to a
//! placeholder variable build an immutable expression tree instead of
//! computing anything. The tree can be evaluated against an input later, or
//! printed back as a minimal, precedence-correct source string:
//!
//! ```
//! use lazylambda::{vars::x, Value};
//!
//! let affine: lazylambda::Expr = (1 + 1) * x() + 1;
//! let is_positive = affine.gt(0).as_function();
//! assert_eq!(is_positive.to_string(), "2 * x + 1 > 0");
//! assert_eq!(is_positive.call(-1).unwrap(), Value::Bool(false));
//! ```
//!
//! ## Architecture
//!
//! - **Expressions** ([`Expr`]): placeholder, literal, named constant or
//!   deferred operation nodes, built by operator overloading
//! - **Evaluator** ([`eval`]): walks a tree bottom-up with one input bound
//! - **Printer** ([`printer`]): renders a tree with minimal parentheses
//! - **Wrappers** ([`Lambda`]): callable, displayable frozen expressions
//! - **Adapters** ([`adapter`]): named functions and constants usable as
//!   leaves, plus a registry preloaded with a math [`catalog`]
//!
//! ## Limitations
//!
//! Anything Rust checks the type of cannot be deferred. The [`builtins`]
//! module has the replacements: `len`, `bool_`, `int`, `not_`, `is_in` and
//! so on.
//!
//! Short-circuit operators need a `bool`; use `&` and `|`:
//!
//! ```compile_fail
//! use lazylambda::vars::x;
//! let in_range = x().gt(1) && x().lt(5);
//! ```
//!
//! Chained comparisons do not exist:
//!
//! ```compile_fail
//! use lazylambda::vars::x;
//! let unit = 0 < x() < 1;
//! ```
//!
//! Expressions are not iterable:
//!
//! ```compile_fail
//! use lazylambda::vars::s;
//! for c in s() {}
//! ```
//!
//! Nor do they implement `Display`; use [`Expr::to_repr`] or wrap them:
//!
//! ```compile_fail
//! use lazylambda::vars::x;
//! let text = format!("{}", x() + 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod builtins;
pub mod catalog;
pub mod context;
pub mod error;
pub mod eval;
pub mod expr;
pub mod lambda;
pub mod printer;
pub mod value;
pub mod vars;

// Re-export main types
pub use adapter::{
    adapt, catalog as catalog_registry, constant, Adapter, AdapterKind, AdapterRegistry,
    RegistryEntry,
};
pub use context::EvalContext;
pub use error::{DefinitionError, EvalError, LambdaError, ReprError, Result};
pub use eval::{evaluate, evaluate_with, Evaluate};
pub use expr::{
    input_var, typed_var, BinaryOp, CompareOp, Expr, IntoArgs, Node, Op, Precedence, UnaryOp, Var,
};
pub use lambda::{as_function, lambda, lambdas, FunctionLike, Lambda};
pub use printer::{render, OPAQUE_MARKER};
pub use value::{HashableValue, Kwargs, NativeFn, Record, SliceValue, Value};

/// lazylambda version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
