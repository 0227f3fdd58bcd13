//! Value representation for runtime values

mod callable;
mod compound;
mod display;
mod hashable;
mod impls;

pub use callable::{Kwargs, NativeFn, NativeFnPtr, VARIADIC};
pub use compound::{Record, SliceValue};
pub use hashable::HashableValue;

use std::sync::Arc;

use indexmap::IndexMap;

/// Runtime value flowing through expression evaluation.
///
/// Values follow the semantics of a dynamically typed scripting language:
/// - Inline scalars (no allocation)
/// - Heap-allocated containers (Arc-wrapped, cheap to clone)
/// - Native callables
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// The absent value, `None`
    None,

    /// Boolean: `True` or `False`
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    // ═══════════════════════════════════════════════════════════════════
    // Containers
    // ═══════════════════════════════════════════════════════════════════
    /// Unicode string
    Str(Arc<String>),

    /// Mutable-in-spirit sequence, `[a, b]`
    List(Arc<Vec<Value>>),

    /// Fixed sequence, `(a, b)`
    Tuple(Arc<Vec<Value>>),

    /// Insertion-ordered mapping, `{k: v}`
    Dict(Arc<IndexMap<HashableValue, Value>>),

    /// Slice object used for subscripting, `start:stop:step`
    Slice(Arc<SliceValue>),

    /// Named record with ordered fields, supports attribute access
    Record(Arc<Record>),

    // ═══════════════════════════════════════════════════════════════════
    // Callables
    // ═══════════════════════════════════════════════════════════════════
    /// Native function
    Function(NativeFn),
}
