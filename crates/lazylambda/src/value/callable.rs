//! Native callable values

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::Value;
use crate::EvalError;

/// Keyword arguments, in call order.
pub type Kwargs = IndexMap<String, Value>;

/// Type alias for native function pointers to reduce complexity
pub type NativeFnPtr = Arc<dyn Fn(&[Value], &Kwargs) -> Result<Value, EvalError> + Send + Sync>;

/// Arity marker for functions accepting any number of arguments.
pub const VARIADIC: i32 = -1;

/// A native function.
///
/// These are Rust functions exposed to expressions, either as values
/// (`Value::Function`) or through an [`Adapter`](crate::Adapter).
#[derive(Clone)]
pub struct NativeFn {
    /// Function name (for display/debugging)
    pub name: Arc<str>,

    /// Arity (`VARIADIC` for any number of arguments)
    pub arity: i32,

    /// The actual function pointer
    pub func: NativeFnPtr,
}

impl NativeFn {
    /// Create a native function with a fixed arity.
    pub fn new<F>(name: impl Into<Arc<str>>, arity: i32, func: F) -> Self
    where
        F: Fn(&[Value], &Kwargs) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }

    /// Create a native function accepting any number of arguments.
    pub fn variadic<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&[Value], &Kwargs) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self::new(name, VARIADIC, func)
    }

    /// Invoke the function, checking the declared arity first.
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` when the argument count differs from a
    /// fixed arity, otherwise whatever the function itself returns.
    pub fn call(&self, args: &[Value], kwargs: &Kwargs) -> Result<Value, EvalError> {
        if let Ok(expected) = usize::try_from(self.arity) {
            let got = args.len() + kwargs.len();
            if got != expected {
                return Err(EvalError::ArityMismatch {
                    name: self.name.to_string(),
                    expected,
                    got,
                });
            }
        }
        (self.func)(args, kwargs)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
        match args[0] {
            Value::Int(n) => Ok(Value::Int(n * 2)),
            ref other => Err(EvalError::unary("double", other)),
        }
    }

    #[test]
    fn test_call_checks_arity() {
        let f = NativeFn::new("double", 1, double);
        assert_eq!(f.call(&[Value::Int(2)], &Kwargs::new()).unwrap(), Value::Int(4));
        assert_eq!(
            f.call(&[], &Kwargs::new()),
            Err(EvalError::ArityMismatch {
                name: "double".to_string(),
                expected: 1,
                got: 0
            })
        );
    }

    #[test]
    fn test_variadic_accepts_anything() {
        let f = NativeFn::variadic("count", |args, _| Ok(Value::Int(args.len() as i64)));
        let args = vec![Value::None; 3];
        assert_eq!(f.call(&args, &Kwargs::new()).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_debug_shows_name() {
        let f = NativeFn::new("double", 1, double);
        assert_eq!(format!("{:?}", f), "NativeFn(double)");
    }
}
