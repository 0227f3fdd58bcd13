//! Calls on resolved values

use crate::value::Kwargs;
use crate::{EvalError, Value};

/// Call `callee(args, **kwargs)`.
///
/// # Errors
///
/// `NotCallable` for non-function values, `ArityMismatch` or whatever the
/// function itself raises.
pub fn call_value(callee: &Value, args: &[Value], kwargs: &Kwargs) -> Result<Value, EvalError> {
    match callee {
        Value::Function(func) => func.call(args, kwargs),
        other => Err(EvalError::NotCallable(other.type_name().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NativeFn;

    #[test]
    fn test_call_function_value() {
        let inc = NativeFn::new("inc", 1, |args, _| {
            Ok(Value::Int(args[0].as_i64().unwrap_or_default() + 1))
        });
        let value = call_value(&Value::Function(inc), &[Value::Int(1)], &Kwargs::new());
        assert_eq!(value.unwrap(), Value::Int(2));
    }

    #[test]
    fn test_call_non_callable() {
        assert_eq!(
            call_value(&Value::Int(1), &[], &Kwargs::new()),
            Err(EvalError::NotCallable("int".to_string()))
        );
    }
}
