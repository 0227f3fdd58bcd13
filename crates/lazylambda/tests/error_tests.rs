//! Construction, evaluation and printing failures

use lazylambda::vars::{s, x, y};
use lazylambda::*;
use pretty_assertions::assert_eq;

// ═══════════════════════════════════════════════════════════════════════
// Construction
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_mixing_variables_fails() {
    let err = Expr::try_binary(BinaryOp::Mul, x() + 1, y()).unwrap_err();
    assert!(matches!(err, DefinitionError::MixedVariables { .. }));
    assert!(err.to_string().contains("`x` and `y`"));
}

#[test]
fn test_same_name_is_not_same_variable() -> anyhow::Result<()> {
    let first = input_var("v")?;
    let second = input_var("v")?;
    assert!(Expr::try_compare(CompareOp::Lt, &first, &second).is_err());
    assert!(Expr::try_compare(CompareOp::Lt, &first, first.clone()).is_ok());
    Ok(())
}

#[test]
#[should_panic(expected = "not allowed to combine")]
fn test_operator_panics_on_mixed_variables() {
    let _ = x() + y();
}

#[test]
fn test_invalid_variable_names() {
    for name in ["", "1x", "a b", "x-y"] {
        assert_eq!(
            input_var(name).unwrap_err(),
            DefinitionError::InvalidVariableName(name.to_string())
        );
    }
    assert!(typed_var("price", "float").is_ok());
}

#[test]
fn test_literal_failures_surface_at_construction() {
    let err = Expr::try_binary(BinaryOp::Div, 1, 0).unwrap_err();
    match err {
        DefinitionError::Eager { source, .. } => assert_eq!(source, EvalError::ZeroDivision),
        other => panic!("expected an eager evaluation error, got {:?}", other),
    }
}

#[test]
fn test_native_conversions_name_their_workaround() {
    let x = x();
    let checks: [(DefinitionError, &str); 4] = [
        (bool::try_from(&x).unwrap_err(), "not_"),
        (i64::try_from(&x).unwrap_err(), "builtins::int"),
        (f64::try_from(&x).unwrap_err(), "builtins::float"),
        (String::try_from(&x).unwrap_err(), "builtins::str_"),
    ];
    for (err, workaround) in checks {
        assert!(err.to_string().contains(workaround), "{}", err);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Evaluation
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_error_names_the_failing_subexpression() {
    let x = x();
    let ratio = (&x + 1) / (&x - 1);
    let expr = &ratio * 3 + 1;
    let err = expr.evaluate(1).unwrap_err();
    assert_eq!(err.failing_expr(), Some("(x + 1) / (x - 1)"));
    assert_eq!(err.root_cause(), &EvalError::ZeroDivision);
    assert_eq!(
        err.to_string(),
        "division by zero (while evaluating `(x + 1) / (x - 1)`)"
    );
}

#[test]
fn test_type_errors_propagate() {
    let s = s();
    let err = (s.method("upper", ()) + 1).evaluate("a").unwrap_err();
    assert_eq!(
        err.root_cause(),
        &EvalError::InvalidBinaryOperands {
            op: "+".to_string(),
            left_type: "str".to_string(),
            right_type: "int".to_string(),
        }
    );
    assert_eq!(err.failing_expr(), Some("s.upper() + 1"));

    let missing = s.method("shout", ()).evaluate("a").unwrap_err();
    assert!(matches!(missing.root_cause(), EvalError::AttributeError { .. }));
}

#[test]
fn test_depth_limit() {
    let x = x();
    let deep = (0..10).fold(x.clone(), |tree, _| tree + 1);
    assert_eq!(deep.evaluate(0).unwrap(), Value::Int(10));

    let err = deep
        .evaluate_with(&Value::Int(0), &EvalContext::with_max_depth(5))
        .unwrap_err();
    assert_eq!(err.root_cause(), &EvalError::DepthExceeded(5));
}

#[test]
fn test_traced_evaluation_matches_plain() {
    let x = x();
    let expr = (&x * 2).pow(2);
    let ctx = EvalContext::new().traced(true);
    assert_eq!(
        expr.evaluate_with(&Value::Int(3), &ctx).unwrap(),
        expr.evaluate(3).unwrap()
    );
}

#[test]
fn test_lambda_error_conversions() -> std::result::Result<(), LambdaError> {
    let f = lambda(&(x() + 1));
    let value = f.call(1)?;
    assert_eq!(value, Value::Int(2));
    let failure: LambdaError = f.call("a").unwrap_err().into();
    assert!(matches!(failure, LambdaError::Eval(_)));
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Printing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_repr_disabled() {
    let x = x();
    let hidden = (&x + 1).with_repr(false);
    assert_eq!(hidden.to_repr(), Err(ReprError::Disabled));
    assert_eq!((&hidden * 2).to_repr().unwrap(), "<lambda> * 2");
    assert_eq!(hidden.evaluate(1).unwrap(), Value::Int(2));

    let f = lambda(&hidden);
    assert_eq!(f.try_repr(), Err(ReprError::Disabled));
    assert_eq!(f.to_string(), OPAQUE_MARKER);
    assert_eq!(f.with_repr(true).to_string(), "x + 1");
}
