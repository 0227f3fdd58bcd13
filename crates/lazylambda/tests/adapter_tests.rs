//! Adapters, named constants and the catalog registry

use lazylambda::vars::{s, x};
use lazylambda::*;
use pretty_assertions::assert_eq;

fn clamp(args: &[Value], _: &Kwargs) -> std::result::Result<Value, EvalError> {
    match args {
        [value, low, high] => {
            let value = value.as_f64().unwrap_or_default();
            let low = low.as_f64().unwrap_or_default();
            let high = high.as_f64().unwrap_or_default();
            Ok(Value::Float(value.max(low).min(high)))
        }
        _ => Err(EvalError::TypeError("clamp takes 3 arguments".to_string())),
    }
}

#[test]
fn test_catalog_functions() -> anyhow::Result<()> {
    let registry = AdapterRegistry::with_catalog();
    let sqrt = registry
        .adapter("sqrt")
        .ok_or_else(|| anyhow::anyhow!("missing sqrt"))?;
    let root = sqrt.call((x(),));
    assert_eq!(root.to_repr()?, "sqrt(x)");
    assert_eq!(root.evaluate(9)?, Value::Float(3.0));

    let domain = root.evaluate(-1).unwrap_err();
    assert_eq!(
        domain.root_cause(),
        &EvalError::ValueError("math domain error".to_string())
    );
    Ok(())
}

#[test]
fn test_catalog_constants_stay_named() -> anyhow::Result<()> {
    let pi = catalog_registry()
        .constant("pi")
        .ok_or_else(|| anyhow::anyhow!("missing pi"))?;
    let tau = &pi * 2;
    assert_eq!(tau.to_repr()?, "pi * 2");
    assert_eq!(tau.evaluate(())?, Value::Float(std::f64::consts::TAU));

    let e = catalog_registry()
        .constant("e")
        .ok_or_else(|| anyhow::anyhow!("missing e"))?;
    assert_eq!((&e + &e).to_repr()?, "e + e");
    Ok(())
}

#[test]
fn test_catalog_contents() {
    let registry = catalog_registry();
    for name in ["sin", "cos", "log10", "floor", "min", "max", "sum", "tau", "inf", "nan"] {
        assert!(registry.contains(name), "{} should be registered", name);
    }
    assert!(registry.adapter("pi").is_none());
    assert!(registry.constant("sin").is_none());
}

#[test]
fn test_aggregates_on_lists() -> anyhow::Result<()> {
    let l = vars::l();
    let biggest = catalog_registry()
        .adapter("max")
        .ok_or_else(|| anyhow::anyhow!("missing max"))?
        .call((&l,));
    let input = Value::list(vec![Value::Int(4), Value::Float(7.5), Value::Int(-1)]);
    assert_eq!(biggest.to_repr()?, "max(l)");
    assert_eq!(biggest.evaluate(input)?, Value::Float(7.5));
    Ok(())
}

#[test]
fn test_adapted_function_item() -> anyhow::Result<()> {
    let clamp = adapt(clamp, None)?;
    let expr = clamp.call((x(), 0, 1));
    assert_eq!(expr.to_repr()?, "clamp(x, 0, 1)");
    assert_eq!(expr.evaluate(1.5)?, Value::Float(1.0));
    assert_eq!(expr.evaluate(0.25)?, Value::Float(0.25));
    Ok(())
}

#[test]
fn test_adapter_used_as_an_argument() -> anyhow::Result<()> {
    let f = vars::f();
    let sqrt = catalog_registry()
        .adapter("sqrt")
        .ok_or_else(|| anyhow::anyhow!("missing sqrt"))?;
    let called = f.call((sqrt.as_expr(),));
    assert_eq!(called.to_repr()?, "f(sqrt)");

    let at_sixteen = NativeFn::new("at_sixteen", 1, |args, kwargs| match args[0].as_function() {
        Some(func) => func.call(&[Value::Int(16)], kwargs),
        None => Err(EvalError::NotCallable(args[0].type_name().to_string())),
    });
    assert_eq!(called.evaluate(Value::Function(at_sixteen))?, Value::Float(4.0));
    Ok(())
}

#[test]
fn test_method_adapter_with_keywords() -> anyhow::Result<()> {
    let split = Adapter::method("split").call_with((s(),), [("sep", ",")]);
    assert_eq!(split.to_repr()?, "split(s, sep=',')");
    assert_eq!(
        split.evaluate("a,b")?,
        Value::list(vec![Value::from("a"), Value::from("b")])
    );
    Ok(())
}

#[test]
fn test_registry_replaces_entries() {
    let registry = AdapterRegistry::new();
    registry.register_constant("limit", 10);
    let previous = registry.register_constant("limit", 20);
    assert!(matches!(previous, Some(RegistryEntry::Constant(_))));
    assert_eq!(registry.len(), 1);
    let limit = registry.constant("limit").unwrap();
    assert_eq!(limit.evaluate(()).unwrap(), Value::Int(20));
}

#[test]
fn test_registry_is_shared_across_threads() {
    let registry = std::sync::Arc::new(AdapterRegistry::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = std::sync::Arc::clone(&registry);
            std::thread::spawn(move || {
                registry.register_constant(&format!("c{}", i), i);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(registry.names(), vec!["c0", "c1", "c2", "c3"]);
}

#[test]
fn test_lambda_display_is_shared_across_threads() {
    let x = x();
    let f = lambda(&(&x * 2 + 1).gt(0));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let f = f.clone();
            std::thread::spawn(move || f.to_string())
        })
        .collect();
    let rendered: Vec<String> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert!(rendered.iter().all(|text| text == "x * 2 + 1 > 0"));
    assert_eq!(f.to_string(), "x * 2 + 1 > 0");
}

#[test]
fn test_constructor_as_constant() -> anyhow::Result<()> {
    let point = NativeFn::new("Point", 2, |args: &[Value], _: &Kwargs| match args {
        [px, py] => Ok(Value::record(
            Record::new("Point")
                .with_field("x", px.clone())
                .with_field("y", py.clone()),
        )),
        _ => Err(EvalError::TypeError("Point takes 2 arguments".to_string())),
    });
    let x = x();
    let make = constant(Value::Function(point), Some("Point"));
    let diagonal = make.call((&x, &x));
    assert_eq!(diagonal.to_repr()?, "Point(x, x)");
    assert_eq!(
        diagonal.evaluate(3)?,
        Value::record(Record::new("Point").with_field("x", 3).with_field("y", 3))
    );

    let abscissa = lambda(&diagonal.attr("x"));
    assert_eq!(abscissa.to_string(), "Point(x, x).x");
    assert_eq!(abscissa.call(5)?, Value::Int(5));
    Ok(())
}
