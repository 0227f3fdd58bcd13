//! Adapters: named functions and constants usable inside expressions
//!
//! An [`Adapter`] wraps a native function (or a method name) so that calling
//! it with expression arguments builds a deferred call node printed as
//! `name(args)`. Called with literal arguments only, it runs immediately.

use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use indexmap::IndexMap;

use crate::catalog::{CatalogKind, CATALOG};
use crate::eval::method::call_method;
use crate::expr::{built, is_identifier, Expr, IntoArgs, Op, Precedence};
use crate::value::{Kwargs, NativeFn, VARIADIC};
use crate::{DefinitionError, EvalError, Value};

/// What an adapter calls.
#[derive(Clone, Debug)]
pub enum AdapterKind {
    /// A native function taking the call's arguments
    Function(NativeFn),
    /// A method looked up on the first argument, `args[0].name(args[1..])`
    Method(Arc<str>),
}

/// A named callable usable as an expression leaf.
#[derive(Clone)]
pub struct Adapter {
    name: Arc<str>,
    kind: AdapterKind,
    precedence: Precedence,
}

impl Adapter {
    /// Adapt a native function under `name`.
    pub fn function(name: impl Into<Arc<str>>, func: NativeFn) -> Self {
        Self {
            name: name.into(),
            kind: AdapterKind::Function(func),
            precedence: Precedence::POSTFIX,
        }
    }

    /// Adapt a native function under its own name.
    pub fn from_native(func: NativeFn) -> Self {
        Self::function(Arc::clone(&func.name), func)
    }

    /// Adapt the method `name`, called on the first argument.
    ///
    /// `Adapter::method("upper").call((s,))` evaluates `s.upper()` but prints
    /// as `upper(s)`.
    pub fn method(name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        Self {
            kind: AdapterKind::Method(Arc::clone(&name)),
            name,
            precedence: Precedence::POSTFIX,
        }
    }

    /// Copy of this adapter printed under another name.
    pub fn renamed(&self, name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Set the precedence of call nodes built by this adapter (builder pattern).
    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What this adapter calls
    pub fn kind(&self) -> &AdapterKind {
        &self.kind
    }

    /// Precedence of call nodes built by this adapter
    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    /// Build `name(args)`.
    ///
    /// # Errors
    ///
    /// `MixedVariables` if arguments refer to different input variables,
    /// `Eager` if every argument is a literal and the call fails.
    pub fn try_call(&self, args: impl IntoArgs) -> Result<Expr, DefinitionError> {
        Expr::apply(Op::Apply(self.clone()), args.into_args(), IndexMap::new())
    }

    /// Build `name(args, key=value...)`.
    ///
    /// # Errors
    ///
    /// See [`Adapter::try_call`].
    pub fn try_call_with<I, K, E>(&self, args: impl IntoArgs, kwargs: I) -> Result<Expr, DefinitionError>
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Expr>,
    {
        let keywords = kwargs
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Expr::apply(Op::Apply(self.clone()), args.into_args(), keywords)
    }

    /// Build `name(args)`.
    ///
    /// # Panics
    ///
    /// Panics where [`Adapter::try_call`] returns an error.
    #[track_caller]
    pub fn call(&self, args: impl IntoArgs) -> Expr {
        built(self.try_call(args))
    }

    /// Build `name(args, key=value...)`.
    ///
    /// # Panics
    ///
    /// Panics where [`Adapter::try_call_with`] returns an error.
    #[track_caller]
    pub fn call_with<I, K, E>(&self, args: impl IntoArgs, kwargs: I) -> Expr
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Expr>,
    {
        built(self.try_call_with(args, kwargs))
    }

    /// The adapted callable itself as a leaf, printed by name.
    ///
    /// Useful to pass the function as an argument: `f.call((sqrt.as_expr(),))`.
    pub fn as_expr(&self) -> Expr {
        Expr::constant(Arc::clone(&self.name), Value::Function(self.to_native()))
    }

    /// A native function value performing this adapter's call.
    pub fn to_native(&self) -> NativeFn {
        match &self.kind {
            AdapterKind::Function(func) => func.clone(),
            AdapterKind::Method(_) => {
                let adapter = self.clone();
                NativeFn::variadic(Arc::clone(&self.name), move |args, kwargs| {
                    adapter.invoke(args, kwargs)
                })
            }
        }
    }

    pub(crate) fn invoke(&self, args: &[Value], kwargs: &Kwargs) -> Result<Value, EvalError> {
        match &self.kind {
            AdapterKind::Function(func) => func.call(args, kwargs),
            AdapterKind::Method(method) => match args.split_first() {
                Some((receiver, rest)) => call_method(receiver, method, rest, kwargs),
                None => Err(EvalError::TypeError(format!(
                    "{}() needs a receiver argument",
                    self.name
                ))),
            },
        }
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Adapter({})", self.name)
    }
}

/// Adapt a native function item.
///
/// Without a `name`, the display name is the last segment of the item's
/// path (`my_crate::stats::divide` prints as `divide`). Closures and
/// function pointers carry no usable name and need one.
///
/// The resulting adapter accepts any number of arguments.
///
/// # Errors
///
/// `AnonymousTarget` when no name is given and none can be derived.
pub fn adapt<F>(func: F, name: Option<&str>) -> Result<Adapter, DefinitionError>
where
    F: Fn(&[Value], &Kwargs) -> Result<Value, EvalError> + Send + Sync + 'static,
{
    let name: Arc<str> = match name {
        Some(name) => name.into(),
        None => derived_name::<F>()?.into(),
    };
    Ok(Adapter::function(
        Arc::clone(&name),
        NativeFn::new(name, VARIADIC, func),
    ))
}

fn derived_name<F>() -> Result<&'static str, DefinitionError> {
    let full = std::any::type_name::<F>();
    let last = full.rsplit("::").next().unwrap_or(full);
    if is_identifier(last) && !full.starts_with("fn(") {
        Ok(last)
    } else {
        Err(DefinitionError::AnonymousTarget(full.to_string()))
    }
}

/// A named constant leaf.
///
/// Operations with it stay deferred and print the name: `e + e` rather
/// than `5.43656365691809`. Without a name it prints through `repr`.
pub fn constant(value: impl Into<Value>, name: Option<&str>) -> Expr {
    let value = value.into();
    let name: Arc<str> = match name {
        Some(name) => name.into(),
        None => value.repr().into(),
    };
    Expr::constant(name, value)
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// An entry of an [`AdapterRegistry`].
#[derive(Clone, Debug)]
pub enum RegistryEntry {
    /// A callable adapter
    Adapter(Adapter),
    /// A named constant leaf
    Constant(Expr),
}

/// A concurrent, name-indexed collection of adapters and constants.
#[derive(Debug, Default)]
pub struct AdapterRegistry {
    entries: DashMap<String, RegistryEntry>,
}

impl AdapterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the standard math catalog.
    pub fn with_catalog() -> Self {
        let registry = Self::new();
        registry.load_catalog();
        registry
    }

    /// Register every catalog record, replacing same-named entries.
    pub fn load_catalog(&self) {
        for record in CATALOG {
            let entry = match record.kind {
                CatalogKind::Function(func) => RegistryEntry::Adapter(
                    Adapter::function(record.name, NativeFn::new(record.name, record.arity, func))
                        .with_precedence(record.precedence),
                ),
                CatalogKind::Constant(value) => RegistryEntry::Constant(
                    Expr::constant_with_precedence(record.name, value, record.precedence),
                ),
            };
            self.entries.insert(record.name.to_string(), entry);
        }
        tracing::debug!(records = CATALOG.len(), total = self.len(), "loaded adapter catalog");
    }

    /// Register an adapter under its name, returning the entry it replaces.
    pub fn register(&self, adapter: Adapter) -> Option<RegistryEntry> {
        self.entries
            .insert(adapter.name().to_string(), RegistryEntry::Adapter(adapter))
    }

    /// Register a named constant, returning the entry it replaces.
    pub fn register_constant(&self, name: &str, value: impl Into<Value>) -> Option<RegistryEntry> {
        self.entries.insert(
            name.to_string(),
            RegistryEntry::Constant(constant(value, Some(name))),
        )
    }

    /// Look up an entry by name
    pub fn get(&self, name: &str) -> Option<RegistryEntry> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    /// Look up an adapter by name; constants are not returned.
    pub fn adapter(&self, name: &str) -> Option<Adapter> {
        match self.get(name)? {
            RegistryEntry::Adapter(adapter) => Some(adapter),
            RegistryEntry::Constant(_) => None,
        }
    }

    /// Look up a constant by name; adapters are not returned.
    pub fn constant(&self, name: &str) -> Option<Expr> {
        match self.get(name)? {
            RegistryEntry::Constant(expr) => Some(expr),
            RegistryEntry::Adapter(_) => None,
        }
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The process-wide registry, loaded with the catalog on first use.
pub fn catalog() -> &'static AdapterRegistry {
    static CATALOG_REGISTRY: OnceLock<AdapterRegistry> = OnceLock::new();
    CATALOG_REGISTRY.get_or_init(AdapterRegistry::with_catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars;
    use pretty_assertions::assert_eq;

    fn halve(args: &[Value], _: &Kwargs) -> Result<Value, EvalError> {
        let x = args.first().and_then(Value::as_f64).unwrap_or_default();
        Ok(Value::Float(x / 2.0))
    }

    #[test]
    fn test_name_derived_from_function_item() {
        let adapter = adapt(halve, None).unwrap();
        assert_eq!(adapter.name(), "halve");
        let expr = adapter.call((vars::x(),));
        assert_eq!(expr.to_repr().unwrap(), "halve(x)");
        assert_eq!(expr.evaluate(3).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn test_closures_need_a_name() {
        let err = adapt(|_: &[Value], _: &Kwargs| Ok(Value::None), None).unwrap_err();
        assert!(matches!(err, DefinitionError::AnonymousTarget(_)));
        let named = adapt(|_: &[Value], _: &Kwargs| Ok(Value::None), Some("noop")).unwrap();
        assert_eq!(named.name(), "noop");
    }

    #[test]
    fn test_literal_arguments_run_immediately() {
        let adapter = adapt(halve, None).unwrap();
        let expr = adapter.call((5,));
        assert_eq!(expr.literal_value(), Some(&Value::Float(2.5)));
    }

    #[test]
    fn test_method_adapter() {
        let upper = Adapter::method("upper");
        let expr = upper.call((vars::s(),));
        assert_eq!(expr.to_repr().unwrap(), "upper(s)");
        assert_eq!(expr.evaluate("abc").unwrap(), Value::from("ABC"));
        assert!(upper.invoke(&[], &Kwargs::new()).is_err());
    }

    #[test]
    fn test_renamed() {
        let adapter = adapt(halve, None).unwrap().renamed("half");
        assert_eq!(adapter.call((vars::x(),)).to_repr().unwrap(), "half(x)");
    }

    #[test]
    fn test_named_constant() {
        let e = constant(std::f64::consts::E, Some("e"));
        let x = vars::x();
        assert_eq!((&x + &e).to_repr().unwrap(), "x + e");
        assert_eq!((&e + &e).to_repr().unwrap(), "e + e");
        let unnamed = constant(2, None);
        assert_eq!((&x * &unnamed).to_repr().unwrap(), "x * 2");
    }

    #[test]
    fn test_registry_operations() {
        let registry = AdapterRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(adapt(halve, None).unwrap()).is_none());
        registry.register_constant("answer", 42);
        assert!(registry.contains("halve"));
        assert!(registry.adapter("answer").is_none());
        assert_eq!(registry.names(), vec!["answer".to_string(), "halve".to_string()]);
        let answer = registry.constant("answer").unwrap();
        assert_eq!(answer.evaluate(()).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_global_catalog() {
        let registry = catalog();
        assert!(registry.contains("sin"));
        assert!(registry.contains("pi"));
        assert!(registry.len() >= 20);
    }
}
