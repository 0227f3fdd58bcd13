//! Placeholder variables

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{Expr, Node};
use crate::DefinitionError;

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a placeholder variable.
///
/// Two variables created separately never share an identity, even when
/// they carry the same display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

/// The symbolic stand-in for the eventual input of a lambda expression.
#[derive(Clone)]
pub struct Var {
    id: VarId,
    name: Arc<str>,
    type_tag: Option<&'static str>,
}

impl Var {
    /// Create a new variable with a fresh identity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidVariableName` unless `name` is an identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, DefinitionError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(DefinitionError::InvalidVariableName(name));
        }
        Ok(Self {
            id: VarId(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            type_tag: None,
        })
    }

    /// Variable for a name known to be an identifier.
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(is_identifier(name));
        Self {
            id: VarId(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            type_tag: None,
        }
    }

    /// Attach a documentary type tag (builder pattern). It is never checked.
    pub fn with_type_tag(mut self, tag: &'static str) -> Self {
        self.type_tag = Some(tag);
        self
    }

    /// Identity of this variable
    pub fn id(&self) -> VarId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentary type tag, if any
    pub fn type_tag(&self) -> Option<&'static str> {
        self.type_tag
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Var {}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_tag {
            Some(tag) => write!(f, "Var({}: {})", self.name, tag),
            None => write!(f, "Var({})", self.name),
        }
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Create a placeholder variable expression.
///
/// It is recommended to use a very short name identical to the Rust
/// binding, for example `let s = input_var("s")?`.
///
/// # Errors
///
/// Returns `InvalidVariableName` unless `name` is an identifier.
pub fn input_var(name: impl Into<String>) -> Result<Expr, DefinitionError> {
    Ok(Expr::var(Var::new(name)?))
}

/// Create a placeholder variable expression with a documentary type tag.
///
/// # Errors
///
/// Returns `InvalidVariableName` unless `name` is an identifier.
pub fn typed_var(name: impl Into<String>, tag: &'static str) -> Result<Expr, DefinitionError> {
    Ok(Expr::var(Var::new(name)?.with_type_tag(tag)))
}

impl Expr {
    /// Wrap a variable as a leaf expression.
    pub fn var(var: Var) -> Self {
        let root = Some(var.clone());
        Expr::from_parts(Node::Var(var), root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_identities() {
        let a = Var::new("x").unwrap();
        let b = Var::new("x").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_invalid_names() {
        assert!(Var::new("").is_err());
        assert!(Var::new("1x").is_err());
        assert!(Var::new("a b").is_err());
        assert!(Var::new("_tmp2").is_ok());
    }

    #[test]
    fn test_type_tag_is_documentary() {
        let var = Var::new("s").unwrap().with_type_tag("str");
        assert_eq!(var.type_tag(), Some("str"));
        assert_eq!(format!("{:?}", var), "Var(s: str)");
    }
}
