use im::HashMap;

use crate::term::Term;

/// Naming environment for evaluation: free variables of the evaluated term
/// resolve here.
///
/// Bindings hold unevaluated terms; a binding is evaluated each time its name
/// is reached. Extending a scope shares structure with the original, which
/// stays usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    bindings: HashMap<String, Term>,
}

impl Scope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope with the given bindings pre-loaded
    pub fn with_bindings(bindings: impl IntoIterator<Item = (String, Term)>) -> Self {
        Scope {
            bindings: bindings.into_iter().collect(),
        }
    }

    /// Resolve a name
    pub fn resolve(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }

    /// Add a binding, replacing any earlier binding of the same name
    pub fn add(&mut self, name: impl ToString, value: Term) {
        self.bindings.insert(name.to_string(), value);
    }

    /// A new scope with one more binding
    pub fn extend(&self, name: impl ToString, value: Term) -> Scope {
        Scope {
            bindings: self.bindings.update(name.to_string(), value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_missing() {
        assert!(Scope::new().resolve("x").is_none());
    }

    #[test]
    fn test_add_replaces() {
        let mut scope = Scope::new();
        scope.add("x", Term::int(1));
        scope.add("x", Term::int(2));
        assert_eq!(scope.resolve("x"), Some(&Term::int(2)));
    }

    #[test]
    fn test_extend_keeps_original() {
        let scope = Scope::with_bindings(vec![("x".to_string(), Term::int(1))]);
        let extended = scope.extend("y", Term::bool(true));
        assert!(scope.resolve("y").is_none());
        assert_eq!(extended.resolve("x"), Some(&Term::int(1)));
        assert_eq!(extended.resolve("y"), Some(&Term::bool(true)));
    }
}
