//! Lexical scope stack
//!
//! Index 0 is the program scope and is never popped. Each conditional branch
//! body gets its own scope on top of the stack for as long as the body is
//! being generated.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use super::value::VariableType;
use crate::{Error, Result};

/// A variable visible at some point of generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Variable name
    pub name: String,
    /// Declared type
    pub ty: VariableType,
}

/// Symbol table of one lexical block
///
/// Backed by a `BTreeMap` so that seeded runs pick the same bindings
/// regardless of hasher state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    bindings: BTreeMap<String, VariableType>,
}

impl Scope {
    /// Type of `name` if declared in this scope
    #[must_use]
    pub fn get(&self, name: &str) -> Option<VariableType> {
        self.bindings.get(name).copied()
    }

    /// Whether `name` is declared in this scope
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of bindings
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the scope has no bindings
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate bindings in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, VariableType)> {
        self.bindings.iter().map(|(name, ty)| (name.as_str(), *ty))
    }
}

/// Ordered stack of scopes, outermost first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Create a stack holding only the empty program scope
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Number of scopes on the stack, always at least 1
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Drop every scope and binding, leaving one empty program scope
    pub fn reset(&mut self) {
        self.scopes.clear();
        self.scopes.push(Scope::default());
    }

    /// Open a new innermost scope
    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
        tracing::trace!(depth = self.depth(), "scope pushed");
    }

    /// Close the innermost scope, discarding its bindings
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScopeUnderflow`] if only the program scope remains.
    pub fn pop(&mut self) -> Result<Scope> {
        if self.scopes.len() <= 1 {
            return Err(Error::ScopeUnderflow);
        }
        let scope = self.scopes.pop().ok_or(Error::ScopeUnderflow)?;
        tracing::trace!(depth = self.depth(), discarded = scope.len(), "scope popped");
        Ok(scope)
    }

    /// The currently active scope
    #[must_use]
    pub fn innermost(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    /// Bind `name` in the innermost scope
    ///
    /// Returns `false` and leaves the scope untouched if the name is already
    /// bound there. Names bound in outer scopes may be reused.
    pub fn declare(&mut self, name: impl Into<String>, ty: VariableType) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        let name = name.into();
        if scope.bindings.contains_key(&name) {
            return false;
        }
        scope.bindings.insert(name, ty);
        true
    }

    /// Find a visible binding, optionally restricted to one type
    ///
    /// Scopes are searched innermost first. Within the first scope holding a
    /// match, one matching binding is picked uniformly at random so earlier
    /// declarations are not favoured.
    pub fn lookup<R: Rng + ?Sized>(
        &self,
        ty: Option<VariableType>,
        rng: &mut R,
    ) -> Option<Binding> {
        self.scopes.iter().rev().find_map(|scope| {
            let candidates: Vec<(&String, &VariableType)> = scope
                .bindings
                .iter()
                .filter(|(_, bound)| ty.map_or(true, |wanted| **bound == wanted))
                .collect();
            candidates.choose(rng).map(|(name, bound)| Binding {
                name: (*name).clone(),
                ty: **bound,
            })
        })
    }

    /// Resolve `name` the way a reader of the output would: innermost first
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<VariableType> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Every name visible from the innermost scope
    #[must_use]
    pub fn visible_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .scopes
            .iter()
            .flat_map(|scope| scope.iter().map(|(name, _)| name.to_string()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_new_stack_has_root_scope() {
        let stack = ScopeStack::new();
        assert_eq!(stack.depth(), 1);
        assert!(stack.innermost().is_empty());
    }

    #[test]
    fn test_push_pop_depth() {
        let mut stack = ScopeStack::new();
        stack.push();
        stack.push();
        assert_eq!(stack.depth(), 3);
        stack.pop().unwrap();
        assert_eq!(stack.depth(), 2);
        stack.pop().unwrap();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_pop_root_is_error() {
        let mut stack = ScopeStack::new();
        assert!(matches!(stack.pop(), Err(Error::ScopeUnderflow)));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_declare_rejects_duplicate_in_same_scope() {
        let mut stack = ScopeStack::new();
        assert!(stack.declare("x", VariableType::Number));
        assert!(!stack.declare("x", VariableType::String));
        assert_eq!(stack.resolve("x"), Some(VariableType::Number));
    }

    #[test]
    fn test_declare_allows_shadowing_in_child_scope() {
        let mut stack = ScopeStack::new();
        stack.declare("x", VariableType::Number);
        stack.push();
        assert!(stack.declare("x", VariableType::Boolean));
        assert_eq!(stack.resolve("x"), Some(VariableType::Boolean));
        stack.pop().unwrap();
        assert_eq!(stack.resolve("x"), Some(VariableType::Number));
    }

    #[test]
    fn test_pop_discards_bindings() {
        let mut stack = ScopeStack::new();
        stack.push();
        stack.declare("inner", VariableType::String);
        let popped = stack.pop().unwrap();
        assert!(popped.contains("inner"));
        assert_eq!(stack.resolve("inner"), None);
        assert!(stack.lookup(None, &mut rng()).is_none());
    }

    #[test]
    fn test_lookup_empty_stack() {
        let stack = ScopeStack::new();
        assert!(stack.lookup(None, &mut rng()).is_none());
        assert!(stack.lookup(Some(VariableType::Number), &mut rng()).is_none());
    }

    #[test]
    fn test_lookup_by_type() {
        let mut stack = ScopeStack::new();
        stack.declare("n", VariableType::Number);
        stack.declare("s", VariableType::String);

        let found = stack.lookup(Some(VariableType::String), &mut rng()).unwrap();
        assert_eq!(found.name, "s");
        assert_eq!(found.ty, VariableType::String);
        assert!(stack.lookup(Some(VariableType::Boolean), &mut rng()).is_none());
    }

    #[test]
    fn test_lookup_prefers_innermost_scope() {
        let mut stack = ScopeStack::new();
        stack.declare("outer", VariableType::Number);
        stack.push();
        stack.declare("inner", VariableType::Number);

        let mut rng = rng();
        for _ in 0..20 {
            let found = stack.lookup(Some(VariableType::Number), &mut rng).unwrap();
            assert_eq!(found.name, "inner");
        }
    }

    #[test]
    fn test_lookup_falls_through_to_outer_scope() {
        let mut stack = ScopeStack::new();
        stack.declare("flag", VariableType::Boolean);
        stack.push();
        stack.declare("count", VariableType::Number);

        let found = stack.lookup(Some(VariableType::Boolean), &mut rng()).unwrap();
        assert_eq!(found.name, "flag");
    }

    #[test]
    fn test_lookup_is_not_biased_to_first_declared() {
        let mut stack = ScopeStack::new();
        for name in ["a", "b", "c", "d"] {
            stack.declare(name, VariableType::Number);
        }
        let mut rng = rng();
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(stack.lookup(None, &mut rng).unwrap().name);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_reset() {
        let mut stack = ScopeStack::new();
        stack.declare("x", VariableType::Number);
        stack.push();
        stack.push();
        stack.reset();
        assert_eq!(stack.depth(), 1);
        assert!(stack.visible_names().is_empty());
    }

    #[test]
    fn test_visible_names_dedups_shadowed() {
        let mut stack = ScopeStack::new();
        stack.declare("x", VariableType::Number);
        stack.declare("y", VariableType::Number);
        stack.push();
        stack.declare("x", VariableType::String);
        assert_eq!(stack.visible_names(), vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_scope_iter_in_name_order() {
        let mut stack = ScopeStack::new();
        stack.declare("zeta", VariableType::Boolean);
        stack.declare("alpha", VariableType::Number);
        let bindings: Vec<_> = stack.innermost().iter().collect();
        assert_eq!(
            bindings,
            vec![("alpha", VariableType::Number), ("zeta", VariableType::Boolean)]
        );
    }
}
