//! Chained variable-binding scopes.
//!
//! An [`Env`] owns its local bindings and optionally borrows a parent scope.
//! Lookups walk from the innermost scope outward and return the first match;
//! mutations always land in the local scope, so a child never disturbs its
//! parent while parent bindings stay visible through the chain. `include`d
//! files share the includer's scope, whereas `subninja` files run inside a
//! fresh [`Env::child_scope`] that is dropped when the sub-file completes.
//!
//! # Examples
//!
//! ```rust
//! use tsumiki::env::Env;
//!
//! let mut parent = Env::new();
//! parent.insert("cflags", "-O2");
//! let mut child = parent.child_scope();
//! child.insert("cflags", "-O0");
//! assert_eq!(child.lookup("cflags"), Some("-O0"));
//! drop(child);
//! assert_eq!(parent.lookup("cflags"), Some("-O2"));
//! ```

use crate::expr::Expr;
use indexmap::IndexMap;

/// A mutable variable scope with an optional borrowed parent.
#[derive(Debug, Default)]
pub struct Env<'a> {
    bindings: IndexMap<String, String>,
    parent: Option<&'a Env<'a>>,
}

impl<'a> Env<'a> {
    /// Create an empty root scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name`, searching the local scope first and then each ancestor
    /// in turn. Returns `None` when no scope in the chain binds the name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.bindings
            .get(name)
            .map(String::as_str)
            .or_else(|| self.parent.and_then(|parent| parent.lookup(name)))
    }

    /// Store an already-resolved value in the local scope, shadowing any
    /// binding of the same name in an ancestor.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bindings.insert(name.into(), value.into());
    }

    /// Evaluate `value` against the current scope and store the result under
    /// `name` in the local scope.
    ///
    /// Top-level `name = value` statements use this path; rule-body bindings
    /// are instead stored unevaluated inside [`crate::ir::Rule`].
    pub fn bind_eager(&mut self, name: impl Into<String>, value: &Expr) {
        let text = value.evaluate(self);
        self.bindings.insert(name.into(), text);
    }

    /// Create a child scope whose lookups fall back to `self`.
    ///
    /// The child starts empty; nothing is copied. Mutating the child is
    /// invisible to `self`, while bindings later added to `self` remain
    /// visible through the child's lookup chain.
    #[must_use]
    pub fn child_scope(&self) -> Env<'_> {
        Env {
            bindings: IndexMap::new(),
            parent: Some(self),
        }
    }

    /// Flatten the scope chain into a single ordered map, with inner scopes
    /// overriding outer ones. Used to capture the scope a build edge was
    /// declared in without tying the IR to the scope chain's lifetimes.
    #[must_use]
    pub fn snapshot(&self) -> IndexMap<String, String> {
        let mut flat = self.parent.map_or_else(IndexMap::new, Env::snapshot);
        for (name, value) in &self.bindings {
            flat.insert(name.clone(), value.clone());
        }
        flat
    }
}
