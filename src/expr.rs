//! Lazily evaluated variable expressions.
//!
//! Build-file values such as paths and binding right-hand sides are stored as
//! [`Expr`] trees and expanded on demand against an [`Env`]. Evaluation is a
//! pure function of the expression and the scope supplied at call time, so the
//! same expression (for example a rule binding) can be expanded repeatedly
//! against different scopes. Results are never memoised.
//!
//! # Examples
//!
//! ```rust
//! use tsumiki::{env::Env, expr::Expr};
//!
//! let mut env = Env::new();
//! env.insert("cc", "gcc");
//! let expr = Expr::Concat(vec![Expr::var("cc"), Expr::lit(" -c")]);
//! assert_eq!(expr.evaluate(&env), "gcc -c");
//! ```

use crate::env::Env;
use serde::Serialize;

/// A variable expression: literal text, a variable reference, or an ordered
/// concatenation of sub-expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Literal text reproduced verbatim.
    Lit(String),
    /// A reference to a variable resolved against the evaluation scope.
    Var(String),
    /// An ordered sequence of sub-expressions joined without separators.
    Concat(Vec<Expr>),
}

impl Expr {
    /// Build a literal expression.
    #[must_use]
    pub fn lit(text: impl Into<String>) -> Self {
        Self::Lit(text.into())
    }

    /// Build a variable-reference expression.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// Expand this expression against `env`.
    ///
    /// References to unbound variables expand to the empty string; an absent
    /// binding is not an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsumiki::{env::Env, expr::Expr};
    ///
    /// let env = Env::new();
    /// assert_eq!(Expr::var("missing").evaluate(&env), "");
    /// ```
    #[must_use]
    pub fn evaluate(&self, env: &Env<'_>) -> String {
        match self {
            Self::Lit(text) => text.clone(),
            Self::Var(name) => env.lookup(name).unwrap_or_default().to_owned(),
            Self::Concat(parts) => parts.iter().map(|part| part.evaluate(env)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_preserves_order() {
        let mut env = Env::new();
        env.insert("obj", "out/main.o");
        let expr = Expr::Concat(vec![
            Expr::lit("touch "),
            Expr::var("obj"),
            Expr::var("unbound"),
        ]);
        assert_eq!(expr.evaluate(&env), "touch out/main.o");
    }

    #[test]
    fn repeated_evaluation_sees_scope_changes() {
        let expr = Expr::var("mode");
        let mut env = Env::new();
        env.insert("mode", "debug");
        assert_eq!(expr.evaluate(&env), "debug");
        env.insert("mode", "release");
        assert_eq!(expr.evaluate(&env), "release");
    }
}
