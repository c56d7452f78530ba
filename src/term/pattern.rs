//! # Patterns
//!
//! Patterns appear in the cases of a [`Term::Match`](super::Term::Match) and
//! are tried against the subject in order:
//!
//! - **Variable patterns** (`x`) always match and bind the subject.
//! - **Constant patterns** (`0`, `True`) match by structural equality.
//! - **Constructor patterns** (`Cons h t`) match an n-ary constructor
//!   application positionally, each sub-pattern against one argument.
//!
//! ```text
//! match xs with
//!   | Nil       -> 0
//!   | Cons h t  -> h
//! ```

use super::Literal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Var(String),
    Const(Literal),
    Constructor(String, Vec<Pattern>),
}

impl Pattern {
    pub fn var(name: impl Into<String>) -> Self {
        Pattern::Var(name.into())
    }

    pub fn int(value: i64) -> Self {
        Pattern::Const(Literal::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        Pattern::Const(Literal::Bool(value))
    }

    pub fn ctor(name: impl Into<String>, subpatterns: Vec<Pattern>) -> Self {
        Pattern::Constructor(name.into(), subpatterns)
    }

    /// Variables bound by this pattern, left to right.
    pub fn vars(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_vars(&mut vars);
        vars
    }

    fn collect_vars(&self, vars: &mut Vec<String>) {
        match self {
            Pattern::Var(name) => vars.push(name.clone()),
            Pattern::Const(_) => {}
            Pattern::Constructor(_, subpatterns) => {
                for sub in subpatterns {
                    sub.collect_vars(vars);
                }
            }
        }
    }

    /// A top-level variable pattern matches every value.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Pattern::Var(_))
    }

    /// Rename bound variable `from` to `to` throughout the pattern.
    pub fn rename(&self, from: &str, to: &str) -> Pattern {
        match self {
            Pattern::Var(name) if name == from => Pattern::Var(to.to_string()),
            Pattern::Var(_) | Pattern::Const(_) => self.clone(),
            Pattern::Constructor(name, subpatterns) => Pattern::Constructor(
                name.clone(),
                subpatterns.iter().map(|sub| sub.rename(from, to)).collect(),
            ),
        }
    }
}
