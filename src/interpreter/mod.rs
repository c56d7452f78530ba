//! # Substitution Evaluator
//!
//! Reduces a [`Term`] towards normal form by substitution: applying an
//! abstraction substitutes the (already evaluated) argument into its body and
//! evaluates the result. Free variables resolve through a [`Scope`].
//!
//! ```text
//! (\x. x + 1) 5      →  5 + 1          →  6
//! rec f. \n. body    →  \n. body[f := rec f. \n. body]
//! match Cons 1 Nil with | Cons h t -> h  →  1
//! ```
//!
//! Operators reduce only when their evaluated operands are literals of the
//! right kind; anything else is returned rebuilt from its evaluated parts.

mod error;
mod eval;
mod scope;
mod subst;

pub use error::EvalError;
pub use eval::{match_pattern, Evaluator};
pub use scope::Scope;
pub use subst::{substitute, substitute_many};

use log::debug;

use crate::term::Term;

/// Evaluate `term`, resolving its free variables in `scope`.
pub fn evaluate(term: &Term, scope: &Scope) -> Result<Term, EvalError> {
    debug!("evaluate {}", term);
    let result = Evaluator::new().evaluate(term, scope)?;
    debug!("evaluated to {}", result);
    Ok(result)
}
