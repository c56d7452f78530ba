use thiserror::Error;

use crate::term::Term;

/// Runtime faults of the substitution evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unbound variable: {name}")]
    UnboundVariable { name: String },

    #[error("division by zero in `{expr}`")]
    DivisionByZero { expr: Term },

    #[error("integer overflow in `{expr}`")]
    Overflow { expr: Term },

    #[error("no case matches `{subject}`")]
    NoMatchingCase { subject: Term },
}
