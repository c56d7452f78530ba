use thiserror::Error;

use super::CTerm;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// A non-applicative node survived abstraction elimination. Well-formed
    /// terms never produce this.
    #[error("internal error: {kind} survived abstraction elimination")]
    Residual { kind: &'static str },
}

/// Runtime faults of combinator reduction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReduceError {
    #[error("division by zero in `{expr}`")]
    DivisionByZero { expr: CTerm },

    #[error("integer overflow in `{expr}`")]
    Overflow { expr: CTerm },

    #[error("no case matches `{subject}`")]
    NoMatchingCase { subject: CTerm },
}
