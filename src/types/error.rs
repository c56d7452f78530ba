//! # Type Error Definitions
//!
//! Every failure of the type checker surfaces as a [`TypeError`]. None of them
//! is recovered from: the first error aborts the `infer` call.
//!
//! Errors carry the offending subterm (or pattern) together with the
//! expected and actual types, already resolved against the session's
//! substitution, so the rendered message is self-contained:
//!
//! ```text
//! left operand `5` of `5 + True` is Int, but right operand `True` is Bool
//! condition `1` must be Bool, found Int
//! non-exhaustive match on list: missing Cons
//! ```
//!
//! ## Related Modules
//!
//! - [`crate::types::infer`] - Type inference that produces these errors
//! - [`crate::types::unify`] - Unification errors converted to `TypeError`
//! - [`crate::types::exhaustive`] - Exhaustiveness failures

use std::fmt;

use thiserror::Error;

use super::ty::{Type, TypeVar};
use super::unify::UnifyError;
use crate::term::{Pattern, Term};

/// Which operand of an operator expression is at fault.
///
/// A right operand is never at fault on its own: it is checked against the
/// left one, see [`TypeError::OperandsDisagree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Left,
    /// The operand of a unary operator.
    Only,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Left => write!(f, "left operand"),
            Operand::Only => write!(f, "operand"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("unbound variable: {name}")]
    UnboundVariable { name: String },

    #[error("unknown constructor: {name}")]
    UnknownConstructor { name: String },

    #[error("{side} `{operand}` of `{expr}`: expected {expected}, found {found}")]
    OperandMismatch {
        side: Operand,
        operand: Term,
        expr: Term,
        expected: Type,
        found: Type,
    },

    /// The right operand of a binary operator does not have the type the
    /// left operand fixed.
    #[error("left operand `{left}` of `{expr}` is {left_type}, but right operand `{right}` is {right_type}")]
    OperandsDisagree {
        left: Term,
        right: Term,
        expr: Term,
        left_type: Type,
        right_type: Type,
    },

    #[error("`{func}` has type {found} and cannot be applied to `{arg}`")]
    NotAFunction { func: Term, arg: Term, found: Type },

    #[error("argument `{arg}` of `{expr}`: expected {expected}, found {found}")]
    ArgumentMismatch {
        arg: Term,
        expr: Term,
        expected: Type,
        found: Type,
    },

    #[error("condition `{condition}` must be {}, found {found}", Type::bool())]
    NonBooleanCondition { condition: Term, found: Type },

    #[error("branches of `{expr}` disagree: then-branch is {then_type}, else-branch is {else_type}")]
    BranchMismatch {
        expr: Term,
        then_type: Type,
        else_type: Type,
    },

    #[error("recursive binding `{name}` is used as {expected} but its body is {found}")]
    RecursionMismatch {
        name: String,
        expected: Type,
        found: Type,
    },

    #[error("pattern `{pattern}` is {found} but must match {expected}")]
    PatternMismatch {
        pattern: Pattern,
        expected: Type,
        found: Type,
    },

    #[error("case `{pattern}` yields `{body}` of type {found}, earlier cases yield {expected}")]
    CaseMismatch {
        pattern: Pattern,
        body: Term,
        expected: Type,
        found: Type,
    },

    #[error("constructor {name} takes {expected} argument(s) but the pattern gives {found}")]
    ConstructorArity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("variable `{name}` is bound more than once in pattern `{pattern}`")]
    DuplicatePatternVariable { name: String, pattern: Pattern },

    #[error("match on `{subject}` has no cases")]
    EmptyMatch { subject: Term },

    #[error("non-exhaustive match on {type_name}: missing {}", .missing.join(", "))]
    NonExhaustive {
        type_name: String,
        missing: Vec<String>,
    },

    #[error("cannot construct infinite type {} = {ty} in `{term}`", Type::Var(.var.clone()))]
    InfiniteType { term: Term, var: TypeVar, ty: Type },

    #[error("type mismatch in `{term}`: expected {expected}, found {found}")]
    Mismatch {
        term: Term,
        expected: Type,
        found: Type,
    },
}

impl TypeError {
    /// Convert a unification error to a type error about `term`.
    pub fn from_unify_error(err: UnifyError, term: &Term) -> Self {
        match err {
            UnifyError::Mismatch { expected, found } => TypeError::Mismatch {
                term: term.clone(),
                expected,
                found,
            },
            UnifyError::Occurs { var, ty } => TypeError::InfiniteType {
                term: term.clone(),
                var,
                ty,
            },
        }
    }
}
