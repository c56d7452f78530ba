//! # Kestrel - Typing, Evaluation and Combinator Translation for a Small Functional Calculus
//!
//! Kestrel is the back half of a functional-language front end. It takes an
//! already parsed term tree and offers three independent engines over one
//! shared data model:
//!
//! 1. **Type Checker** (`types`) - Hindley-Milner inference with occurs check,
//!    algebraic data types and match exhaustiveness
//! 2. **Evaluator** (`interpreter`) - Capture-avoiding substitution and
//!    beta reduction towards normal form
//! 3. **Combinator Translator** (`combinator`) - Bracket abstraction into the
//!    S K I Y B C basis, plus a graph reducer for the result
//!
//! ## Pipeline Flow
//!
//! ```text
//! Term (term::Term)
//!     ├→ [Type Checker]  → types::Type
//!     ├→ [Evaluator]     → term::Term (normal form)
//!     └→ [Translator]    → combinator::CTerm
//!                              ↓
//!                          [Reducer] → combinator::CTerm (normal form)
//! ```
//!
//! Parsing is not part of this crate. Anything that can build a [`Term`]
//! (a parser, a test, another tool) can drive the engines.
//!
//! ## Key Design Decisions
//!
//! ### Closed Sum Types
//! Terms, types, patterns, intermediate forms and combinator terms are each a
//! single `enum`. Every engine dispatches with an exhaustive `match`, so a new
//! node kind cannot be added without every engine handling it.
//!
//! ### Explicit Sessions
//! There is no global state. Each `infer` call builds one `Checker` that owns
//! its substitution environment and its fresh-id [`fresh::Supply`]; each
//! `evaluate` call owns its own supply for renaming binders. Ids are
//! therefore deterministic per call.
//!
//! ### Persistent Maps
//! The substitution environment and the naming environments are
//! [`im::HashMap`]s. Extending an environment for a binder, or snapshotting
//! the substitution before a unification attempt, shares structure instead of
//! copying.
//!
//! ### Recursion Without Cycles
//! `rec f. e` is a binder. The evaluator unfolds it one step at a time when
//! it is reached; the translator turns it into `Y (T[\f. e])`. No cyclic
//! structure is ever built.
//!
//! ## Module Structure
//!
//! - [`term`] - Term and pattern definitions
//! - [`types`] - Types, unification and inference
//! - [`interpreter`] - Substitution evaluator
//! - [`combinator`] - Combinator translation and reduction
//! - [`fresh`] - Fresh id and name supply
//! - [`fmt`] - Rendering for diagnostics
//!
//! ## Example
//!
//! ```text
//! rec fact. \n. if n = 0 then 1 else n * fact (n - 1)
//! ```
//!
//! infers to `Int -> Int`. Applied to `4` it evaluates to `24`, both through
//! [`evaluate`] and through [`reduce`] of its [`translate`]d form.
//!
//! ## Getting Started
//!
//! 1. Build a [`Term`] (and, for data types, a [`TypeEnv`] with their declarations)
//! 2. Type check with [`infer()`]
//! 3. Run with [`evaluate()`], or with [`translate()`] then [`reduce()`]
//!
//! Diagnostics go through the [`log`] facade; install any logger to see them.

pub mod combinator;
pub mod fmt;
pub mod fresh;
pub mod interpreter;
pub mod term;
pub mod types;

pub use combinator::{reduce, translate, translate_with, CTerm, TranslateOptions};
pub use interpreter::{evaluate, Scope};
pub use term::{BinOpKind, Literal, Pattern, Term, UnaryOpKind};
pub use types::{infer, Type, TypeEnv};
