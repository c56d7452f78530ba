//! # Combinator Backend
//!
//! Translates terms into abstraction-free combinator terms and reduces them
//! by graph rewriting.
//!
//! ```text
//! Term ──to_intermediate──→ Intermediate ──eliminate_abstractions──→ CTerm ──reduce──→ CTerm
//! ```
//!
//! ## Basis
//!
//! ```text
//! I x      → x
//! K x y    → x
//! S x y z  → x z (y z)
//! C x y z  → x z y
//! B x y z  → x (y z)
//! Y f x    → f (Y f) x
//! ```
//!
//! Everything the basis cannot express directly (literals, operators,
//! constructors, conditionals and case analysis) is carried by a
//! [`Constant`] leaf that the reducer interprets once it is applied to
//! enough arguments.
//!
//! ## Example
//!
//! ```text
//! \x. f (g x)   ⇒  (B f (B g I))                 optimized
//!               ⇒  (S (K f) (S (K g) I))         unoptimized
//! ```

pub mod error;
pub mod intermediate;
pub mod reduce;
pub mod translate;

use std::collections::HashSet;
use std::rc::Rc;

pub use error::{ReduceError, TranslateError};
pub use intermediate::{to_intermediate, Intermediate};
pub use reduce::{reduce, Reducer};
pub use translate::{translate, translate_with, TranslateOptions, Translator};

use crate::term::{BinOpKind, Literal, Pattern, UnaryOpKind};

/// The fixed combinator basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comb {
    S,
    K,
    I,
    Y,
    B,
    C,
}

impl Comb {
    pub fn name(self) -> &'static str {
        match self {
            Comb::S => "S",
            Comb::K => "K",
            Comb::I => "I",
            Comb::Y => "Y",
            Comb::B => "B",
            Comb::C => "C",
        }
    }
}

/// Primitive operators interpreted by the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Eq,
    LtEq,
    Not,
    /// `if c t e`: forces only `c`, then the selected branch.
    If,
}

impl Primitive {
    /// Number of arguments needed before the primitive fires.
    pub fn arity(self) -> usize {
        match self {
            Primitive::Not => 1,
            Primitive::If => 3,
            _ => 2,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Primitive::Add => "+",
            Primitive::Sub => "-",
            Primitive::Mul => "*",
            Primitive::Div => "/",
            Primitive::And => "and",
            Primitive::Or => "or",
            Primitive::Eq => "=",
            Primitive::LtEq => "<=",
            Primitive::Not => "not",
            Primitive::If => "if",
        }
    }
}

impl From<BinOpKind> for Primitive {
    fn from(op: BinOpKind) -> Self {
        match op {
            BinOpKind::Add => Primitive::Add,
            BinOpKind::Sub => Primitive::Sub,
            BinOpKind::Mul => Primitive::Mul,
            BinOpKind::Div => Primitive::Div,
            BinOpKind::And => Primitive::And,
            BinOpKind::Or => Primitive::Or,
            BinOpKind::Eq => Primitive::Eq,
            BinOpKind::LtEq => Primitive::LtEq,
        }
    }
}

impl From<UnaryOpKind> for Primitive {
    fn from(op: UnaryOpKind) -> Self {
        match op {
            UnaryOpKind::Not => Primitive::Not,
        }
    }
}

/// A pattern with its variable names erased. Bound sub-terms are passed to
/// the case function positionally, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    Bind,
    Lit(Literal),
    Ctor(String, Vec<Shape>),
}

impl Shape {
    pub fn binds(&self) -> usize {
        match self {
            Shape::Bind => 1,
            Shape::Lit(_) => 0,
            Shape::Ctor(_, subs) => subs.iter().map(Shape::binds).sum(),
        }
    }
}

impl From<&Pattern> for Shape {
    fn from(pattern: &Pattern) -> Self {
        match pattern {
            Pattern::Var(_) => Shape::Bind,
            Pattern::Const(lit) => Shape::Lit(*lit),
            Pattern::Constructor(name, subpatterns) => {
                Shape::Ctor(name.clone(), subpatterns.iter().map(Shape::from).collect())
            }
        }
    }
}

/// Leaves that are not combinators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Int(i64),
    Bool(bool),
    Prim(Primitive),
    Ctor(String),
    /// `case subject f1 .. fn`: selects `fi` for the first shape matching
    /// `subject`.
    Case(Rc<[Shape]>),
}

impl From<Literal> for Constant {
    fn from(lit: Literal) -> Self {
        match lit {
            Literal::Int(value) => Constant::Int(value),
            Literal::Bool(value) => Constant::Bool(value),
        }
    }
}

impl Constant {
    pub fn as_literal(&self) -> Option<Literal> {
        match self {
            Constant::Int(value) => Some(Literal::Int(*value)),
            Constant::Bool(value) => Some(Literal::Bool(*value)),
            _ => None,
        }
    }
}

/// An abstraction-free term: variables, constants and combinators joined by
/// application. Sub-terms are reference counted so rewrites that duplicate an
/// argument (`S`) share it instead of copying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CTerm {
    Var(String),
    Const(Constant),
    App(Rc<CTerm>, Rc<CTerm>),
    Comb(Comb),
}

impl CTerm {
    pub fn var(name: impl Into<String>) -> Self {
        CTerm::Var(name.into())
    }

    pub fn int(value: i64) -> Self {
        CTerm::Const(Constant::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        CTerm::Const(Constant::Bool(value))
    }

    pub fn prim(prim: Primitive) -> Self {
        CTerm::Const(Constant::Prim(prim))
    }

    pub fn ctor(name: impl Into<String>) -> Self {
        CTerm::Const(Constant::Ctor(name.into()))
    }

    pub fn app(func: CTerm, arg: CTerm) -> Self {
        CTerm::App(Rc::new(func), Rc::new(arg))
    }

    /// Apply `head` to each argument in turn.
    pub fn apply(head: CTerm, args: impl IntoIterator<Item = CTerm>) -> Self {
        args.into_iter().fold(head, CTerm::app)
    }

    /// Rebuild a spine from a shared head and shared arguments.
    pub fn rebuild(head: Rc<CTerm>, args: impl IntoIterator<Item = Rc<CTerm>>) -> Rc<CTerm> {
        args.into_iter()
            .fold(head, |func, arg| Rc::new(CTerm::App(func, arg)))
    }

    pub fn as_literal(&self) -> Option<Literal> {
        match self {
            CTerm::Const(constant) => constant.as_literal(),
            _ => None,
        }
    }

    /// Split an application spine into its head and arguments.
    pub fn spine(&self) -> (&CTerm, Vec<&Rc<CTerm>>) {
        let mut head = self;
        let mut args = Vec::new();
        while let CTerm::App(func, arg) = head {
            args.push(arg);
            head = func.as_ref();
        }
        args.reverse();
        (head, args)
    }

    /// Number of leaves.
    pub fn size(&self) -> usize {
        match self {
            CTerm::App(func, arg) => func.size() + arg.size(),
            _ => 1,
        }
    }

    /// A literal, or a constructor applied to data.
    pub fn is_data(&self) -> bool {
        match self.spine() {
            (CTerm::Const(Constant::Int(_) | Constant::Bool(_)), args) => args.is_empty(),
            (CTerm::Const(Constant::Ctor(_)), args) => args.iter().all(|arg| arg.is_data()),
            _ => false,
        }
    }

    pub fn free_vars(&self) -> HashSet<String> {
        let mut free = HashSet::new();
        self.collect_vars(&mut free);
        free
    }

    fn collect_vars(&self, free: &mut HashSet<String>) {
        match self {
            CTerm::Var(name) => {
                free.insert(name.clone());
            }
            CTerm::App(func, arg) => {
                func.collect_vars(free);
                arg.collect_vars(free);
            }
            CTerm::Const(_) | CTerm::Comb(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spine() {
        let term = CTerm::apply(CTerm::Comb(Comb::S), [CTerm::var("f"), CTerm::var("g")]);
        let (head, args) = term.spine();
        assert_eq!(head, &CTerm::Comb(Comb::S));
        assert_eq!(args.len(), 2);
        assert_eq!(*args[1].as_ref(), CTerm::var("g"));
    }

    #[test]
    fn test_size_counts_leaves() {
        assert_eq!(CTerm::Comb(Comb::I).size(), 1);
        let term = CTerm::apply(CTerm::Comb(Comb::B), [CTerm::var("f"), CTerm::var("g")]);
        assert_eq!(term.size(), 3);
    }

    #[test]
    fn test_is_data() {
        let list = CTerm::apply(CTerm::ctor("Cons"), [CTerm::int(1), CTerm::ctor("Nil")]);
        assert!(list.is_data());
        assert!(CTerm::bool(true).is_data());
        assert!(!CTerm::app(CTerm::ctor("Cons"), CTerm::var("x")).is_data());
        assert!(!CTerm::app(CTerm::int(1), CTerm::int(2)).is_data());
    }

    #[test]
    fn test_shape_binds() {
        let pattern = Pattern::ctor(
            "Cons",
            vec![Pattern::var("h"), Pattern::ctor("Cons", vec![Pattern::int(0), Pattern::var("t")])],
        );
        assert_eq!(Shape::from(&pattern).binds(), 2);
    }

    #[test]
    fn test_primitive_arity() {
        assert_eq!(Primitive::from(BinOpKind::LtEq).arity(), 2);
        assert_eq!(Primitive::Not.arity(), 1);
        assert_eq!(Primitive::If.arity(), 3);
    }
}
