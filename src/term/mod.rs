//! # Term Model
//!
//! This module defines the **term tree** shared by every engine in the crate:
//! the type checker, the substitution evaluator and the combinator translator
//! all consume the same [`Term`] values.
//!
//! ## Pipeline Position
//!
//! ```text
//!                  ┌→ [Type Checker]  → Type
//! Parser → [TERM] ─┼→ [Evaluator]     → Term (normal form)
//!                  └→ [Translator]    → CTerm → [Reducer] → CTerm
//! ```
//!
//! The parser itself lives outside this crate; anything that can build a
//! [`Term`] can drive the engines.
//!
//! ## Term Forms
//!
//! ```text
//! x                        Var
//! 42, True                 Lit
//! f a                      App
//! \x. body                 Abs
//! a + b, a <= b, a and b   BinOp
//! not a                    UnOp
//! if c then t else e       If
//! rec f. body              Rec
//! Cons                     Constructor
//! match s with | p -> e    Match
//! ```
//!
//! ## Invariants
//!
//! Terms are immutable once built. Engines that rewrite a term build a new
//! tree and own it outright. There are no back-references: recursion is
//! expressed through the named binder in [`Term::Rec`] and unfolded on demand,
//! never by a cyclic structure.

pub mod pattern;

use std::collections::HashSet;

pub use pattern::Pattern;

/// Literal constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Bool(bool),
}

/// Binary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Eq,
    LtEq,
}

impl BinOpKind {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::And => "and",
            BinOpKind::Or => "or",
            BinOpKind::Eq => "=",
            BinOpKind::LtEq => "<=",
        }
    }

    /// Comparisons relate two operands of one shared type.
    pub fn is_comparison(self) -> bool {
        matches!(self, BinOpKind::Eq | BinOpKind::LtEq)
    }
}

/// Unary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOpKind {
    Not,
}

impl UnaryOpKind {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOpKind::Not => "not",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Var(String),
    Lit(Literal),
    App(Box<Term>, Box<Term>),
    Abs(String, Box<Term>),
    BinOp(BinOpKind, Box<Term>, Box<Term>),
    UnOp(UnaryOpKind, Box<Term>),
    If(Box<Term>, Box<Term>, Box<Term>),
    Rec(String, Box<Term>),
    Constructor(String),
    Match(Box<Term>, Vec<(Pattern, Term)>),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    pub fn int(value: i64) -> Self {
        Term::Lit(Literal::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        Term::Lit(Literal::Bool(value))
    }

    pub fn app(func: Term, arg: Term) -> Self {
        Term::App(Box::new(func), Box::new(arg))
    }

    /// Left-nested application `func a1 a2 ... an`.
    pub fn apply(func: Term, args: impl IntoIterator<Item = Term>) -> Self {
        args.into_iter().fold(func, Term::app)
    }

    pub fn abs(param: impl Into<String>, body: Term) -> Self {
        Term::Abs(param.into(), Box::new(body))
    }

    pub fn binop(op: BinOpKind, left: Term, right: Term) -> Self {
        Term::BinOp(op, Box::new(left), Box::new(right))
    }

    pub fn not(operand: Term) -> Self {
        Term::UnOp(UnaryOpKind::Not, Box::new(operand))
    }

    pub fn cond(condition: Term, then_term: Term, else_term: Term) -> Self {
        Term::If(Box::new(condition), Box::new(then_term), Box::new(else_term))
    }

    pub fn rec(name: impl Into<String>, body: Term) -> Self {
        Term::Rec(name.into(), Box::new(body))
    }

    pub fn ctor(name: impl Into<String>) -> Self {
        Term::Constructor(name.into())
    }

    pub fn matching(subject: Term, cases: Vec<(Pattern, Term)>) -> Self {
        Term::Match(Box::new(subject), cases)
    }

    pub fn as_literal(&self) -> Option<Literal> {
        match self {
            Term::Lit(lit) => Some(*lit),
            _ => None,
        }
    }

    /// Split an application spine into its head and arguments.
    pub fn spine(&self) -> (&Term, Vec<&Term>) {
        let mut head = self;
        let mut args = Vec::new();
        while let Term::App(func, arg) = head {
            args.push(arg.as_ref());
            head = func.as_ref();
        }
        args.reverse();
        (head, args)
    }

    /// Fully evaluated data: a literal, or a constructor applied to data.
    pub fn is_data(&self) -> bool {
        match self.spine() {
            (Term::Lit(_), args) => args.is_empty(),
            (Term::Constructor(_), args) => args.iter().all(|arg| arg.is_data()),
            _ => false,
        }
    }

    /// Names occurring free in this term.
    pub fn free_vars(&self) -> HashSet<String> {
        let mut free = HashSet::new();
        collect_free_vars(self, &mut Vec::new(), &mut free);
        free
    }

    /// Every name occurring in this term, bound or free.
    pub fn all_names(&self) -> HashSet<String> {
        let mut names = HashSet::new();
        collect_names(self, &mut names);
        names
    }
}

fn collect_free_vars(term: &Term, bound: &mut Vec<String>, free: &mut HashSet<String>) {
    match term {
        Term::Var(name) => {
            if !bound.contains(name) {
                free.insert(name.clone());
            }
        }
        Term::Lit(_) | Term::Constructor(_) => {}
        Term::App(func, arg) => {
            collect_free_vars(func, bound, free);
            collect_free_vars(arg, bound, free);
        }
        Term::Abs(param, body) | Term::Rec(param, body) => {
            bound.push(param.clone());
            collect_free_vars(body, bound, free);
            bound.pop();
        }
        Term::BinOp(_, left, right) => {
            collect_free_vars(left, bound, free);
            collect_free_vars(right, bound, free);
        }
        Term::UnOp(_, operand) => collect_free_vars(operand, bound, free),
        Term::If(condition, then_term, else_term) => {
            collect_free_vars(condition, bound, free);
            collect_free_vars(then_term, bound, free);
            collect_free_vars(else_term, bound, free);
        }
        Term::Match(subject, cases) => {
            collect_free_vars(subject, bound, free);
            for (pattern, body) in cases {
                let vars = pattern.vars();
                let depth = bound.len();
                bound.extend(vars);
                collect_free_vars(body, bound, free);
                bound.truncate(depth);
            }
        }
    }
}

fn collect_names(term: &Term, names: &mut HashSet<String>) {
    match term {
        Term::Var(name) => {
            names.insert(name.clone());
        }
        Term::Lit(_) | Term::Constructor(_) => {}
        Term::App(left, right) | Term::BinOp(_, left, right) => {
            collect_names(left, names);
            collect_names(right, names);
        }
        Term::Abs(param, body) | Term::Rec(param, body) => {
            names.insert(param.clone());
            collect_names(body, names);
        }
        Term::UnOp(_, operand) => collect_names(operand, names),
        Term::If(condition, then_term, else_term) => {
            collect_names(condition, names);
            collect_names(then_term, names);
            collect_names(else_term, names);
        }
        Term::Match(subject, cases) => {
            collect_names(subject, names);
            for (pattern, body) in cases {
                names.extend(pattern.vars());
                collect_names(body, names);
            }
        }
    }
}
