//! The intermediate form between terms and combinator terms.
//!
//! [`to_intermediate`] mirrors a [`Term`] node for node; it only swaps
//! literals and constructors for [`Constant`] leaves. Abstraction
//! elimination then rewrites this tree until only [`Intermediate::Var`],
//! [`Intermediate::Const`], [`Intermediate::Comb`] and
//! [`Intermediate::App`] remain.

use std::collections::HashSet;

use super::{Comb, Constant};
use crate::term::{BinOpKind, Pattern, Term, UnaryOpKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intermediate {
    Var(String),
    Const(Constant),
    Comb(Comb),
    App(Box<Intermediate>, Box<Intermediate>),
    Abs(String, Box<Intermediate>),
    BinOp(BinOpKind, Box<Intermediate>, Box<Intermediate>),
    UnOp(UnaryOpKind, Box<Intermediate>),
    If(Box<Intermediate>, Box<Intermediate>, Box<Intermediate>),
    Rec(String, Box<Intermediate>),
    Match(Box<Intermediate>, Vec<(Pattern, Intermediate)>),
}

pub fn to_intermediate(term: &Term) -> Intermediate {
    match term {
        Term::Var(name) => Intermediate::Var(name.clone()),
        Term::Lit(lit) => Intermediate::Const(Constant::from(*lit)),
        Term::Constructor(name) => Intermediate::Const(Constant::Ctor(name.clone())),
        Term::App(func, arg) => Intermediate::app(to_intermediate(func), to_intermediate(arg)),
        Term::Abs(param, body) => {
            Intermediate::Abs(param.clone(), Box::new(to_intermediate(body)))
        }
        Term::BinOp(op, left, right) => Intermediate::BinOp(
            *op,
            Box::new(to_intermediate(left)),
            Box::new(to_intermediate(right)),
        ),
        Term::UnOp(op, operand) => Intermediate::UnOp(*op, Box::new(to_intermediate(operand))),
        Term::If(condition, then_term, else_term) => Intermediate::If(
            Box::new(to_intermediate(condition)),
            Box::new(to_intermediate(then_term)),
            Box::new(to_intermediate(else_term)),
        ),
        Term::Rec(name, body) => Intermediate::Rec(name.clone(), Box::new(to_intermediate(body))),
        Term::Match(subject, cases) => Intermediate::Match(
            Box::new(to_intermediate(subject)),
            cases
                .iter()
                .map(|(pattern, body)| (pattern.clone(), to_intermediate(body)))
                .collect(),
        ),
    }
}

impl Intermediate {
    pub fn app(func: Intermediate, arg: Intermediate) -> Self {
        Intermediate::App(Box::new(func), Box::new(arg))
    }

    pub fn comb(comb: Comb) -> Self {
        Intermediate::Comb(comb)
    }

    /// True when only variables, constants and combinators joined by
    /// application remain.
    pub fn is_applicative(&self) -> bool {
        match self {
            Intermediate::Var(_) | Intermediate::Const(_) | Intermediate::Comb(_) => true,
            Intermediate::App(func, arg) => func.is_applicative() && arg.is_applicative(),
            _ => false,
        }
    }

    /// Short name of the node kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Intermediate::Var(_) => "variable",
            Intermediate::Const(_) => "constant",
            Intermediate::Comb(_) => "combinator",
            Intermediate::App(..) => "application",
            Intermediate::Abs(..) => "abstraction",
            Intermediate::BinOp(..) => "binary operator",
            Intermediate::UnOp(..) => "unary operator",
            Intermediate::If(..) => "conditional",
            Intermediate::Rec(..) => "recursive binding",
            Intermediate::Match(..) => "match",
        }
    }

    pub fn free_vars(&self) -> HashSet<String> {
        let mut free = HashSet::new();
        collect_free_vars(self, &mut Vec::new(), &mut free);
        free
    }

    pub fn is_free(&self, name: &str) -> bool {
        self.free_vars().contains(name)
    }
}

fn collect_free_vars(ir: &Intermediate, bound: &mut Vec<String>, free: &mut HashSet<String>) {
    match ir {
        Intermediate::Var(name) => {
            if !bound.contains(name) {
                free.insert(name.clone());
            }
        }
        Intermediate::Const(_) | Intermediate::Comb(_) => {}
        Intermediate::App(left, right) | Intermediate::BinOp(_, left, right) => {
            collect_free_vars(left, bound, free);
            collect_free_vars(right, bound, free);
        }
        Intermediate::Abs(param, body) | Intermediate::Rec(param, body) => {
            bound.push(param.clone());
            collect_free_vars(body, bound, free);
            bound.pop();
        }
        Intermediate::UnOp(_, operand) => collect_free_vars(operand, bound, free),
        Intermediate::If(condition, then_ir, else_ir) => {
            collect_free_vars(condition, bound, free);
            collect_free_vars(then_ir, bound, free);
            collect_free_vars(else_ir, bound, free);
        }
        Intermediate::Match(subject, cases) => {
            collect_free_vars(subject, bound, free);
            for (pattern, body) in cases {
                let depth = bound.len();
                bound.extend(pattern.vars());
                collect_free_vars(body, bound, free);
                bound.truncate(depth);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_is_preserved() {
        let term = Term::abs(
            "x",
            Term::binop(BinOpKind::Add, Term::var("x"), Term::int(1)),
        );
        let expected = Intermediate::Abs(
            "x".to_string(),
            Box::new(Intermediate::BinOp(
                BinOpKind::Add,
                Box::new(Intermediate::Var("x".to_string())),
                Box::new(Intermediate::Const(Constant::Int(1))),
            )),
        );
        assert_eq!(to_intermediate(&term), expected);
    }

    #[test]
    fn test_constructors_become_constants() {
        let ir = to_intermediate(&Term::app(Term::ctor("Just"), Term::bool(true)));
        assert_eq!(
            ir,
            Intermediate::app(
                Intermediate::Const(Constant::Ctor("Just".to_string())),
                Intermediate::Const(Constant::Bool(true)),
            )
        );
        assert!(ir.is_applicative());
    }

    #[test]
    fn test_free_vars_respect_binders() {
        let term = Term::abs(
            "x",
            Term::matching(
                Term::var("x"),
                vec![(Pattern::var("y"), Term::app(Term::var("y"), Term::var("z")))],
            ),
        );
        let ir = to_intermediate(&term);
        assert!(ir.is_free("z"));
        assert!(!ir.is_free("x"));
        assert!(!ir.is_free("y"));
        assert!(!ir.is_applicative());
    }
}
