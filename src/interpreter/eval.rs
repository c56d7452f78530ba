use std::collections::HashMap;

use log::trace;

use super::error::EvalError;
use super::scope::Scope;
use super::subst::{substitute, substitute_many};
use crate::fresh::Supply;
use crate::term::{BinOpKind, Literal, Pattern, Term, UnaryOpKind};

/// Substitution evaluator.
///
/// Subterms are evaluated first, then the current node is reduced if a rule
/// applies; otherwise the node is rebuilt from its evaluated parts and
/// returned as is. Abstraction bodies are never evaluated before the
/// abstraction is applied.
#[derive(Debug, Default)]
pub struct Evaluator {
    supply: Supply,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, term: &Term, scope: &Scope) -> Result<Term, EvalError> {
        match term {
            Term::Var(name) => match scope.resolve(name) {
                Some(bound) => self.evaluate(bound, scope),
                None => Err(EvalError::UnboundVariable { name: name.clone() }),
            },

            Term::Lit(_) | Term::Abs(..) | Term::Constructor(_) => Ok(term.clone()),

            Term::App(func, arg) => {
                let func = self.evaluate(func, scope)?;
                let arg = self.evaluate(arg, scope)?;
                match func {
                    Term::Abs(param, body) => {
                        trace!("beta {} := {}", param, arg);
                        let body = substitute(&body, &param, &arg, &mut self.supply);
                        self.evaluate(&body, scope)
                    }
                    func => Ok(Term::app(func, arg)),
                }
            }

            Term::Rec(name, body) => {
                trace!("unfold rec {}", name);
                let unfolded = substitute(body, name, term, &mut self.supply);
                self.evaluate(&unfolded, scope)
            }

            Term::BinOp(op, left, right) => {
                let left = self.evaluate(left, scope)?;
                let right = self.evaluate(right, scope)?;
                let expr = Term::binop(*op, left, right);
                match apply_binop(&expr)? {
                    Some(result) => Ok(result),
                    None => Ok(expr),
                }
            }

            Term::UnOp(UnaryOpKind::Not, operand) => match self.evaluate(operand, scope)? {
                Term::Lit(Literal::Bool(value)) => Ok(Term::bool(!value)),
                operand => Ok(Term::not(operand)),
            },

            Term::If(condition, then_term, else_term) => match self.evaluate(condition, scope)? {
                Term::Lit(Literal::Bool(true)) => self.evaluate(then_term, scope),
                Term::Lit(Literal::Bool(false)) => self.evaluate(else_term, scope),
                condition => Ok(Term::cond(
                    condition,
                    (**then_term).clone(),
                    (**else_term).clone(),
                )),
            },

            Term::Match(subject, cases) => {
                let subject = self.evaluate(subject, scope)?;
                for (pattern, body) in cases {
                    let mut bindings = HashMap::new();
                    if match_pattern(pattern, &subject, &mut bindings) {
                        trace!("match {} with {}", subject, pattern);
                        let body = substitute_many(body, &bindings, &mut self.supply);
                        return self.evaluate(&body, scope);
                    }
                }
                Err(EvalError::NoMatchingCase { subject })
            }
        }
    }
}

/// Reduce a binary operator node whose operands are already evaluated.
///
/// Returns `None` when the operands are not literals of the right kind, in
/// which case the node stays as it is.
fn apply_binop(expr: &Term) -> Result<Option<Term>, EvalError> {
    let Term::BinOp(op, left, right) = expr else {
        return Ok(None);
    };

    let result = match (*op, left.as_literal(), right.as_literal()) {
        (BinOpKind::Eq, _, _) if left.is_data() && right.is_data() => Term::bool(left == right),

        (BinOpKind::LtEq, Some(Literal::Int(a)), Some(Literal::Int(b))) => Term::bool(a <= b),
        (BinOpKind::LtEq, Some(Literal::Bool(a)), Some(Literal::Bool(b))) => Term::bool(a <= b),

        (BinOpKind::And, Some(Literal::Bool(a)), Some(Literal::Bool(b))) => Term::bool(a && b),
        (BinOpKind::Or, Some(Literal::Bool(a)), Some(Literal::Bool(b))) => Term::bool(a || b),

        (BinOpKind::Div, Some(Literal::Int(_)), Some(Literal::Int(0))) => {
            return Err(EvalError::DivisionByZero { expr: expr.clone() })
        }

        (
            BinOpKind::Add | BinOpKind::Sub | BinOpKind::Mul | BinOpKind::Div,
            Some(Literal::Int(a)),
            Some(Literal::Int(b)),
        ) => {
            let value = match op {
                BinOpKind::Add => a.checked_add(b),
                BinOpKind::Sub => a.checked_sub(b),
                BinOpKind::Mul => a.checked_mul(b),
                _ => a.checked_div(b),
            };
            match value {
                Some(value) => Term::int(value),
                None => return Err(EvalError::Overflow { expr: expr.clone() }),
            }
        }

        _ => return Ok(None),
    };

    Ok(Some(result))
}

/// Match `value` against `pattern`, recording variable bindings.
pub fn match_pattern(pattern: &Pattern, value: &Term, bindings: &mut HashMap<String, Term>) -> bool {
    match pattern {
        Pattern::Var(name) => {
            bindings.insert(name.clone(), value.clone());
            true
        }
        Pattern::Const(lit) => value.as_literal() == Some(*lit),
        Pattern::Constructor(name, subpatterns) => match value.spine() {
            (Term::Constructor(head), args) if head == name && args.len() == subpatterns.len() => {
                subpatterns
                    .iter()
                    .zip(args)
                    .all(|(sub, arg)| match_pattern(sub, arg, bindings))
            }
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eval(term: &Term) -> Result<Term, EvalError> {
        Evaluator::new().evaluate(term, &Scope::new())
    }

    #[test]
    fn test_literals_are_values() {
        assert_eq!(eval(&Term::int(7)), Ok(Term::int(7)));
        assert_eq!(eval(&Term::bool(false)), Ok(Term::bool(false)));
    }

    #[test]
    fn test_abstraction_body_is_not_evaluated() {
        let term = Term::abs("x", Term::binop(BinOpKind::Add, Term::int(1), Term::int(2)));
        assert_eq!(eval(&term), Ok(term));
    }

    #[test]
    fn test_beta_reduction() {
        let term = Term::app(
            Term::abs("x", Term::binop(BinOpKind::Add, Term::var("x"), Term::int(1))),
            Term::int(5),
        );
        assert_eq!(eval(&term), Ok(Term::int(6)));
    }

    #[test]
    fn test_arithmetic() {
        let term = Term::binop(
            BinOpKind::Sub,
            Term::binop(BinOpKind::Mul, Term::int(6), Term::int(7)),
            Term::binop(BinOpKind::Div, Term::int(9), Term::int(3)),
        );
        assert_eq!(eval(&term), Ok(Term::int(39)));
    }

    #[test]
    fn test_division_by_zero() {
        let term = Term::binop(BinOpKind::Div, Term::int(1), Term::int(0));
        assert!(matches!(eval(&term), Err(EvalError::DivisionByZero { .. })));
    }

    #[test]
    fn test_overflow() {
        let term = Term::binop(BinOpKind::Add, Term::int(i64::MAX), Term::int(1));
        assert!(matches!(eval(&term), Err(EvalError::Overflow { .. })));
    }

    #[test]
    fn test_ill_kinded_operands_stay_in_place() {
        let term = Term::binop(BinOpKind::Add, Term::int(1), Term::bool(true));
        assert_eq!(eval(&term), Ok(term));
    }

    #[test]
    fn test_stuck_application_is_rebuilt() {
        // Cons (1 + 1) evaluates its argument but stays an application
        let term = Term::app(
            Term::ctor("Cons"),
            Term::binop(BinOpKind::Add, Term::int(1), Term::int(1)),
        );
        assert_eq!(eval(&term), Ok(Term::app(Term::ctor("Cons"), Term::int(2))));
    }

    #[test]
    fn test_comparisons() {
        let le = Term::binop(BinOpKind::LtEq, Term::int(2), Term::int(3));
        assert_eq!(eval(&le), Ok(Term::bool(true)));

        let bool_le = Term::binop(BinOpKind::LtEq, Term::bool(true), Term::bool(false));
        assert_eq!(eval(&bool_le), Ok(Term::bool(false)));

        let eq = Term::binop(BinOpKind::Eq, Term::int(2), Term::int(2));
        assert_eq!(eval(&eq), Ok(Term::bool(true)));
    }

    #[test]
    fn test_structural_equality_on_data() {
        let cons = |h: i64| Term::apply(Term::ctor("Cons"), [Term::int(h), Term::ctor("Nil")]);
        let same = Term::binop(BinOpKind::Eq, cons(1), cons(1));
        let different = Term::binop(BinOpKind::Eq, cons(1), cons(2));
        assert_eq!(eval(&same), Ok(Term::bool(true)));
        assert_eq!(eval(&different), Ok(Term::bool(false)));
    }

    #[test]
    fn test_not() {
        assert_eq!(eval(&Term::not(Term::bool(true))), Ok(Term::bool(false)));
    }

    #[test]
    fn test_if_is_lazy_in_branches() {
        let term = Term::cond(
            Term::bool(true),
            Term::int(1),
            Term::binop(BinOpKind::Div, Term::int(1), Term::int(0)),
        );
        assert_eq!(eval(&term), Ok(Term::int(1)));
    }

    #[test]
    fn test_unbound_variable() {
        assert_eq!(
            eval(&Term::var("x")),
            Err(EvalError::UnboundVariable {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn test_scope_lookup() {
        let scope = Scope::with_bindings(vec![(
            "y".to_string(),
            Term::binop(BinOpKind::Add, Term::int(2), Term::int(3)),
        )]);
        let term = Term::binop(BinOpKind::Mul, Term::var("y"), Term::int(2));
        assert_eq!(Evaluator::new().evaluate(&term, &scope), Ok(Term::int(10)));
    }

    #[test]
    fn test_match_binds_constructor_arguments() {
        let subject = Term::apply(Term::ctor("Cons"), [Term::int(4), Term::ctor("Nil")]);
        let term = Term::matching(
            subject,
            vec![
                (Pattern::ctor("Nil", vec![]), Term::int(0)),
                (
                    Pattern::ctor("Cons", vec![Pattern::var("h"), Pattern::var("t")]),
                    Term::binop(BinOpKind::Add, Term::var("h"), Term::int(1)),
                ),
            ],
        );
        assert_eq!(eval(&term), Ok(Term::int(5)));
    }

    #[test]
    fn test_match_literal_patterns_in_order() {
        let term = Term::matching(
            Term::int(2),
            vec![
                (Pattern::int(1), Term::bool(false)),
                (Pattern::int(2), Term::bool(true)),
                (Pattern::var("n"), Term::bool(false)),
            ],
        );
        assert_eq!(eval(&term), Ok(Term::bool(true)));
    }

    #[test]
    fn test_match_without_matching_case() {
        let term = Term::matching(Term::int(3), vec![(Pattern::int(1), Term::int(0))]);
        assert_eq!(
            eval(&term),
            Err(EvalError::NoMatchingCase {
                subject: Term::int(3)
            })
        );
    }
}
