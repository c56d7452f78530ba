//! The substitution evaluator and the combinator reducer must agree on
//! every closed, fault-free term.

use kestrel::combinator::{reduce, translate_with, TranslateOptions};
use kestrel::interpreter::{evaluate, Scope};
use kestrel::term::{BinOpKind, Literal, Pattern, Term};
use kestrel::types::{infer, DataDecl, Type, TypeEnv, TypeVar};
use pretty_assertions::assert_eq;

// HELPERS

fn var(name: &str) -> Term {
    Term::var(name)
}

fn int(value: i64) -> Term {
    Term::int(value)
}

fn list(values: &[i64]) -> Term {
    values.iter().rev().fold(Term::ctor("Nil"), |tail, value| {
        Term::apply(Term::ctor("Cons"), [int(*value), tail])
    })
}

fn list_env() -> TypeEnv {
    let a = TypeVar::with_name(0, "a");
    TypeEnv::empty().with_data(
        DataDecl::new("list", vec![a.clone()])
            .constructor("Nil", vec![])
            .constructor("Cons", vec![Type::var(&a), Type::adt("list", vec![Type::var(&a)])]),
    )
}

fn factorial() -> Term {
    Term::rec(
        "fact",
        Term::abs(
            "n",
            Term::cond(
                Term::binop(BinOpKind::Eq, var("n"), int(0)),
                int(1),
                Term::binop(
                    BinOpKind::Mul,
                    var("n"),
                    Term::app(var("fact"), Term::binop(BinOpKind::Sub, var("n"), int(1))),
                ),
            ),
        ),
    )
}

fn sum() -> Term {
    Term::rec(
        "sum",
        Term::abs(
            "xs",
            Term::matching(
                var("xs"),
                vec![
                    (Pattern::ctor("Nil", vec![]), int(0)),
                    (
                        Pattern::ctor("Cons", vec![Pattern::var("h"), Pattern::var("t")]),
                        Term::binop(BinOpKind::Add, var("h"), Term::app(var("sum"), var("t"))),
                    ),
                ],
            ),
        ),
    )
}

/// Run `term` through both engines, in both translation modes, and return
/// the literal they all agree on.
fn run_everywhere(term: &Term) -> Literal {
    let evaluated = evaluate(term, &Scope::new())
        .unwrap()
        .as_literal()
        .expect("evaluator result is a literal");

    for options in [TranslateOptions::optimized(), TranslateOptions::unoptimized()] {
        let translated = translate_with(term, &options).unwrap();
        let reduced = reduce(&translated)
            .unwrap()
            .as_literal()
            .expect("reducer result is a literal");
        assert_eq!(reduced, evaluated, "optimize = {}", options.optimize);
    }

    evaluated
}

// TESTS

#[test]
fn increment() {
    let term = Term::app(
        Term::abs("x", Term::binop(BinOpKind::Add, var("x"), int(1))),
        int(5),
    );
    assert_eq!(run_everywhere(&term), Literal::Int(6));
}

#[test]
fn factorial_of_four() {
    let term = Term::app(factorial(), int(4));
    assert_eq!(infer(&term, &TypeEnv::empty()), Ok(Type::int()));
    assert_eq!(run_everywhere(&term), Literal::Int(24));
}

#[test]
fn negation() {
    assert_eq!(run_everywhere(&Term::not(Term::bool(true))), Literal::Bool(false));
}

#[test]
fn comparison_drives_conditional() {
    let term = Term::cond(
        Term::binop(BinOpKind::LtEq, int(1), int(2)),
        int(10),
        int(20),
    );
    assert_eq!(run_everywhere(&term), Literal::Int(10));
}

#[test]
fn boolean_connectives() {
    let term = Term::binop(
        BinOpKind::Or,
        Term::binop(BinOpKind::And, Term::bool(true), Term::bool(false)),
        Term::not(Term::bool(false)),
    );
    assert_eq!(run_everywhere(&term), Literal::Bool(true));
}

#[test]
fn higher_order_function() {
    let twice = Term::abs(
        "f",
        Term::abs("x", Term::app(var("f"), Term::app(var("f"), var("x")))),
    );
    let double = Term::abs("y", Term::binop(BinOpKind::Mul, var("y"), int(2)));
    let term = Term::apply(twice, [double, int(3)]);
    assert_eq!(run_everywhere(&term), Literal::Int(12));
}

#[test]
fn recursion_over_a_list() {
    let term = Term::app(sum(), list(&[1, 2, 3]));
    assert_eq!(infer(&term, &list_env()), Ok(Type::int()));
    assert_eq!(run_everywhere(&term), Literal::Int(6));
}

#[test]
fn structural_equality_on_lists() {
    let term = Term::binop(BinOpKind::Eq, list(&[1, 2]), list(&[1, 2]));
    assert_eq!(run_everywhere(&term), Literal::Bool(true));

    let term = Term::binop(BinOpKind::Eq, list(&[1, 2]), list(&[2, 1]));
    assert_eq!(run_everywhere(&term), Literal::Bool(false));
}

#[test]
fn literal_patterns() {
    let term = Term::matching(
        Term::binop(BinOpKind::Sub, int(5), int(3)),
        vec![
            (Pattern::int(1), Term::bool(false)),
            (Pattern::int(2), Term::bool(true)),
            (Pattern::var("n"), Term::bool(false)),
        ],
    );
    assert_eq!(run_everywhere(&term), Literal::Bool(true));
}
