use std::collections::HashMap;

use log::debug;

use super::env::TypeEnv;
use super::error::{Operand, TypeError};
use super::exhaustive::check_exhaustive;
use super::ty::{Type, TypeScheme, TypeVar};
use super::unify::{UnifyError, Unifier};
use crate::fresh::Supply;
use crate::term::{BinOpKind, Literal, Pattern, Term, UnaryOpKind};

/// Infer the principal type of `term` under `env`.
///
/// Each call runs its own session: a fresh [`Checker`] with its own
/// substitution environment and id supply.
pub fn infer(term: &Term, env: &TypeEnv) -> Result<Type, TypeError> {
    debug!("infer {}", term);
    let mut checker = Checker::new(env);
    let ty = checker.infer(env, term)?;
    debug!("inferred {} : {}", term, ty);
    Ok(ty)
}

/// One type-checking session.
pub struct Checker {
    unifier: Unifier,
    supply: Supply,
}

impl Checker {
    /// A session whose fresh variables cannot collide with any variable
    /// already mentioned by `env`.
    pub fn new(env: &TypeEnv) -> Self {
        let start = env.max_var_id().map_or(0, |id| id + 1);
        Checker {
            unifier: Unifier::new(),
            supply: Supply::starting_at(start),
        }
    }

    fn fresh(&mut self) -> Type {
        Type::Var(self.supply.fresh_var())
    }

    /// Replace the quantified variables of `scheme` by fresh ones.
    ///
    /// A single mapping serves the whole type, so every occurrence of one
    /// parameter becomes the same fresh variable: instantiating
    /// `Cons : a -> list a -> list a` yields `'t7 -> list 't7 -> list 't7`,
    /// never `'t7 -> list 't8 -> list 't9`.
    pub fn instantiate(&mut self, scheme: &TypeScheme) -> Type {
        let mapping: HashMap<TypeVar, Type> = scheme
            .vars
            .iter()
            .map(|v| (v.clone(), self.fresh()))
            .collect();
        scheme.ty.rename_vars(&mapping)
    }

    pub fn resolve(&self, ty: &Type) -> Type {
        self.unifier.resolve(ty)
    }

    pub fn infer(&mut self, env: &TypeEnv, term: &Term) -> Result<Type, TypeError> {
        let ty = self.compute_type(env, term)?;
        Ok(self.resolve(&ty))
    }

    /// Unify `expected` with `found`; a mismatch is reported through
    /// `on_mismatch` with both sides resolved.
    fn expect(
        &mut self,
        expected: &Type,
        found: &Type,
        term: &Term,
        on_mismatch: impl FnOnce(Type, Type) -> TypeError,
    ) -> Result<(), TypeError> {
        match self.unifier.unify(expected, found) {
            Ok(_) => Ok(()),
            Err(UnifyError::Mismatch { .. }) => {
                Err(on_mismatch(self.resolve(expected), self.resolve(found)))
            }
            Err(err) => Err(TypeError::from_unify_error(err, term)),
        }
    }

    fn compute_type(&mut self, env: &TypeEnv, term: &Term) -> Result<Type, TypeError> {
        match term {
            Term::Var(name) => match env.lookup(name) {
                Some(scheme) => Ok(self.instantiate(scheme)),
                None => Err(TypeError::UnboundVariable { name: name.clone() }),
            },

            Term::Lit(lit) => Ok(literal_type(lit)),

            Term::App(func, arg) => self.compute_app(env, term, func, arg),

            Term::Abs(param, body) => {
                let param_ty = self.fresh();
                let env1 = env.extend(param.clone(), TypeScheme::monomorphic(param_ty.clone()));
                let body_ty = self.compute_type(&env1, body)?;
                Ok(Type::func(self.resolve(&param_ty), body_ty))
            }

            Term::BinOp(op, left, right) => self.compute_binop(env, term, *op, left, right),

            Term::UnOp(UnaryOpKind::Not, operand) => {
                let operand_ty = self.compute_type(env, operand)?;
                self.expect(&Type::bool(), &operand_ty, term, |expected, found| {
                    TypeError::OperandMismatch {
                        side: Operand::Only,
                        operand: (**operand).clone(),
                        expr: term.clone(),
                        expected,
                        found,
                    }
                })?;
                Ok(Type::bool())
            }

            Term::If(condition, then_term, else_term) => {
                let cond_ty = self.compute_type(env, condition)?;
                self.expect(&Type::bool(), &cond_ty, term, |_, found| {
                    TypeError::NonBooleanCondition {
                        condition: (**condition).clone(),
                        found,
                    }
                })?;
                let then_ty = self.compute_type(env, then_term)?;
                let else_ty = self.compute_type(env, else_term)?;
                self.expect(&then_ty, &else_ty, term, |then_type, else_type| {
                    TypeError::BranchMismatch {
                        expr: term.clone(),
                        then_type,
                        else_type,
                    }
                })?;
                Ok(self.resolve(&then_ty))
            }

            Term::Rec(name, body) => {
                let self_ty = self.fresh();
                let env1 = env.extend(name.clone(), TypeScheme::monomorphic(self_ty.clone()));
                let body_ty = self.compute_type(&env1, body)?;
                self.expect(&self_ty, &body_ty, term, |expected, found| {
                    TypeError::RecursionMismatch {
                        name: name.clone(),
                        expected,
                        found,
                    }
                })?;
                Ok(self.resolve(&self_ty))
            }

            Term::Constructor(name) => match env.constructors().lookup(name) {
                Some((decl, sig)) => {
                    let scheme = decl.constructor_scheme(sig);
                    Ok(self.instantiate(&scheme))
                }
                None => Err(TypeError::UnknownConstructor { name: name.clone() }),
            },

            Term::Match(subject, cases) => self.compute_match(env, subject, cases),
        }
    }

    fn compute_app(
        &mut self,
        env: &TypeEnv,
        term: &Term,
        func: &Term,
        arg: &Term,
    ) -> Result<Type, TypeError> {
        let func_ty = self.compute_type(env, func)?;
        let arg_ty = self.compute_type(env, arg)?;

        match self.resolve(&func_ty) {
            Type::Func(param_ty, result_ty) => {
                self.expect(&param_ty, &arg_ty, term, |expected, found| {
                    TypeError::ArgumentMismatch {
                        arg: arg.clone(),
                        expr: term.clone(),
                        expected,
                        found,
                    }
                })?;
                Ok(self.resolve(&result_ty))
            }
            Type::Var(_) => {
                let result_ty = self.fresh();
                let expected = Type::func(arg_ty, result_ty.clone());
                self.expect(&expected, &func_ty, term, |expected, found| TypeError::Mismatch {
                    term: term.clone(),
                    expected,
                    found,
                })?;
                Ok(self.resolve(&result_ty))
            }
            found => Err(TypeError::NotAFunction {
                func: func.clone(),
                arg: arg.clone(),
                found,
            }),
        }
    }

    /// Arithmetic and boolean operators fix the left operand to their operand
    /// type; comparisons leave it open. Either way the right operand must then
    /// agree with the left one.
    fn compute_binop(
        &mut self,
        env: &TypeEnv,
        term: &Term,
        op: BinOpKind,
        left: &Term,
        right: &Term,
    ) -> Result<Type, TypeError> {
        let left_ty = self.compute_type(env, left)?;
        if !op.is_comparison() {
            let operand_ty = match op {
                BinOpKind::And | BinOpKind::Or => Type::bool(),
                _ => Type::int(),
            };
            self.expect(&operand_ty, &left_ty, term, |expected, found| {
                TypeError::OperandMismatch {
                    side: Operand::Left,
                    operand: left.clone(),
                    expr: term.clone(),
                    expected,
                    found,
                }
            })?;
        }

        let right_ty = self.compute_type(env, right)?;
        self.expect(&left_ty, &right_ty, term, |left_type, right_type| {
            TypeError::OperandsDisagree {
                left: left.clone(),
                right: right.clone(),
                expr: term.clone(),
                left_type,
                right_type,
            }
        })?;

        if op.is_comparison() {
            Ok(Type::bool())
        } else {
            Ok(self.resolve(&left_ty))
        }
    }

    /// Type the subject, then each case in order: the pattern must match the
    /// subject's type, and every case body must agree on one result type.
    /// The first failing case aborts the check.
    fn compute_match(
        &mut self,
        env: &TypeEnv,
        subject: &Term,
        cases: &[(Pattern, Term)],
    ) -> Result<Type, TypeError> {
        if cases.is_empty() {
            return Err(TypeError::EmptyMatch {
                subject: subject.clone(),
            });
        }

        let subject_ty = self.compute_type(env, subject)?;
        let result_ty = self.fresh();

        for (pattern, body) in cases {
            let mut bindings = Vec::new();
            let pattern_ty = self.type_pattern(env, pattern, &mut bindings)?;
            check_duplicates(pattern, &bindings)?;

            self.expect(&subject_ty, &pattern_ty, subject, |expected, found| {
                TypeError::PatternMismatch {
                    pattern: pattern.clone(),
                    expected,
                    found,
                }
            })?;

            let case_env = env.extend_many(bindings);
            let body_ty = self.compute_type(&case_env, body)?;
            self.expect(&result_ty, &body_ty, body, |expected, found| {
                TypeError::CaseMismatch {
                    pattern: pattern.clone(),
                    body: body.clone(),
                    expected,
                    found,
                }
            })?;
        }

        check_exhaustive(env.constructors(), &self.resolve(&subject_ty), cases)?;
        Ok(self.resolve(&result_ty))
    }

    /// Type a pattern, collecting the variables it binds in `bindings`.
    fn type_pattern(
        &mut self,
        env: &TypeEnv,
        pattern: &Pattern,
        bindings: &mut Vec<(String, TypeScheme)>,
    ) -> Result<Type, TypeError> {
        match pattern {
            Pattern::Var(name) => {
                let ty = self.fresh();
                bindings.push((name.clone(), TypeScheme::monomorphic(ty.clone())));
                Ok(ty)
            }

            Pattern::Const(lit) => Ok(literal_type(lit)),

            Pattern::Constructor(name, subpatterns) => {
                let (decl, sig) = env
                    .constructors()
                    .lookup(name)
                    .ok_or_else(|| TypeError::UnknownConstructor { name: name.clone() })?;

                if sig.args.len() != subpatterns.len() {
                    return Err(TypeError::ConstructorArity {
                        name: name.clone(),
                        expected: sig.args.len(),
                        found: subpatterns.len(),
                    });
                }

                let scheme = decl.constructor_scheme(sig);
                let mut ty = self.instantiate(&scheme);
                let ctor_term = Term::Constructor(name.clone());

                for sub in subpatterns {
                    let (arg_ty, rest) = match ty {
                        Type::Func(arg_ty, rest) => (*arg_ty, *rest),
                        _ => {
                            return Err(TypeError::ConstructorArity {
                                name: name.clone(),
                                expected: sig.args.len(),
                                found: subpatterns.len(),
                            });
                        }
                    };
                    let sub_ty = self.type_pattern(env, sub, bindings)?;
                    self.expect(&arg_ty, &sub_ty, &ctor_term, |expected, found| {
                        TypeError::PatternMismatch {
                            pattern: sub.clone(),
                            expected,
                            found,
                        }
                    })?;
                    ty = rest;
                }

                Ok(ty)
            }
        }
    }
}

fn literal_type(lit: &Literal) -> Type {
    match lit {
        Literal::Int(_) => Type::int(),
        Literal::Bool(_) => Type::bool(),
    }
}

fn check_duplicates(
    pattern: &Pattern,
    bindings: &[(String, TypeScheme)],
) -> Result<(), TypeError> {
    for (index, (name, _)) in bindings.iter().enumerate() {
        if bindings[..index].iter().any(|(seen, _)| seen == name) {
            return Err(TypeError::DuplicatePatternVariable {
                name: name.clone(),
                pattern: pattern.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::env::DataDecl;
    use pretty_assertions::assert_eq;

    fn list_env() -> TypeEnv {
        let a = TypeVar::with_name(0, "a");
        TypeEnv::empty().with_data(
            DataDecl::new("list", vec![a.clone()])
                .constructor("Nil", vec![])
                .constructor(
                    "Cons",
                    vec![Type::var(&a), Type::adt("list", vec![Type::var(&a)])],
                ),
        )
    }

    fn add(left: Term, right: Term) -> Term {
        Term::binop(BinOpKind::Add, left, right)
    }

    #[test]
    fn test_infer_integer_literal() {
        assert_eq!(infer(&Term::int(42), &TypeEnv::empty()), Ok(Type::int()));
    }

    #[test]
    fn test_infer_unbound_variable() {
        let result = infer(&Term::var("x"), &TypeEnv::empty());
        assert_eq!(
            result,
            Err(TypeError::UnboundVariable {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn test_infer_identity_function() {
        let ty = infer(&Term::abs("x", Term::var("x")), &TypeEnv::empty()).unwrap();
        match ty {
            Type::Func(t1, t2) => assert_eq!(t1, t2),
            other => panic!("expected function type, got {:?}", other),
        }
    }

    #[test]
    fn test_infer_const_function() {
        // \x. \y. x  :  'a -> 'b -> 'a
        let term = Term::abs("x", Term::abs("y", Term::var("x")));
        let ty = infer(&term, &TypeEnv::empty()).unwrap().normalize();
        let a = Type::Var(TypeVar::new(0));
        let b = Type::Var(TypeVar::new(1));
        assert_eq!(ty, Type::curried([a.clone(), b], a));
    }

    #[test]
    fn test_infer_simple_application() {
        let term = Term::app(Term::abs("x", Term::var("x")), Term::int(42));
        assert_eq!(infer(&term, &TypeEnv::empty()), Ok(Type::int()));
    }

    #[test]
    fn test_infer_application_of_unknown_function() {
        // \f. f 1  :  (Int -> 'a) -> 'a
        let term = Term::abs("f", Term::app(Term::var("f"), Term::int(1)));
        let ty = infer(&term, &TypeEnv::empty()).unwrap().normalize();
        let a = Type::Var(TypeVar::new(0));
        assert_eq!(ty, Type::func(Type::func(Type::int(), a.clone()), a));
    }

    #[test]
    fn test_infer_applying_integer_fails() {
        let term = Term::app(Term::int(42), Term::int(10));
        assert!(matches!(
            infer(&term, &TypeEnv::empty()),
            Err(TypeError::NotAFunction { .. })
        ));
    }

    #[test]
    fn test_infer_argument_mismatch() {
        // (\x. x + 1) True
        let term = Term::app(Term::abs("x", add(Term::var("x"), Term::int(1))), Term::bool(true));
        match infer(&term, &TypeEnv::empty()) {
            Err(TypeError::ArgumentMismatch {
                arg,
                expected,
                found,
                ..
            }) => {
                assert_eq!(arg, Term::bool(true));
                assert_eq!(expected, Type::int());
                assert_eq!(found, Type::bool());
            }
            other => panic!("expected ArgumentMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_infer_binary_addition() {
        let term = add(Term::int(1), Term::int(2));
        assert_eq!(infer(&term, &TypeEnv::empty()), Ok(Type::int()));
    }

    #[test]
    fn test_infer_binary_mixed_types_cites_left_operand() {
        let term = add(Term::int(5), Term::bool(true));
        match infer(&term, &TypeEnv::empty()) {
            Err(TypeError::OperandsDisagree {
                left,
                right,
                left_type,
                right_type,
                ..
            }) => {
                assert_eq!(left, Term::int(5));
                assert_eq!(right, Term::bool(true));
                assert_eq!(left_type, Type::int());
                assert_eq!(right_type, Type::bool());
            }
            other => panic!("expected OperandsDisagree, got {:?}", other),
        }
    }

    #[test]
    fn test_infer_left_operand_checked_first() {
        let term = add(Term::bool(true), Term::bool(false));
        assert!(matches!(
            infer(&term, &TypeEnv::empty()),
            Err(TypeError::OperandMismatch {
                side: Operand::Left,
                ..
            })
        ));
    }

    #[test]
    fn test_infer_comparison_unifies_operands() {
        // \x. x = True  :  Bool -> Bool
        let term = Term::abs(
            "x",
            Term::binop(BinOpKind::Eq, Term::var("x"), Term::bool(true)),
        );
        assert_eq!(
            infer(&term, &TypeEnv::empty()),
            Ok(Type::func(Type::bool(), Type::bool()))
        );

        let bad = Term::binop(BinOpKind::LtEq, Term::int(1), Term::bool(true));
        assert!(infer(&bad, &TypeEnv::empty()).is_err());
    }

    #[test]
    fn test_infer_boolean_operators() {
        let term = Term::binop(BinOpKind::And, Term::bool(true), Term::not(Term::bool(false)));
        assert_eq!(infer(&term, &TypeEnv::empty()), Ok(Type::bool()));

        let bad = Term::not(Term::int(1));
        assert!(matches!(
            infer(&bad, &TypeEnv::empty()),
            Err(TypeError::OperandMismatch {
                side: Operand::Only,
                ..
            })
        ));
    }

    #[test]
    fn test_infer_if() {
        let term = Term::cond(Term::bool(true), Term::int(1), Term::int(2));
        assert_eq!(infer(&term, &TypeEnv::empty()), Ok(Type::int()));
    }

    #[test]
    fn test_infer_if_non_boolean_condition() {
        let term = Term::cond(Term::int(1), Term::int(1), Term::int(2));
        assert_eq!(
            infer(&term, &TypeEnv::empty()),
            Err(TypeError::NonBooleanCondition {
                condition: Term::int(1),
                found: Type::int()
            })
        );
    }

    #[test]
    fn test_infer_if_branch_mismatch() {
        let term = Term::cond(Term::bool(true), Term::int(1), Term::bool(false));
        assert!(matches!(
            infer(&term, &TypeEnv::empty()),
            Err(TypeError::BranchMismatch { .. })
        ));
    }

    #[test]
    fn test_infer_recursive_factorial() {
        // rec fact. \n. if n = 0 then 1 else n * fact (n - 1)
        let term = Term::rec(
            "fact",
            Term::abs(
                "n",
                Term::cond(
                    Term::binop(BinOpKind::Eq, Term::var("n"), Term::int(0)),
                    Term::int(1),
                    Term::binop(
                        BinOpKind::Mul,
                        Term::var("n"),
                        Term::app(
                            Term::var("fact"),
                            Term::binop(BinOpKind::Sub, Term::var("n"), Term::int(1)),
                        ),
                    ),
                ),
            ),
        );
        assert_eq!(
            infer(&term, &TypeEnv::empty()),
            Ok(Type::func(Type::int(), Type::int()))
        );
    }

    #[test]
    fn test_infer_self_application_fails_occurs_check() {
        // \x. x x
        let term = Term::abs("x", Term::app(Term::var("x"), Term::var("x")));
        assert!(matches!(
            infer(&term, &TypeEnv::empty()),
            Err(TypeError::InfiniteType { .. })
        ));
    }

    #[test]
    fn test_instantiate_consistently() {
        let env = list_env();
        let mut checker = Checker::new(&env);
        let ty = checker
            .compute_type(&env, &Term::ctor("Cons"))
            .unwrap();
        match ty {
            Type::Func(elem, rest) => match *rest {
                Type::Func(tail, result) => {
                    let expected_list = Type::adt("list", vec![(*elem).clone()]);
                    assert_eq!(*tail, expected_list);
                    assert_eq!(*result, expected_list);
                }
                other => panic!("expected curried constructor, got {:?}", other),
            },
            other => panic!("expected function type, got {:?}", other),
        }
    }

    #[test]
    fn test_instantiate_twice_gives_distinct_vars() {
        let var = TypeVar::new(100);
        let scheme = TypeScheme::polymorphic(vec![var.clone()], Type::Var(var));
        let mut checker = Checker::new(&TypeEnv::empty());
        let ty1 = checker.instantiate(&scheme);
        let ty2 = checker.instantiate(&scheme);
        assert_ne!(ty1, ty2);
    }

    #[test]
    fn test_polymorphic_binding_in_environment() {
        // id : forall a. a -> a ;  if id True then id 1 else 2
        let a = TypeVar::new(0);
        let env = TypeEnv::with_bindings(vec![(
            "id".to_string(),
            TypeScheme::polymorphic(vec![a.clone()], Type::func(Type::var(&a), Type::var(&a))),
        )]);
        let term = Term::cond(
            Term::app(Term::var("id"), Term::bool(true)),
            Term::app(Term::var("id"), Term::int(1)),
            Term::int(2),
        );
        assert_eq!(infer(&term, &env), Ok(Type::int()));
    }

    #[test]
    fn test_fresh_vars_avoid_environment_ids() {
        // x : 't0 in the environment must not be confused with a fresh variable
        let env = TypeEnv::with_bindings(vec![(
            "x".to_string(),
            TypeScheme::monomorphic(Type::Var(TypeVar::new(0))),
        )]);
        let term = Term::abs("y", Term::var("x"));
        match infer(&term, &env).unwrap() {
            Type::Func(param, result) => assert_ne!(param, result),
            other => panic!("expected function type, got {:?}", other),
        }
    }

    #[test]
    fn test_infer_cons_application() {
        let env = list_env();
        let term = Term::apply(Term::ctor("Cons"), [Term::int(1), Term::ctor("Nil")]);
        assert_eq!(infer(&term, &env), Ok(Type::adt("list", vec![Type::int()])));
    }

    #[test]
    fn test_infer_cons_rejects_mixed_elements() {
        let env = list_env();
        let inner = Term::apply(Term::ctor("Cons"), [Term::bool(true), Term::ctor("Nil")]);
        let term = Term::apply(Term::ctor("Cons"), [Term::int(1), inner]);
        assert!(infer(&term, &env).is_err());
    }

    #[test]
    fn test_infer_unknown_constructor() {
        assert_eq!(
            infer(&Term::ctor("Just"), &TypeEnv::empty()),
            Err(TypeError::UnknownConstructor {
                name: "Just".to_string()
            })
        );
    }

    #[test]
    fn test_infer_match_on_list() {
        // \xs. match xs with | Nil -> 0 | Cons h t -> h
        let term = Term::abs(
            "xs",
            Term::matching(
                Term::var("xs"),
                vec![
                    (Pattern::ctor("Nil", vec![]), Term::int(0)),
                    (
                        Pattern::ctor("Cons", vec![Pattern::var("h"), Pattern::var("t")]),
                        Term::var("h"),
                    ),
                ],
            ),
        );
        assert_eq!(
            infer(&term, &list_env()),
            Ok(Type::func(Type::adt("list", vec![Type::int()]), Type::int()))
        );
    }

    #[test]
    fn test_infer_match_pattern_mismatch_fails_fast() {
        // match 1 with | True -> 0 | n -> n
        let term = Term::matching(
            Term::int(1),
            vec![
                (Pattern::bool(true), Term::int(0)),
                (Pattern::var("n"), Term::var("n")),
            ],
        );
        assert_eq!(
            infer(&term, &TypeEnv::empty()),
            Err(TypeError::PatternMismatch {
                pattern: Pattern::bool(true),
                expected: Type::int(),
                found: Type::bool()
            })
        );
    }

    #[test]
    fn test_infer_match_case_mismatch() {
        let term = Term::matching(
            Term::int(1),
            vec![
                (Pattern::int(0), Term::int(0)),
                (Pattern::var("n"), Term::bool(false)),
            ],
        );
        assert!(matches!(
            infer(&term, &TypeEnv::empty()),
            Err(TypeError::CaseMismatch { .. })
        ));
    }

    #[test]
    fn test_infer_match_constructor_arity() {
        let term = Term::matching(
            Term::ctor("Nil"),
            vec![(Pattern::ctor("Cons", vec![Pattern::var("h")]), Term::int(0))],
        );
        assert_eq!(
            infer(&term, &list_env()),
            Err(TypeError::ConstructorArity {
                name: "Cons".to_string(),
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_infer_match_duplicate_variable() {
        let pattern = Pattern::ctor("Cons", vec![Pattern::var("x"), Pattern::var("x")]);
        let term = Term::matching(Term::ctor("Nil"), vec![(pattern.clone(), Term::int(0))]);
        assert_eq!(
            infer(&term, &list_env()),
            Err(TypeError::DuplicatePatternVariable {
                name: "x".to_string(),
                pattern
            })
        );
    }

    #[test]
    fn test_infer_empty_match() {
        let term = Term::matching(Term::int(1), vec![]);
        assert!(matches!(
            infer(&term, &TypeEnv::empty()),
            Err(TypeError::EmptyMatch { .. })
        ));
    }
}
