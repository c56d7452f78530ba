use std::rc::Rc;

use log::{debug, trace};

use super::error::ReduceError;
use super::{CTerm, Comb, Constant, Primitive, Shape};
use crate::term::Literal;

/// Reduce a combinator term to normal form.
pub fn reduce(term: &CTerm) -> Result<CTerm, ReduceError> {
    debug!("reduce {}", term);
    let mut reducer = Reducer::new();
    let result = reducer.normalize(&Rc::new(term.clone()))?;
    debug!("reduced to {} in {} steps", result, reducer.steps());
    Ok(Rc::try_unwrap(result).unwrap_or_else(|shared| (*shared).clone()))
}

/// Outcome of trying to rewrite the head of a spine.
enum Step {
    Rewrote(Rc<CTerm>),
    /// No rule applies; the spine is rebuilt, possibly with forced arguments.
    Stuck(Rc<CTerm>),
}

enum ShapeMatch {
    Matched,
    Failed,
    /// The scrutinee is neither a literal nor a constructor application.
    Stuck,
}

/// Spine reducer for combinator terms.
///
/// Rewriting happens at the head of the outermost spine only, so arguments
/// are evaluated lazily: a primitive forces exactly the operands it needs,
/// and `if` forces its condition and then only the selected branch.
#[derive(Debug, Default)]
pub struct Reducer {
    steps: usize,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rewrites performed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Rewrite the head of `term` until no rule applies.
    pub fn whnf(&mut self, term: &Rc<CTerm>) -> Result<Rc<CTerm>, ReduceError> {
        let mut current = Rc::clone(term);
        loop {
            let (head, args) = unwind(&current);
            match self.step(head, args)? {
                Step::Rewrote(next) => {
                    self.steps += 1;
                    current = next;
                }
                Step::Stuck(stuck) => return Ok(stuck),
            }
        }
    }

    /// Head normal form, then every argument of the remaining spine.
    pub fn normalize(&mut self, term: &Rc<CTerm>) -> Result<Rc<CTerm>, ReduceError> {
        let term = self.whnf(term)?;
        let (head, args) = unwind(&term);
        if args.is_empty() {
            return Ok(term);
        }
        let args = args
            .iter()
            .map(|arg| self.normalize(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CTerm::rebuild(head, args))
    }

    fn step(&mut self, head: Rc<CTerm>, args: Vec<Rc<CTerm>>) -> Result<Step, ReduceError> {
        match head.as_ref() {
            CTerm::Comb(comb) => Ok(rewrite_comb(*comb, head.clone(), args)),
            CTerm::Const(Constant::Prim(prim)) => self.apply_prim(*prim, head.clone(), args),
            CTerm::Const(Constant::Case(shapes)) => {
                let shapes = Rc::clone(shapes);
                self.apply_case(&shapes, head, args)
            }
            _ => Ok(Step::Stuck(CTerm::rebuild(head, args))),
        }
    }

    fn apply_prim(
        &mut self,
        prim: Primitive,
        head: Rc<CTerm>,
        args: Vec<Rc<CTerm>>,
    ) -> Result<Step, ReduceError> {
        let arity = prim.arity();
        if args.len() < arity {
            return Ok(Step::Stuck(CTerm::rebuild(head, args)));
        }
        let rest = args[arity..].to_vec();

        match prim {
            Primitive::If => {
                let condition = self.whnf(&args[0])?;
                let branch = match condition.as_literal() {
                    Some(Literal::Bool(true)) => Rc::clone(&args[1]),
                    Some(Literal::Bool(false)) => Rc::clone(&args[2]),
                    _ => {
                        let forced = [condition, Rc::clone(&args[1]), Rc::clone(&args[2])];
                        return Ok(Step::Stuck(CTerm::rebuild(
                            head,
                            forced.into_iter().chain(rest),
                        )));
                    }
                };
                trace!("if: {}", branch);
                Ok(Step::Rewrote(CTerm::rebuild(branch, rest)))
            }

            Primitive::Not => {
                let operand = self.whnf(&args[0])?;
                match operand.as_literal() {
                    Some(Literal::Bool(value)) => Ok(Step::Rewrote(CTerm::rebuild(
                        Rc::new(CTerm::bool(!value)),
                        rest,
                    ))),
                    _ => Ok(Step::Stuck(CTerm::rebuild(
                        head,
                        std::iter::once(operand).chain(rest),
                    ))),
                }
            }

            _ => {
                // Equality looks inside constructor values, so it needs both
                // operands fully reduced.
                let (left, right) = if prim == Primitive::Eq {
                    (self.normalize(&args[0])?, self.normalize(&args[1])?)
                } else {
                    (self.whnf(&args[0])?, self.whnf(&args[1])?)
                };
                match binary(prim, &left, &right)? {
                    Some(value) => {
                        trace!("{} {} {} = {}", prim.symbol(), left, right, value);
                        Ok(Step::Rewrote(CTerm::rebuild(Rc::new(value), rest)))
                    }
                    None => Ok(Step::Stuck(CTerm::rebuild(
                        head,
                        [left, right].into_iter().chain(rest),
                    ))),
                }
            }
        }
    }

    fn apply_case(
        &mut self,
        shapes: &[Shape],
        head: Rc<CTerm>,
        args: Vec<Rc<CTerm>>,
    ) -> Result<Step, ReduceError> {
        let needed = 1 + shapes.len();
        if args.len() < needed {
            return Ok(Step::Stuck(CTerm::rebuild(head, args)));
        }

        let subject = self.whnf(&args[0])?;
        for (index, shape) in shapes.iter().enumerate() {
            let mut bindings = Vec::new();
            match self.match_shape(shape, &subject, &mut bindings)? {
                ShapeMatch::Matched => {
                    trace!("case {}: alternative {}", subject, index);
                    let selected = CTerm::rebuild(Rc::clone(&args[1 + index]), bindings);
                    return Ok(Step::Rewrote(CTerm::rebuild(
                        selected,
                        args[needed..].iter().cloned(),
                    )));
                }
                ShapeMatch::Failed => {}
                ShapeMatch::Stuck => {
                    return Ok(Step::Stuck(CTerm::rebuild(
                        head,
                        std::iter::once(subject).chain(args[1..].iter().cloned()),
                    )));
                }
            }
        }

        Err(ReduceError::NoMatchingCase {
            subject: (*subject).clone(),
        })
    }

    fn match_shape(
        &mut self,
        shape: &Shape,
        term: &Rc<CTerm>,
        bindings: &mut Vec<Rc<CTerm>>,
    ) -> Result<ShapeMatch, ReduceError> {
        if let Shape::Bind = shape {
            bindings.push(Rc::clone(term));
            return Ok(ShapeMatch::Matched);
        }

        let value = self.whnf(term)?;
        let (head, args) = value.spine();
        let outcome = match (shape, head) {
            (Shape::Lit(lit), CTerm::Const(constant)) if args.is_empty() => {
                match constant.as_literal() {
                    Some(found) if found == *lit => ShapeMatch::Matched,
                    Some(_) => ShapeMatch::Failed,
                    None if matches!(constant, Constant::Ctor(_)) => ShapeMatch::Failed,
                    None => ShapeMatch::Stuck,
                }
            }
            (Shape::Lit(_), CTerm::Const(Constant::Ctor(_))) => ShapeMatch::Failed,

            (Shape::Ctor(name, subs), CTerm::Const(Constant::Ctor(ctor))) => {
                if ctor != name || args.len() != subs.len() {
                    return Ok(ShapeMatch::Failed);
                }
                for (sub, arg) in subs.iter().zip(args) {
                    match self.match_shape(sub, arg, bindings)? {
                        ShapeMatch::Matched => {}
                        other => return Ok(other),
                    }
                }
                ShapeMatch::Matched
            }
            (Shape::Ctor(..), CTerm::Const(Constant::Int(_) | Constant::Bool(_))) => {
                ShapeMatch::Failed
            }

            _ => ShapeMatch::Stuck,
        };
        Ok(outcome)
    }
}

/// Split a spine into a shared head and shared arguments.
fn unwind(term: &Rc<CTerm>) -> (Rc<CTerm>, Vec<Rc<CTerm>>) {
    let mut head = Rc::clone(term);
    let mut args = Vec::new();
    while let CTerm::App(func, arg) = head.as_ref() {
        args.push(Rc::clone(arg));
        let func = Rc::clone(func);
        head = func;
    }
    args.reverse();
    (head, args)
}

fn app(func: &Rc<CTerm>, arg: &Rc<CTerm>) -> Rc<CTerm> {
    Rc::new(CTerm::App(Rc::clone(func), Rc::clone(arg)))
}

fn rewrite_comb(comb: Comb, head: Rc<CTerm>, args: Vec<Rc<CTerm>>) -> Step {
    let needed = match comb {
        Comb::I => 1,
        Comb::K | Comb::Y => 2,
        Comb::S | Comb::B | Comb::C => 3,
    };
    if args.len() < needed {
        return Step::Stuck(CTerm::rebuild(head, args));
    }

    let reduced = match comb {
        Comb::I | Comb::K => Rc::clone(&args[0]),
        Comb::S => app(&app(&args[0], &args[2]), &app(&args[1], &args[2])),
        Comb::C => app(&app(&args[0], &args[2]), &args[1]),
        Comb::B => app(&args[0], &app(&args[1], &args[2])),
        Comb::Y => app(&app(&args[0], &app(&head, &args[0])), &args[1]),
    };
    trace!("{}: {}", comb.name(), reduced);
    Step::Rewrote(CTerm::rebuild(reduced, args[needed..].iter().cloned()))
}

/// Compute a saturated binary primitive over forced operands, or `None` when
/// the operands are not literals of the right kind.
fn binary(prim: Primitive, left: &Rc<CTerm>, right: &Rc<CTerm>) -> Result<Option<CTerm>, ReduceError> {
    let expr = || CTerm::apply(CTerm::prim(prim), [(**left).clone(), (**right).clone()]);

    let value = match (prim, left.as_literal(), right.as_literal()) {
        (Primitive::Eq, _, _) if left.is_data() && right.is_data() => CTerm::bool(left == right),

        (Primitive::LtEq, Some(Literal::Int(a)), Some(Literal::Int(b))) => CTerm::bool(a <= b),
        (Primitive::LtEq, Some(Literal::Bool(a)), Some(Literal::Bool(b))) => CTerm::bool(a <= b),

        (Primitive::And, Some(Literal::Bool(a)), Some(Literal::Bool(b))) => CTerm::bool(a && b),
        (Primitive::Or, Some(Literal::Bool(a)), Some(Literal::Bool(b))) => CTerm::bool(a || b),

        (Primitive::Div, Some(Literal::Int(_)), Some(Literal::Int(0))) => {
            return Err(ReduceError::DivisionByZero { expr: expr() })
        }

        (
            Primitive::Add | Primitive::Sub | Primitive::Mul | Primitive::Div,
            Some(Literal::Int(a)),
            Some(Literal::Int(b)),
        ) => {
            let value = match prim {
                Primitive::Add => a.checked_add(b),
                Primitive::Sub => a.checked_sub(b),
                Primitive::Mul => a.checked_mul(b),
                _ => a.checked_div(b),
            };
            match value {
                Some(value) => CTerm::int(value),
                None => return Err(ReduceError::Overflow { expr: expr() }),
            }
        }

        _ => return Ok(None),
    };

    Ok(Some(value))
}
