use log::{debug, trace};

use super::error::TranslateError;
use super::intermediate::{to_intermediate, Intermediate};
use super::{CTerm, Comb, Constant, Primitive, Shape};
use crate::term::Term;

/// Translation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Use `C` and `B` when the abstracted variable occurs on one side of an
    /// application only. Without them every such case falls back to `S`.
    pub optimize: bool,
}

impl TranslateOptions {
    pub fn optimized() -> Self {
        TranslateOptions { optimize: true }
    }

    pub fn unoptimized() -> Self {
        TranslateOptions { optimize: false }
    }
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self::optimized()
    }
}

/// Translate `term` with the optimizations enabled.
pub fn translate(term: &Term) -> Result<CTerm, TranslateError> {
    translate_with(term, &TranslateOptions::default())
}

pub fn translate_with(term: &Term, options: &TranslateOptions) -> Result<CTerm, TranslateError> {
    debug!("translate {} (optimize: {})", term, options.optimize);
    let translator = Translator::new(*options);
    let ir = translator.eliminate_abstractions(to_intermediate(term))?;
    let result = into_cterm(ir)?;
    debug!("translated to {} (size {})", result, result.size());
    Ok(result)
}

/// Bracket abstraction over the intermediate form.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    options: TranslateOptions,
}

impl Translator {
    pub fn new(options: TranslateOptions) -> Self {
        Translator { options }
    }

    /// Rewrite `ir` bottom-up until it is applicative.
    ///
    /// Operators, conditionals and matches become primitive constants applied
    /// to their operands; `rec f. e` becomes `Y` applied to the abstraction of
    /// `f` over `e`. Every abstraction is eliminated after its body, so the
    /// body handed to [`Translator::abstract_var`] is always applicative.
    pub fn eliminate_abstractions(&self, ir: Intermediate) -> Result<Intermediate, TranslateError> {
        match ir {
            Intermediate::Var(_) | Intermediate::Const(_) | Intermediate::Comb(_) => Ok(ir),

            Intermediate::App(func, arg) => Ok(Intermediate::app(
                self.eliminate_abstractions(*func)?,
                self.eliminate_abstractions(*arg)?,
            )),

            Intermediate::Abs(param, body) => {
                let body = self.eliminate_abstractions(*body)?;
                self.abstract_var(&param, body)
            }

            Intermediate::BinOp(op, left, right) => Ok(apply_prim(
                Primitive::from(op),
                vec![
                    self.eliminate_abstractions(*left)?,
                    self.eliminate_abstractions(*right)?,
                ],
            )),

            Intermediate::UnOp(op, operand) => Ok(apply_prim(
                Primitive::from(op),
                vec![self.eliminate_abstractions(*operand)?],
            )),

            Intermediate::If(condition, then_ir, else_ir) => Ok(apply_prim(
                Primitive::If,
                vec![
                    self.eliminate_abstractions(*condition)?,
                    self.eliminate_abstractions(*then_ir)?,
                    self.eliminate_abstractions(*else_ir)?,
                ],
            )),

            Intermediate::Rec(name, body) => {
                let body = self.eliminate_abstractions(*body)?;
                let function = self.abstract_var(&name, body)?;
                Ok(Intermediate::app(Intermediate::comb(Comb::Y), function))
            }

            Intermediate::Match(subject, cases) => {
                let shapes: Vec<Shape> = cases.iter().map(|(pattern, _)| Shape::from(pattern)).collect();
                let head = Intermediate::Const(Constant::Case(shapes.into()));
                let mut result = Intermediate::app(head, self.eliminate_abstractions(*subject)?);
                for (pattern, body) in cases {
                    let mut function = self.eliminate_abstractions(body)?;
                    for var in pattern.vars().iter().rev() {
                        function = self.abstract_var(var, function)?;
                    }
                    result = Intermediate::app(result, function);
                }
                Ok(result)
            }
        }
    }

    /// `T[\x. body]` for an applicative `body`.
    ///
    /// ```text
    /// T[\x. x]        = I
    /// T[\x. E]        = K E                     x not free in E
    /// T[\x. E1 E2]    = S T[\x.E1] T[\x.E2]     x free in both
    /// T[\x. E1 E2]    = C T[\x.E1] E2           x free in E1 only (optimized)
    /// T[\x. E1 E2]    = B E1 T[\x.E2]           x free in E2 only (optimized)
    /// ```
    pub fn abstract_var(&self, x: &str, body: Intermediate) -> Result<Intermediate, TranslateError> {
        if !body.is_applicative() {
            return Err(TranslateError::Residual { kind: body.kind() });
        }

        if matches!(&body, Intermediate::Var(name) if name == x) {
            trace!("abstract {}: I", x);
            return Ok(Intermediate::comb(Comb::I));
        }

        if !body.is_free(x) {
            trace!("abstract {}: K", x);
            return Ok(Intermediate::app(Intermediate::comb(Comb::K), body));
        }

        let (func, arg) = match body {
            Intermediate::App(func, arg) => (func, arg),
            other => return Err(TranslateError::Residual { kind: other.kind() }),
        };

        let in_func = func.is_free(x);
        let in_arg = arg.is_free(x);

        let (comb, left, right) = if (in_func && in_arg) || !self.options.optimize {
            (
                Comb::S,
                self.abstract_var(x, *func)?,
                self.abstract_var(x, *arg)?,
            )
        } else if in_func {
            (Comb::C, self.abstract_var(x, *func)?, *arg)
        } else {
            (Comb::B, *func, self.abstract_var(x, *arg)?)
        };

        trace!("abstract {}: {}", x, comb.name());
        Ok(Intermediate::app(
            Intermediate::app(Intermediate::comb(comb), left),
            right,
        ))
    }
}

fn apply_prim(prim: Primitive, args: Vec<Intermediate>) -> Intermediate {
    args.into_iter().fold(
        Intermediate::Const(Constant::Prim(prim)),
        Intermediate::app,
    )
}

/// Convert an applicative intermediate tree into a combinator term.
pub fn into_cterm(ir: Intermediate) -> Result<CTerm, TranslateError> {
    match ir {
        Intermediate::Var(name) => Ok(CTerm::Var(name)),
        Intermediate::Const(constant) => Ok(CTerm::Const(constant)),
        Intermediate::Comb(comb) => Ok(CTerm::Comb(comb)),
        Intermediate::App(func, arg) => Ok(CTerm::app(into_cterm(*func)?, into_cterm(*arg)?)),
        other => Err(TranslateError::Residual { kind: other.kind() }),
    }
}
