use log::trace;
use thiserror::Error;

use super::subst::Substitution;
use super::ty::{Type, TypeVar};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch { expected: Type, found: Type },
    #[error("occurs check: cannot construct infinite type {} = {ty}", Type::Var(.var.clone()))]
    Occurs { var: TypeVar, ty: Type },
}

/// Owner of one session's substitution environment.
///
/// A `Unifier` is never shared between sessions: every top-level `infer`
/// builds its own. After each successful [`Unifier::unify`] the environment is
/// transitively closed, so [`Substitution::is_resolved`] holds between calls.
#[derive(Debug, Clone, Default)]
pub struct Unifier {
    subst: Substitution,
}

impl Unifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn substitution(&self) -> &Substitution {
        &self.subst
    }

    /// Resolve a type against the current environment.
    pub fn resolve(&self, ty: &Type) -> Type {
        self.subst.apply(ty)
    }

    /// Unify two types, extending the environment so that both resolve to
    /// the same type.
    ///
    /// # Algorithm
    ///
    /// Both sides are resolved first, then:
    ///
    /// ```text
    /// 1. equal after resolution        → success, nothing bound
    /// 2. either side a variable        → bind it (occurs check first)
    /// 3. a1 -> r1  ~  a2 -> r2         → unify a1 a2, then r1 r2
    /// 4. a1 * b1   ~  a2 * b2          → unify a1 a2, then b1 b2
    /// 5. T p1..pn  ~  T q1..qn         → unify p_i q_i left to right
    /// 6. C1 ~ C2 (constants)           → success iff same name
    /// 7. anything else                 → mismatch
    /// ```
    ///
    /// Each recursive step resolves its inputs again, so bindings made while
    /// unifying the inputs of a function type are visible when its outputs
    /// are unified:
    ///
    /// ```text
    /// unify('t0 -> 't0, Int -> 't1):
    ///   't0 := Int
    ///   resolve outputs: Int ~ 't1
    ///   't1 := Int
    /// ```
    ///
    /// On failure the environment is left exactly as it was before the call.
    ///
    /// # Examples
    ///
    /// ```text
    /// unify(Int, Int)                  = Ok(∅)
    /// unify('t0, Int)                  = Ok([t0 := Int])
    /// unify('t0 -> 't1, Int -> Bool)   = Ok([t0 := Int, t1 := Bool])
    /// unify(Int, Bool)                 = Err(Mismatch)
    /// unify('t0, 't0 -> Int)           = Err(Occurs)
    /// ```
    pub fn unify(&mut self, t1: &Type, t2: &Type) -> Result<Substitution, UnifyError> {
        let snapshot = self.subst.clone();
        match self.unify_types(t1, t2) {
            Ok(()) => {
                self.subst.close();
                Ok(self.subst.clone())
            }
            Err(err) => {
                self.subst = snapshot;
                Err(err)
            }
        }
    }

    fn unify_types(&mut self, t1: &Type, t2: &Type) -> Result<(), UnifyError> {
        let t1 = self.resolve(t1);
        let t2 = self.resolve(t2);

        if t1 == t2 {
            return Ok(());
        }

        match (&t1, &t2) {
            (Type::Var(v), other) | (other, Type::Var(v)) => self.unify_variable(v, other),

            (Type::Func(a1, r1), Type::Func(a2, r2)) => {
                self.unify_types(a1, a2)?;
                self.unify_types(r1, r2)
            }

            (Type::Prod(l1, r1), Type::Prod(l2, r2)) => {
                self.unify_types(l1, l2)?;
                self.unify_types(r1, r2)
            }

            (Type::App(f1, x1), Type::App(f2, x2)) => {
                self.unify_types(f1, f2)?;
                self.unify_types(x1, x2)
            }

            (
                Type::Adt {
                    name: n1,
                    params: p1,
                },
                Type::Adt {
                    name: n2,
                    params: p2,
                },
            ) if n1 == n2 && p1.len() == p2.len() => p1
                .iter()
                .zip(p2.iter())
                .try_for_each(|(a, b)| self.unify_types(a, b)),

            // Equal constants were handled above.
            _ => Err(UnifyError::Mismatch {
                expected: t1.clone(),
                found: t2.clone(),
            }),
        }
    }

    fn unify_variable(&mut self, var: &TypeVar, ty: &Type) -> Result<(), UnifyError> {
        if let Some(bound) = self.subst.get(var).cloned() {
            return self.unify_types(&bound, ty);
        }

        let ty = self.resolve(ty);
        if occurs_in(var, &ty) {
            return Err(UnifyError::Occurs {
                var: var.clone(),
                ty,
            });
        }

        trace!("bind {} := {}", Type::Var(var.clone()), ty);
        self.subst.insert(var.clone(), ty);
        Ok(())
    }
}

/// Check if a type variable occurs within an (already resolved) type.
///
/// Binding `'t0 := 't0 -> Int` would describe an infinite type
/// `(('t0 -> Int) -> Int) -> ...`, so unification refuses it.
fn occurs_in(var: &TypeVar, ty: &Type) -> bool {
    ty.contains_var(var)
}
