//! The substitution environment of one type-checking session.
//!
//! Backed by an [`im::HashMap`], so snapshotting the environment before a
//! unification attempt (and restoring it on failure) is a constant-time
//! clone instead of a full copy.

use im::HashMap;

use super::ty::{Type, TypeVar};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution(HashMap<TypeVar, Type>);

impl Substitution {
    pub fn empty() -> Self {
        Substitution(HashMap::new())
    }

    pub fn singleton(var: TypeVar, ty: Type) -> Self {
        Substitution(HashMap::unit(var, ty))
    }

    pub fn get(&self, var: &TypeVar) -> Option<&Type> {
        self.0.get(var)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, var: TypeVar, ty: Type) {
        self.0.insert(var, ty);
    }

    /// Resolve `ty` completely, chasing bound variables through any number
    /// of hops.
    pub fn apply(&self, ty: &Type) -> Type {
        match ty {
            Type::Const(_) => ty.clone(),
            Type::Var(v) => match self.0.get(v) {
                Some(bound) => self.apply(bound),
                None => ty.clone(),
            },
            Type::Func(t1, t2) => Type::func(self.apply(t1), self.apply(t2)),
            Type::Prod(t1, t2) => Type::prod(self.apply(t1), self.apply(t2)),
            Type::App(t1, t2) => Type::app(self.apply(t1), self.apply(t2)),
            Type::Adt { name, params } => Type::Adt {
                name: name.clone(),
                params: params.iter().map(|p| self.apply(p)).collect(),
            },
        }
    }

    /// Replace each bound variable by its binding, one hop only.
    fn apply_once(&self, ty: &Type) -> Type {
        match ty {
            Type::Const(_) => ty.clone(),
            Type::Var(v) => self.0.get(v).cloned().unwrap_or_else(|| ty.clone()),
            Type::Func(t1, t2) => Type::func(self.apply_once(t1), self.apply_once(t2)),
            Type::Prod(t1, t2) => Type::prod(self.apply_once(t1), self.apply_once(t2)),
            Type::App(t1, t2) => Type::app(self.apply_once(t1), self.apply_once(t2)),
            Type::Adt { name, params } => Type::Adt {
                name: name.clone(),
                params: params.iter().map(|p| self.apply_once(p)).collect(),
            },
        }
    }

    /// Re-resolve every binding against the map itself until a fixed point.
    ///
    /// Afterwards no bound value mentions a bound variable, so lookups never
    /// chase chains. Terminates because the occurs check keeps the binding
    /// graph acyclic.
    pub fn close(&mut self) {
        loop {
            let next: HashMap<TypeVar, Type> = self
                .0
                .iter()
                .map(|(var, ty)| (var.clone(), self.apply_once(ty)))
                .collect();
            if next == self.0 {
                return;
            }
            self.0 = next;
        }
    }

    /// True when no bound value still mentions a bound variable.
    pub fn is_resolved(&self) -> bool {
        self.0
            .values()
            .all(|ty| ty.free_type_vars().iter().all(|v| !self.0.contains_key(v)))
    }
}
