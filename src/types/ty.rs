use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

/// A unification variable.
///
/// Identity is the `id` alone; `name` is only a rendering hint for declared
/// type parameters and normalized types.
#[derive(Debug, Clone, Eq)]
pub struct TypeVar {
    pub id: usize,
    pub name: Option<String>,
}

impl TypeVar {
    pub fn new(id: usize) -> Self {
        Self { id, name: None }
    }

    pub fn with_name(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

impl PartialEq for TypeVar {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for TypeVar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

pub const INT: &str = "Int";
pub const BOOL: &str = "Bool";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Var(TypeVar),
    Const(String),
    Func(Box<Type>, Box<Type>),
    Prod(Box<Type>, Box<Type>),
    /// Type-level application, e.g. `f a` for an abstract `f`.
    App(Box<Type>, Box<Type>),
    /// An instance of a registered algebraic type, e.g. `list Int`.
    Adt { name: String, params: Vec<Type> },
}

impl Type {
    pub fn int() -> Self {
        Type::Const(INT.to_string())
    }

    pub fn bool() -> Self {
        Type::Const(BOOL.to_string())
    }

    pub fn var(var: &TypeVar) -> Self {
        Type::Var(var.clone())
    }

    pub fn func(t1: Type, t2: Type) -> Self {
        Type::Func(Box::new(t1), Box::new(t2))
    }

    /// Curried function type `a1 -> a2 -> ... -> result`.
    pub fn curried(args: impl IntoIterator<Item = Type>, result: Type) -> Self {
        let args: Vec<Type> = args.into_iter().collect();
        args.into_iter().rev().fold(result, |acc, arg| Type::func(arg, acc))
    }

    pub fn prod(t1: Type, t2: Type) -> Self {
        Type::Prod(Box::new(t1), Box::new(t2))
    }

    pub fn app(target: Type, argument: Type) -> Self {
        Type::App(Box::new(target), Box::new(argument))
    }

    pub fn adt(name: impl Into<String>, params: Vec<Type>) -> Self {
        Type::Adt {
            name: name.into(),
            params,
        }
    }

    /// Name of the outermost type constructor, if it has one.
    pub fn head_name(&self) -> Option<&str> {
        match self {
            Type::Const(name) | Type::Adt { name, .. } => Some(name),
            Type::App(target, _) => target.head_name(),
            _ => None,
        }
    }

    pub fn free_type_vars(&self) -> HashSet<TypeVar> {
        let mut set = HashSet::new();
        self.visit_vars(&mut |v| {
            set.insert(v.clone());
        });
        set
    }

    pub fn contains_var(&self, var: &TypeVar) -> bool {
        match self {
            Type::Const(_) => false,
            Type::Var(v) => v == var,
            Type::Func(t1, t2) | Type::Prod(t1, t2) | Type::App(t1, t2) => {
                t1.contains_var(var) || t2.contains_var(var)
            }
            Type::Adt { params, .. } => params.iter().any(|p| p.contains_var(var)),
        }
    }

    pub fn max_var_id(&self) -> Option<usize> {
        let mut max = None;
        self.visit_vars(&mut |v| max = max.max(Some(v.id)));
        max
    }

    fn visit_vars(&self, f: &mut impl FnMut(&TypeVar)) {
        match self {
            Type::Const(_) => {}
            Type::Var(v) => f(v),
            Type::Func(t1, t2) | Type::Prod(t1, t2) | Type::App(t1, t2) => {
                t1.visit_vars(f);
                t2.visit_vars(f);
            }
            Type::Adt { params, .. } => params.iter().for_each(|p| p.visit_vars(f)),
        }
    }

    /// Replace variables according to `mapping`, leaving others untouched.
    pub fn rename_vars(&self, mapping: &HashMap<TypeVar, Type>) -> Type {
        match self {
            Type::Const(_) => self.clone(),
            Type::Var(v) => mapping.get(v).cloned().unwrap_or_else(|| self.clone()),
            Type::Func(t1, t2) => Type::func(t1.rename_vars(mapping), t2.rename_vars(mapping)),
            Type::Prod(t1, t2) => Type::prod(t1.rename_vars(mapping), t2.rename_vars(mapping)),
            Type::App(t1, t2) => Type::app(t1.rename_vars(mapping), t2.rename_vars(mapping)),
            Type::Adt { name, params } => Type::Adt {
                name: name.clone(),
                params: params.iter().map(|p| p.rename_vars(mapping)).collect(),
            },
        }
    }

    /// Rename type variables to `'a`, `'b`, ... in order of first occurrence.
    ///
    /// Two principal types that differ only in variable ids normalize to
    /// equal values.
    pub fn normalize(&self) -> Type {
        let mut order: Vec<TypeVar> = Vec::new();
        self.visit_vars(&mut |v| {
            if !order.contains(v) {
                order.push(v.clone());
            }
        });
        let mapping = order
            .into_iter()
            .enumerate()
            .map(|(index, v)| (v, Type::Var(TypeVar::with_name(index, letter_name(index)))))
            .collect();
        self.rename_vars(&mapping)
    }
}

fn letter_name(index: usize) -> String {
    let letter = (b'a' + (index % 26) as u8) as char;
    match index / 26 {
        0 => letter.to_string(),
        round => format!("{}{}", letter, round),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeScheme {
    pub vars: Vec<TypeVar>,
    pub ty: Type,
}

impl TypeScheme {
    pub fn monomorphic(ty: Type) -> Self {
        TypeScheme {
            vars: Vec::new(),
            ty,
        }
    }

    pub fn polymorphic(vars: Vec<TypeVar>, ty: Type) -> Self {
        TypeScheme { vars, ty }
    }
}
