
use im::HashMap;

use super::ty::{Type, TypeScheme, TypeVar};

/// Signature of one constructor of an algebraic type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSig {
    pub name: String,
    pub args: Vec<Type>,
}

/// Declaration of a user algebraic type: name, ordered type parameters and
/// constructor signatures. Parameters may occur anywhere in the signatures.
///
/// ```text
/// list a = Nil | Cons a (list a)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDecl {
    pub name: String,
    pub params: Vec<TypeVar>,
    pub constructors: Vec<ConstructorSig>,
}

impl DataDecl {
    pub fn new(name: impl Into<String>, params: Vec<TypeVar>) -> Self {
        DataDecl {
            name: name.into(),
            params,
            constructors: Vec::new(),
        }
    }

    /// Add a constructor (builder style).
    pub fn constructor(mut self, name: impl Into<String>, args: Vec<Type>) -> Self {
        self.constructors.push(ConstructorSig {
            name: name.into(),
            args,
        });
        self
    }

    /// The declared type applied to its own parameters, e.g. `list 'a`.
    pub fn self_type(&self) -> Type {
        Type::adt(self.name.clone(), self.params.iter().map(Type::var).collect())
    }

    pub fn constructor_names(&self) -> Vec<&str> {
        self.constructors.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn find(&self, name: &str) -> Option<&ConstructorSig> {
        self.constructors.iter().find(|c| c.name == name)
    }

    /// Polymorphic type of a constructor:
    /// `Cons : forall a. a -> list a -> list a`.
    pub fn constructor_scheme(&self, sig: &ConstructorSig) -> TypeScheme {
        TypeScheme::polymorphic(
            self.params.clone(),
            Type::curried(sig.args.iter().cloned(), self.self_type()),
        )
    }

    fn max_var_id(&self) -> Option<usize> {
        let declared = self.params.iter().map(|p| p.id).max();
        self.constructors
            .iter()
            .flat_map(|c| c.args.iter())
            .filter_map(Type::max_var_id)
            .fold(declared, |acc, id| acc.max(Some(id)))
    }
}

/// Registry of algebraic types, indexed by type name and by constructor name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constructors {
    types: HashMap<String, DataDecl>,
    owners: HashMap<String, String>,
}

impl Constructors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, decl: DataDecl) {
        for ctor in &decl.constructors {
            self.owners.insert(ctor.name.clone(), decl.name.clone());
        }
        self.types.insert(decl.name.clone(), decl);
    }

    pub fn data_type(&self, type_name: &str) -> Option<&DataDecl> {
        self.types.get(type_name)
    }

    /// The declaration owning `ctor`, together with its signature.
    pub fn lookup(&self, ctor: &str) -> Option<(&DataDecl, &ConstructorSig)> {
        let owner = self.owners.get(ctor)?;
        let decl = self.types.get(owner)?;
        decl.find(ctor).map(|sig| (decl, sig))
    }

    fn max_var_id(&self) -> Option<usize> {
        self.types.values().filter_map(DataDecl::max_var_id).max()
    }
}

/// Initial naming environment for type inference: variable bindings plus the
/// constructor registry. Extending an environment is a cheap persistent
/// update, the original is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeEnv {
    bindings: HashMap<String, TypeScheme>,
    constructors: Constructors,
}

impl TypeEnv {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: Vec<(String, TypeScheme)>) -> Self {
        TypeEnv {
            bindings: bindings.into_iter().collect(),
            constructors: Constructors::new(),
        }
    }

    /// Register an algebraic type (builder style).
    pub fn with_data(mut self, decl: DataDecl) -> Self {
        self.constructors.register(decl);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeScheme> {
        self.bindings.get(name)
    }

    pub fn constructors(&self) -> &Constructors {
        &self.constructors
    }

    pub fn extend(&self, name: String, scheme: TypeScheme) -> TypeEnv {
        TypeEnv {
            bindings: self.bindings.update(name, scheme),
            constructors: self.constructors.clone(),
        }
    }

    pub fn extend_many(&self, bindings: Vec<(String, TypeScheme)>) -> TypeEnv {
        let mut env = self.clone();
        for (name, scheme) in bindings {
            env.bindings.insert(name, scheme);
        }
        env
    }

    /// Largest type-variable id mentioned anywhere in the environment.
    pub fn max_var_id(&self) -> Option<usize> {
        let bound = self
            .bindings
            .values()
            .flat_map(|scheme| {
                scheme
                    .vars
                    .iter()
                    .map(|v| v.id)
                    .chain(scheme.ty.max_var_id())
            })
            .max();
        bound.max(self.constructors.max_var_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_decl() -> DataDecl {
        let a = TypeVar::with_name(0, "a");
        DataDecl::new("list", vec![a.clone()])
            .constructor("Nil", vec![])
            .constructor(
                "Cons",
                vec![Type::var(&a), Type::adt("list", vec![Type::var(&a)])],
            )
    }

    #[test]
    fn test_empty_env() {
        let env = TypeEnv::empty();
        assert!(env.lookup("x").is_none());
    }

    #[test]
    fn test_with_bindings() {
        let env =
            TypeEnv::with_bindings(vec![("x".to_string(), TypeScheme::monomorphic(Type::int()))]);
        assert_eq!(env.lookup("x").unwrap().ty, Type::int());
    }

    #[test]
    fn test_extend_shadows() {
        let env = TypeEnv::empty();
        let env = env.extend("x".to_string(), TypeScheme::monomorphic(Type::int()));
        let env = env.extend("x".to_string(), TypeScheme::monomorphic(Type::bool()));
        assert_eq!(env.lookup("x").unwrap().ty, Type::bool());
    }

    #[test]
    fn test_extend_leaves_original_untouched() {
        let env = TypeEnv::empty();
        let extended = env.extend("x".to_string(), TypeScheme::monomorphic(Type::int()));
        assert!(env.lookup("x").is_none());
        assert!(extended.lookup("x").is_some());
    }

    #[test]
    fn test_extend_many() {
        let env = TypeEnv::empty().extend_many(vec![
            ("x".to_string(), TypeScheme::monomorphic(Type::int())),
            ("y".to_string(), TypeScheme::monomorphic(Type::bool())),
        ]);
        assert_eq!(env.lookup("y").unwrap().ty, Type::bool());
    }

    #[test]
    fn test_constructor_lookup() {
        let env = TypeEnv::empty().with_data(list_decl());
        let (decl, sig) = env.constructors().lookup("Cons").unwrap();
        assert_eq!(decl.name, "list");
        assert_eq!(sig.args.len(), 2);
        assert!(env.constructors().lookup("Just").is_none());
    }

    #[test]
    fn test_constructor_scheme() {
        let decl = list_decl();
        let a = TypeVar::new(0);
        let scheme = decl.constructor_scheme(decl.find("Cons").unwrap());
        let list_a = Type::adt("list", vec![Type::var(&a)]);
        assert_eq!(scheme.vars, vec![a.clone()]);
        assert_eq!(
            scheme.ty,
            Type::curried([Type::var(&a), list_a.clone()], list_a)
        );
    }

    #[test]
    fn test_max_var_id_covers_registry() {
        let env = TypeEnv::with_bindings(vec![(
            "x".to_string(),
            TypeScheme::monomorphic(Type::Var(TypeVar::new(3))),
        )]);
        assert_eq!(env.max_var_id(), Some(3));

        let b = TypeVar::new(8);
        let env = env.with_data(DataDecl::new("box", vec![b.clone()]).constructor("Box", vec![Type::var(&b)]));
        assert_eq!(env.max_var_id(), Some(8));
    }
}
