pub mod env;
pub mod error;
pub mod exhaustive;
pub mod infer;
pub mod subst;
pub mod ty;
pub mod unify;

pub use env::{ConstructorSig, Constructors, DataDecl, TypeEnv};
pub use error::{Operand, TypeError};
pub use infer::{infer, Checker};
pub use subst::Substitution;
pub use ty::{Type, TypeScheme, TypeVar};
pub use unify::{UnifyError, Unifier};
