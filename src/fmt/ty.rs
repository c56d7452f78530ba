//! Rendering of types and type schemes.
//!
//! `->` associates to the right and binds loosest, then `*`, then type
//! application:
//!
//! ```text
//! ('a -> 'b) -> list 'a -> list 'b
//! Int * Bool -> Int
//! list (list Int)
//! ```

use std::fmt;

use crate::types::{Type, TypeScheme, TypeVar};

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "'{}", name),
            None => write!(f, "'t{}", self.id),
        }
    }
}

impl Type {
    /// Render at the given precedence: 0 for a function position, 1 for a
    /// product operand, 2 for a type argument.
    fn pretty(&self, precedence: u8) -> String {
        match self {
            Type::Var(var) => var.to_string(),
            Type::Const(name) => name.clone(),
            Type::Adt { name, params } if params.is_empty() => name.clone(),
            Type::Func(t1, t2) => {
                let rendered = format!("{} -> {}", t1.pretty(1), t2.pretty(0));
                wrap(rendered, precedence > 0)
            }
            Type::Prod(t1, t2) => {
                let rendered = format!("{} * {}", t1.pretty(2), t2.pretty(2));
                wrap(rendered, precedence > 1)
            }
            Type::App(target, argument) => {
                let rendered = format!("{} {}", target.pretty(1), argument.pretty(2));
                wrap(rendered, precedence > 1)
            }
            Type::Adt { name, params } => {
                let args: Vec<String> = params.iter().map(|p| p.pretty(2)).collect();
                wrap(format!("{} {}", name, args.join(" ")), precedence > 1)
            }
        }
    }
}

fn wrap(rendered: String, needs_parens: bool) -> String {
    if needs_parens {
        format!("({})", rendered)
    } else {
        rendered
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty(0))
    }
}

impl fmt::Display for TypeScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.vars.is_empty() {
            return write!(f, "{}", self.ty);
        }
        let vars: Vec<String> = self.vars.iter().map(TypeVar::to_string).collect();
        write!(f, "forall {}. {}", vars.join(" "), self.ty)
    }
}
