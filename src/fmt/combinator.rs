//! Rendering of combinator terms.
//!
//! Every application spine is printed in full parentheses with its head
//! first, so the printed form mirrors the reducer's view of the term:
//!
//! ```text
//! (B f (B g I))
//! (C (B + I) 1)
//! (case{Nil | Cons _ _} xs 0 (B K I))
//! ```

use std::fmt::{self, Display};

use crate::combinator::{CTerm, Comb, Constant, Primitive, Shape};

impl Display for Comb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_shape(self, f, false)
    }
}

fn format_shape(shape: &Shape, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
    match shape {
        Shape::Bind => write!(f, "_"),
        Shape::Lit(lit) => write!(f, "{}", lit),
        Shape::Ctor(name, subs) if subs.is_empty() => write!(f, "{}", name),
        Shape::Ctor(name, subs) => {
            if nested {
                write!(f, "(")?;
            }
            write!(f, "{}", name)?;
            for sub in subs {
                write!(f, " ")?;
                format_shape(sub, f, true)?;
            }
            if nested {
                write!(f, ")")?;
            }
            Ok(())
        }
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(value) => write!(f, "{}", value),
            Constant::Bool(true) => write!(f, "True"),
            Constant::Bool(false) => write!(f, "False"),
            Constant::Prim(prim) => write!(f, "{}", prim),
            Constant::Ctor(name) => write!(f, "{}", name),
            Constant::Case(shapes) => {
                let rendered: Vec<String> = shapes.iter().map(Shape::to_string).collect();
                write!(f, "case{{{}}}", rendered.join(" | "))
            }
        }
    }
}

impl Display for CTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (head, args) = self.spine();
        if args.is_empty() {
            return match head {
                CTerm::Var(name) => write!(f, "{}", name),
                CTerm::Const(constant) => write!(f, "{}", constant),
                CTerm::Comb(comb) => write!(f, "{}", comb),
                CTerm::App(..) => unreachable!("spine head is never an application"),
            };
        }

        write!(f, "({}", head)?;
        for arg in args {
            write!(f, " {}", arg)?;
        }
        write!(f, ")")
    }
}
