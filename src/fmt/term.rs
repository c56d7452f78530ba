//! Pretty printer for terms and patterns.
//!
//! Precedence is passed down while printing and never stored in the tree.
//! From loosest to tightest:
//!
//! ```text
//! 0  \x. e   rec f. e   if .. then .. else ..   match .. with ..
//! 1  or
//! 2  and
//! 3  =  <=
//! 4  +  -
//! 5  *  /
//! 6  not e
//! 7  f a            (left associative)
//! 8  x  42  True  Cons
//! ```

use std::fmt::{self, Display};

use crate::term::{BinOpKind, Literal, Pattern, Term, UnaryOpKind};

const APP_PREC: u8 = 7;
const ATOM_PREC: u8 = 8;

struct Formatter {
    buffer: String,
}

impl Formatter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn finish(self) -> String {
        self.buffer
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(value) => write!(f, "{}", value),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_term(self, &mut formatter, 0);
        write!(f, "{}", formatter.finish())
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_pattern(self, &mut formatter, false);
        write!(f, "{}", formatter.finish())
    }
}

fn format_term(term: &Term, fmt: &mut Formatter, precedence: u8) {
    match term {
        Term::Var(name) | Term::Constructor(name) => fmt.write_str(name),
        Term::Lit(lit) => format_literal(*lit, fmt, precedence),
        Term::App(func, arg) => {
            parenthesize(fmt, APP_PREC < precedence, |fmt| {
                format_term(func, fmt, APP_PREC);
                fmt.write_str(" ");
                format_term(arg, fmt, ATOM_PREC);
            });
        }
        Term::Abs(param, body) => {
            parenthesize(fmt, precedence > 0, |fmt| {
                fmt.write_str("\\");
                fmt.write_str(param);
                fmt.write_str(". ");
                format_term(body, fmt, 0);
            });
        }
        Term::Rec(name, body) => {
            parenthesize(fmt, precedence > 0, |fmt| {
                fmt.write_str("rec ");
                fmt.write_str(name);
                fmt.write_str(". ");
                format_term(body, fmt, 0);
            });
        }
        Term::BinOp(op, left, right) => {
            let op_prec = binop_precedence(*op);
            parenthesize(fmt, op_prec < precedence, |fmt| {
                format_term(left, fmt, op_prec);
                fmt.write_str(" ");
                fmt.write_str(op.symbol());
                fmt.write_str(" ");
                format_term(right, fmt, op_prec + 1);
            });
        }
        Term::UnOp(op, operand) => {
            let op_prec = unop_precedence(*op);
            parenthesize(fmt, op_prec < precedence, |fmt| {
                fmt.write_str(op.symbol());
                fmt.write_str(" ");
                format_term(operand, fmt, APP_PREC);
            });
        }
        Term::If(condition, then_term, else_term) => {
            parenthesize(fmt, precedence > 0, |fmt| {
                fmt.write_str("if ");
                format_term(condition, fmt, 0);
                fmt.write_str(" then ");
                format_term(then_term, fmt, 0);
                fmt.write_str(" else ");
                format_term(else_term, fmt, 0);
            });
        }
        Term::Match(subject, cases) => {
            parenthesize(fmt, precedence > 0, |fmt| {
                fmt.write_str("match ");
                format_term(subject, fmt, 0);
                fmt.write_str(" with");
                for (index, (pattern, body)) in cases.iter().enumerate() {
                    fmt.write_str(" | ");
                    format_pattern(pattern, fmt, false);
                    fmt.write_str(" -> ");
                    // A binder in a non-final case would swallow the cases after it.
                    let body_prec = if index + 1 < cases.len() { 1 } else { 0 };
                    format_term(body, fmt, body_prec);
                }
            });
        }
    }
}

fn format_literal(lit: Literal, fmt: &mut Formatter, precedence: u8) {
    let negative = matches!(lit, Literal::Int(value) if value < 0);
    parenthesize(fmt, negative && precedence > unop_precedence(UnaryOpKind::Not), |fmt| {
        fmt.write_str(&lit.to_string());
    });
}

fn format_pattern(pattern: &Pattern, fmt: &mut Formatter, nested: bool) {
    match pattern {
        Pattern::Var(name) => fmt.write_str(name),
        Pattern::Const(lit) => format_literal(*lit, fmt, if nested { ATOM_PREC } else { 0 }),
        Pattern::Constructor(name, subpatterns) if subpatterns.is_empty() => fmt.write_str(name),
        Pattern::Constructor(name, subpatterns) => {
            parenthesize(fmt, nested, |fmt| {
                fmt.write_str(name);
                for sub in subpatterns {
                    fmt.write_str(" ");
                    format_pattern(sub, fmt, true);
                }
            });
        }
    }
}

fn parenthesize(fmt: &mut Formatter, needs_parens: bool, body: impl FnOnce(&mut Formatter)) {
    if needs_parens {
        fmt.write_str("(");
    }
    body(fmt);
    if needs_parens {
        fmt.write_str(")");
    }
}

fn binop_precedence(kind: BinOpKind) -> u8 {
    match kind {
        BinOpKind::Or => 1,
        BinOpKind::And => 2,
        BinOpKind::Eq | BinOpKind::LtEq => 3,
        BinOpKind::Add | BinOpKind::Sub => 4,
        BinOpKind::Mul | BinOpKind::Div => 5,
    }
}

fn unop_precedence(kind: UnaryOpKind) -> u8 {
    match kind {
        UnaryOpKind::Not => 6,
    }
}
