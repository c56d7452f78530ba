//! Capture-avoiding substitution on terms.
//!
//! `substitute(t, x, v)` replaces the free occurrences of `x` in `t` by `v`.
//! Binders (`\`, `rec`, pattern variables) shadow: nothing below a binder of
//! `x` is touched. When a binder would capture a free variable of `v`, the
//! binder is renamed first:
//!
//! ```text
//! substitute(\y. x y, x, y)  =  \y'0. y y'0
//! ```

use std::collections::{HashMap, HashSet};

use log::trace;

use crate::fresh::Supply;
use crate::term::{Pattern, Term};

/// Replace free occurrences of `name` in `term` by `value`.
pub fn substitute(term: &Term, name: &str, value: &Term, supply: &mut Supply) -> Term {
    let mut replacements = HashMap::new();
    replacements.insert(name.to_string(), value.clone());
    substitute_many(term, &replacements, supply)
}

/// Replace several names at once.
///
/// The replacements are simultaneous: a replacement value is never itself
/// substituted into.
pub fn substitute_many(
    term: &Term,
    replacements: &HashMap<String, Term>,
    supply: &mut Supply,
) -> Term {
    if replacements.is_empty() {
        return term.clone();
    }

    match term {
        Term::Var(name) => replacements
            .get(name)
            .cloned()
            .unwrap_or_else(|| term.clone()),

        Term::Lit(_) | Term::Constructor(_) => term.clone(),

        Term::App(func, arg) => Term::app(
            substitute_many(func, replacements, supply),
            substitute_many(arg, replacements, supply),
        ),

        Term::Abs(param, body) => {
            let (param, body) = under_binder(param, body, replacements, supply);
            Term::Abs(param, Box::new(body))
        }

        Term::Rec(name, body) => {
            let (name, body) = under_binder(name, body, replacements, supply);
            Term::Rec(name, Box::new(body))
        }

        Term::BinOp(op, left, right) => Term::binop(
            *op,
            substitute_many(left, replacements, supply),
            substitute_many(right, replacements, supply),
        ),

        Term::UnOp(op, operand) => {
            Term::UnOp(*op, Box::new(substitute_many(operand, replacements, supply)))
        }

        Term::If(condition, then_term, else_term) => Term::cond(
            substitute_many(condition, replacements, supply),
            substitute_many(then_term, replacements, supply),
            substitute_many(else_term, replacements, supply),
        ),

        Term::Match(subject, cases) => {
            let subject = substitute_many(subject, replacements, supply);
            let cases = cases
                .iter()
                .map(|(pattern, body)| under_pattern(pattern, body, replacements, supply))
                .collect();
            Term::matching(subject, cases)
        }
    }
}

/// Replacements that can actually reach `body` below binders `bound`.
fn live_replacements(
    bound: &[String],
    body: &Term,
    replacements: &HashMap<String, Term>,
) -> HashMap<String, Term> {
    let free = body.free_vars();
    replacements
        .iter()
        .filter(|(name, _)| !bound.contains(name) && free.contains(*name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn replacement_free_vars(replacements: &HashMap<String, Term>) -> HashSet<String> {
    replacements.values().flat_map(Term::free_vars).collect()
}

/// Pick a name for `binder` that no replacement value mentions freely, and
/// rename it throughout `body` if needed. The new name also avoids `taken`,
/// the names of sibling binders.
fn rename_binder(
    binder: &str,
    body: &Term,
    replacements: &HashMap<String, Term>,
    captured: &HashSet<String>,
    taken: &HashSet<String>,
    supply: &mut Supply,
) -> (String, Term) {
    if !captured.contains(binder) {
        return (binder.to_string(), body.clone());
    }

    let mut avoid = captured.clone();
    avoid.extend(body.all_names());
    avoid.extend(replacements.keys().cloned());
    avoid.extend(taken.iter().cloned());
    let fresh = supply.fresh_name(binder, &avoid);
    trace!("rename binder {} to {}", binder, fresh);

    let renamed = substitute(body, binder, &Term::var(fresh.clone()), supply);
    (fresh, renamed)
}

fn under_binder(
    binder: &str,
    body: &Term,
    replacements: &HashMap<String, Term>,
    supply: &mut Supply,
) -> (String, Term) {
    let live = live_replacements(&[binder.to_string()], body, replacements);
    if live.is_empty() {
        return (binder.to_string(), body.clone());
    }

    let captured = replacement_free_vars(&live);
    let (binder, body) = rename_binder(binder, body, &live, &captured, &HashSet::new(), supply);
    (binder, substitute_many(&body, &live, supply))
}

fn under_pattern(
    pattern: &Pattern,
    body: &Term,
    replacements: &HashMap<String, Term>,
    supply: &mut Supply,
) -> (Pattern, Term) {
    let bound = pattern.vars();
    let live = live_replacements(&bound, body, replacements);
    if live.is_empty() {
        return (pattern.clone(), body.clone());
    }

    let captured = replacement_free_vars(&live);
    let mut taken: HashSet<String> = bound.iter().cloned().collect();
    let mut pattern = pattern.clone();
    let mut body = body.clone();
    for var in bound {
        let (fresh, renamed) = rename_binder(&var, &body, &live, &captured, &taken, supply);
        if fresh != var {
            pattern = pattern.rename(&var, &fresh);
            body = renamed;
            taken.insert(fresh);
        }
    }
    let body = substitute_many(&body, &live, supply);
    (pattern, body)
}
