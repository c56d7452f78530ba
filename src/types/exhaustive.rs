//! Exhaustiveness of `match` over algebraic types.
//!
//! Only the top level of each pattern counts: a match is exhaustive when one
//! of its cases is a bare variable, or when the constructor patterns name
//! every constructor registered for the subject's type. Nested
//! sub-patterns are not inspected.

use std::collections::HashSet;

use log::debug;

use super::env::Constructors;
use super::error::TypeError;
use super::ty::Type;
use crate::term::{Pattern, Term};

/// Check that `cases` cover every constructor of `subject_ty`.
///
/// Subjects whose type is not a registered algebraic type (integers,
/// booleans, unresolved variables) are not checked.
pub fn check_exhaustive(
    constructors: &Constructors,
    subject_ty: &Type,
    cases: &[(Pattern, Term)],
) -> Result<(), TypeError> {
    if cases.iter().any(|(pattern, _)| pattern.is_catch_all()) {
        return Ok(());
    }

    let Some(decl) = subject_ty
        .head_name()
        .and_then(|name| constructors.data_type(name))
    else {
        return Ok(());
    };

    let covered: HashSet<&str> = cases
        .iter()
        .filter_map(|(pattern, _)| match pattern {
            Pattern::Constructor(name, _) => Some(name.as_str()),
            _ => None,
        })
        .collect();

    let missing: Vec<String> = decl
        .constructor_names()
        .into_iter()
        .filter(|name| !covered.contains(name))
        .map(str::to_string)
        .collect();

    debug!(
        "exhaustiveness of match on {}: covered {:?}, missing {:?}",
        decl.name, covered, missing
    );

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TypeError::NonExhaustive {
            type_name: decl.name.clone(),
            missing,
        })
    }
}
