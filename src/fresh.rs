//! Fresh type-variable ids and term names.
//!
//! Every checking or evaluation session owns one [`Supply`]. It is threaded
//! explicitly instead of living in a global, so two sessions never observe
//! each other's counters and ids stay deterministic per call.

use std::collections::HashSet;

use crate::types::TypeVar;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Supply {
    next: usize,
}

impl Supply {
    pub fn new() -> Self {
        Self::default()
    }

    /// A supply whose first id is `start`.
    pub fn starting_at(start: usize) -> Self {
        Supply { next: start }
    }

    fn bump(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn fresh_var(&mut self) -> TypeVar {
        TypeVar::new(self.bump())
    }

    /// Mint a name derived from `base` that is not contained in `avoid`.
    pub fn fresh_name(&mut self, base: &str, avoid: &HashSet<String>) -> String {
        let stem = base.split('\'').next().unwrap_or(base);
        loop {
            let candidate = format!("{}'{}", stem, self.bump());
            if !avoid.contains(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_var_uniqueness() {
        let mut supply = Supply::new();
        let v1 = supply.fresh_var();
        let v2 = supply.fresh_var();
        let v3 = supply.fresh_var();

        assert_ne!(v1, v2);
        assert_ne!(v2, v3);
        assert_ne!(v1, v3);
    }

    #[test]
    fn test_starting_at() {
        let mut supply = Supply::starting_at(10);
        assert_eq!(supply.fresh_var().id, 10);
        assert_eq!(supply.fresh_var().id, 11);
    }

    #[test]
    fn test_fresh_name_avoids_taken_names() {
        let mut supply = Supply::new();
        let avoid: HashSet<String> = ["x'0".to_string(), "x'1".to_string()].into_iter().collect();
        assert_eq!(supply.fresh_name("x", &avoid), "x'2");
    }

    #[test]
    fn test_fresh_name_strips_previous_suffix() {
        let mut supply = Supply::starting_at(7);
        assert_eq!(supply.fresh_name("y'3", &HashSet::new()), "y'7");
    }
}
