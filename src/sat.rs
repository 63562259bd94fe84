//! Satisfying-assignment queries.

use std::collections::HashMap;

use num_bigint::BigUint;

use crate::engine::Engine;
use crate::reference::Ref;

impl Engine {
    /// Extract one satisfying assignment as `(variable, value)` literals,
    /// or `None` for the unsatisfiable diagram. Variables skipped along the
    /// path are unconstrained and omitted.
    pub fn one_sat(&self, node: Ref) -> Option<Vec<(u32, bool)>> {
        if self.is_zero(node) {
            return None;
        }

        let mut literals = Vec::new();
        let mut current = node;
        while !self.is_terminal(current) {
            let v = self.variable(current);
            let high = self.high(current);
            // Canonicity guarantees every internal node is satisfiable,
            // so at least one of the two branches is non-zero.
            if self.is_zero(high) {
                literals.push((v, false));
                current = self.low(current);
            } else {
                literals.push((v, true));
                current = high;
            }
        }
        Some(literals)
    }

    /// Number of satisfying assignments over the variables `0..num_vars`,
    /// which must include every variable of the diagram.
    pub fn sat_count(&self, node: Ref, num_vars: u32) -> BigUint {
        let all = BigUint::from(2u32).pow(num_vars);
        let mut counts = HashMap::new();
        self.sat_count_rec(node, num_vars, &all, &mut counts)
    }

    fn sat_count_rec(
        &self,
        node: Ref,
        num_vars: u32,
        all: &BigUint,
        counts: &mut HashMap<Ref, BigUint>,
    ) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        }
        if self.is_one(node) {
            return all.clone();
        }
        if let Some(count) = counts.get(&node) {
            return count.clone();
        }

        let v = self.variable(node);
        assert!(v < num_vars, "Variable {} is not below num_vars = {}", v, num_vars);

        // Each cofactor is independent of the branch variable, so its
        // count over the full universe is even and the halving is exact.
        let count: BigUint = (self.sat_count_rec(self.low(node), num_vars, all, counts)
            + self.sat_count_rec(self.high(node), num_vars, all, counts))
            >> 1;
        counts.insert(node, count.clone());
        count
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use test_log::test;

    use crate::engine::Engine;

    #[test]
    fn test_sat_count_terminals() {
        let engine = Engine::default();

        assert_eq!(engine.sat_count(engine.zero(), 3), BigUint::from(0u32));
        assert_eq!(engine.sat_count(engine.one(), 3), BigUint::from(8u32));
        assert_eq!(engine.sat_count(engine.one(), 0), BigUint::from(1u32));
    }

    #[test]
    fn test_sat_count_var() {
        let engine = Engine::default();
        engine.declare_vars(3);

        let x0 = engine.mk_var(0);
        assert_eq!(engine.sat_count(x0, 3), BigUint::from(4u32));
        assert_eq!(engine.sat_count(x0, 1), BigUint::from(1u32));
    }

    #[test]
    fn test_sat_count_formulas() {
        let engine = Engine::default();
        engine.declare_vars(3);

        let cube = engine.mk_cube([(0, true), (1, false)]);
        assert_eq!(engine.sat_count(cube, 3), BigUint::from(2u32));

        let clause = engine.mk_clause([(0, true), (1, true), (2, true)]);
        assert_eq!(engine.sat_count(clause, 3), BigUint::from(7u32));

        let or = engine.apply_or(engine.mk_var(0), engine.mk_var(1));
        assert_eq!(engine.sat_count(or, 3), BigUint::from(6u32));
    }

    #[test]
    #[should_panic(expected = "is not below num_vars")]
    fn test_sat_count_universe_too_small() {
        let engine = Engine::default();
        engine.declare_vars(3);
        let x2 = engine.mk_var(2);
        engine.sat_count(x2, 2);
    }

    #[test]
    fn test_one_sat() {
        let engine = Engine::default();
        engine.declare_vars(3);

        assert_eq!(engine.one_sat(engine.zero()), None);
        assert_eq!(engine.one_sat(engine.one()), Some(vec![]));

        let cube = engine.mk_cube([(0, true), (2, false)]);
        let literals = engine.one_sat(cube).unwrap();
        assert_eq!(literals, vec![(0, true), (2, false)]);

        // The extracted assignment satisfies the diagram.
        let mut assignment = [false; 3];
        for (v, value) in literals {
            assignment[v as usize] = value;
        }
        assert!(engine.evaluate(cube, &assignment));
    }
}
