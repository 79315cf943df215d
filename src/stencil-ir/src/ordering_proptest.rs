// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Property-based tests for the Dimension sort using proptest.
//!
//! Equations are built from accesses whose axes follow one global order
//! (`time`/`t`, `x`/`xi`/`xc`, `y`, `z`), so their relations never
//! contradict each other.  `xc` is derived from `xi`, itself derived from
//! `x`, and implicit Dimensions are drawn in the same global order.  These
//! tests verify that:
//! 1. the order does not depend on how the equation was assembled
//! 2. parents precede their derived Dimensions
//! 3. every access relation is honored
//! 4. every Dimension the equation uses is ordered

use proptest::prelude::*;

use crate::compiler::{access_relation, dimension_sort};
use crate::dimensions::{Dimension, Thickness};
use crate::equation::Equation;
use crate::function::Function;
use crate::symbolics::Expr;

/// One axis of an access: whether the slot is used, how far down the
/// derived chain of the axis it indexes, and a constant shift.
type Slot = (bool, usize, i64);

struct Pool {
    roots: Vec<Dimension>,
    /// per axis, each link derived from the previous one
    chains: Vec<Vec<Dimension>>,
}

impl Pool {
    /// Every Dimension in the global order.
    fn all(&self) -> Vec<Dimension> {
        self.roots
            .iter()
            .zip(self.chains.iter())
            .flat_map(|(root, chain)| std::iter::once(root.clone()).chain(chain.iter().cloned()))
            .collect()
    }
}

fn pool() -> Pool {
    let time = Dimension::time("time");
    let x = Dimension::space("x");
    let t = Dimension::stepping("t", &time);
    let xi = Dimension::sub("xi", &x, Thickness::Middle(1, 1));
    let xc = Dimension::conditional("xc", &xi, 2);
    Pool {
        roots: vec![time, x, Dimension::space("y"), Dimension::space("z")],
        chains: vec![vec![t], vec![xi, xc], vec![], vec![]],
    }
}

fn slot_strategy() -> impl Strategy<Value = Slot> {
    (any::<bool>(), 0usize..3, -2i64..3)
}

fn accesses_strategy() -> impl Strategy<Value = Vec<Vec<Slot>>> {
    prop::collection::vec(prop::collection::vec(slot_strategy(), 4), 1..6)
}

/// Which Dimensions of `Pool::all` are implicit.
fn implicit_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(prop::bool::weighted(0.2), 7)
}

fn build_access(pool: &Pool, n: usize, slots: &[Slot]) -> Expr {
    let mut dims = vec![];
    let mut indices = vec![];
    for (axis, (used, depth, shift)) in slots.iter().enumerate() {
        if !used {
            continue;
        }
        let root = &pool.roots[axis];
        let dim = match depth.checked_sub(1) {
            Some(link) => pool.chains[axis].get(link).unwrap_or(root),
            None => root,
        };
        dims.push(root.clone());
        indices.push(Expr::from(dim) + *shift);
    }
    Function::new(&format!("f{n}"), dims).index(indices)
}

fn build_terms(pool: &Pool, accesses: &[Vec<Slot>]) -> Vec<Expr> {
    accesses
        .iter()
        .enumerate()
        .map(|(n, slots)| build_access(pool, n, slots))
        .collect()
}

fn build_equation(terms: &[Expr]) -> Equation {
    let (lhs, rhs) = match terms.split_first() {
        Some((lhs, rhs)) => (lhs.clone(), Expr::add_all(rhs.iter().cloned())),
        None => (Expr::symbol("s"), Expr::Int(0)),
    };
    Equation::new(lhs, rhs)
}

fn with_implicit(pool: &Pool, eq: Equation, picks: &[bool]) -> Equation {
    let implicit = pool
        .all()
        .into_iter()
        .zip(picks.iter())
        .filter(|(_, picked)| **picked)
        .map(|(dim, _)| dim)
        .collect();
    eq.with_implicit_dims(implicit)
}

proptest! {
    #[test]
    fn sort_is_deterministic(accesses in accesses_strategy()) {
        let pool = pool();
        let terms = build_terms(&pool, &accesses);
        let eq = build_equation(&terms);

        // the same accesses summed in reverse
        let mut reversed = terms.clone();
        if reversed.len() > 1 {
            reversed[1..].reverse();
        }
        let eq2 = build_equation(&reversed);

        let order = dimension_sort(&eq).unwrap();
        prop_assert_eq!(&order, &dimension_sort(&eq).unwrap());
        prop_assert_eq!(&order, &dimension_sort(&eq2).unwrap());
    }

    #[test]
    fn parents_come_first(accesses in accesses_strategy(), picks in implicit_strategy()) {
        let pool = pool();
        let eq = build_equation(&build_terms(&pool, &accesses));
        let eq = with_implicit(&pool, eq, &picks);
        let order = dimension_sort(&eq).unwrap();

        for (pos, dim) in order.iter().enumerate() {
            if let Some(parent) = dim.parent() {
                let parent_pos = order.iter().position(|d| d == parent);
                prop_assert!(parent_pos.is_some_and(|p| p < pos), "{} before {}", parent, dim);
            }
        }
        for dim in eq.implicit_dims.iter() {
            prop_assert!(order.contains(dim));
        }
    }

    #[test]
    fn relations_are_honored(accesses in accesses_strategy()) {
        let pool = pool();
        let eq = build_equation(&build_terms(&pool, &accesses));
        let order = dimension_sort(&eq).unwrap();

        for access in eq.retrieve_indexed(false) {
            let relation = access_relation(&access);
            prop_assert!(order.respects(&relation), "{} violates {:?}", order, relation);
        }
        for relation in order.relations() {
            prop_assert!(order.respects(relation));
        }
    }

    #[test]
    fn every_dimension_is_ordered(accesses in accesses_strategy()) {
        let pool = pool();
        let eq = build_equation(&build_terms(&pool, &accesses));
        let order = dimension_sort(&eq).unwrap();

        for dim in eq.free_dims() {
            prop_assert!(order.contains(&dim));
        }
        for access in eq.retrieve_indexed(true) {
            for dim in access.function().dimensions() {
                prop_assert!(order.contains(dim));
            }
        }
        // no Dimension is listed twice
        let mut names: Vec<&str> = order.iter().map(|d| d.name()).collect();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), order.len());
    }
}
