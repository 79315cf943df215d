// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Deterministic ordering of items under a set of relations.
//!
//! A relation is an ordered tuple `(a, b, c, ...)` meaning `a` precedes `b`
//! and `c`, `b` precedes `c`, and so on.  Items that no relation orders
//! with respect to each other are emitted in ascending `Ord` order, so the
//! result depends only on the *set* of relations and items, never on the
//! order in which they were collected.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Deref;

use smallvec::SmallVec;

use crate::common::{Error, ErrorCode, ErrorKind, Result};

/// An ordered tuple of items whose relative order must be preserved.
pub type Relation<T> = SmallVec<[T; 4]>;

/// Topologically sort `items` together with every element mentioned in
/// `relations`.
///
/// Kahn's algorithm, always taking the smallest ready item next.  Self
/// dependencies (the same item appearing twice in one relation) are
/// ignored.  On a cycle the items lying on one are returned, in ascending
/// order, as the error value.
pub fn topo_sort<'a, T, I, R>(items: I, relations: R) -> std::result::Result<Vec<T>, Vec<T>>
where
    T: Ord + Clone + 'a,
    I: IntoIterator<Item = T>,
    R: IntoIterator<Item = &'a Relation<T>>,
{
    let mut successors: BTreeMap<T, BTreeSet<T>> = BTreeMap::new();
    let mut in_degree: BTreeMap<T, usize> = BTreeMap::new();

    for item in items {
        successors.entry(item.clone()).or_default();
        in_degree.entry(item).or_insert(0);
    }

    for relation in relations {
        for (i, before) in relation.iter().enumerate() {
            successors.entry(before.clone()).or_default();
            in_degree.entry(before.clone()).or_insert(0);
            for after in relation[i + 1..].iter() {
                if after == before {
                    continue;
                }
                let is_new = successors
                    .get_mut(before)
                    .map(|succ| succ.insert(after.clone()))
                    .unwrap_or(false);
                if is_new {
                    *in_degree.entry(after.clone()).or_insert(0) += 1;
                }
            }
        }
    }

    let mut ready: BTreeSet<T> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(item, _)| item.clone())
        .collect();

    let mut result = Vec::with_capacity(in_degree.len());
    while let Some(item) = ready.pop_first() {
        if let Some(succ) = successors.get(&item) {
            for next in succ.iter() {
                if let Some(degree) = in_degree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(next.clone());
                    }
                }
            }
        }
        result.push(item);
    }

    if result.len() != in_degree.len() {
        // items merely downstream of a cycle are left out
        let cycle = in_degree
            .into_iter()
            .filter(|(item, degree)| *degree > 0 && on_cycle(&successors, item))
            .map(|(item, _)| item)
            .collect();
        return Err(cycle);
    }

    Ok(result)
}

fn on_cycle<T: Ord>(successors: &BTreeMap<T, BTreeSet<T>>, start: &T) -> bool {
    let mut seen = BTreeSet::new();
    let mut stack: Vec<&T> = successors.get(start).into_iter().flatten().collect();
    while let Some(item) = stack.pop() {
        if item == start {
            return true;
        }
        if seen.insert(item) {
            stack.extend(successors.get(item).into_iter().flatten());
        }
    }
    false
}

/// A linear order over a set of items together with the relations it honors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialOrderTuple<T: Ord> {
    items: Vec<T>,
    relations: BTreeSet<Relation<T>>,
}

impl<T> PartialOrderTuple<T>
where
    T: Ord + Clone + fmt::Display,
{
    pub fn new<I>(items: I, relations: BTreeSet<Relation<T>>) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        match topo_sort(items, relations.iter()) {
            Ok(items) => Ok(PartialOrderTuple { items, relations }),
            Err(cycle) => {
                let names = cycle
                    .iter()
                    .map(|item| item.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(Error::new(
                    ErrorKind::Ordering,
                    ErrorCode::CircularDependency,
                    Some(format!("cyclic dependency among {names}")),
                ))
            }
        }
    }
}

impl<T: Ord> PartialOrderTuple<T> {
    pub fn relations(&self) -> &BTreeSet<Relation<T>> {
        &self.relations
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// True if the elements of `relation` appear in this order in the same
    /// relative order as in `relation`.
    pub fn respects(&self, relation: &[T]) -> bool {
        let positions = relation
            .iter()
            .map(|item| self.items.iter().position(|x| x == item))
            .collect::<Option<Vec<_>>>();
        match positions {
            Some(positions) => positions.windows(2).all(|w| w[0] <= w[1]),
            None => false,
        }
    }
}

impl<T: Ord> Deref for PartialOrderTuple<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T: Ord + fmt::Display> fmt::Display for PartialOrderTuple<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let items = self
            .items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>();
        write!(f, "({})", items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    fn rel(items: &[&'static str]) -> Relation<&'static str> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_topo_sort_unrelated_items_ascending() {
        let relations: Vec<Relation<&str>> = vec![];
        let order = topo_sort(vec!["y", "x", "z"], relations.iter()).unwrap();
        assert_eq!(vec!["x", "y", "z"], order);
    }

    #[test]
    fn test_topo_sort_honors_relations() {
        let relations = [rel(&["z", "a"]), rel(&["a", "m"])];
        let order = topo_sort(vec!["b"], relations.iter()).unwrap();
        // `b` is unconstrained and is the smallest ready item
        assert_eq!(vec!["b", "z", "a", "m"], order);
    }

    #[test]
    fn test_topo_sort_ignores_self_dependencies() {
        let relations = [rel(&["x", "x"]), rel(&["t", "x"])];
        let order = topo_sort(Vec::<&str>::new(), relations.iter()).unwrap();
        assert_eq!(vec!["t", "x"], order);
    }

    #[test]
    fn test_topo_sort_cycle() {
        let relations = [rel(&["x", "y"]), rel(&["y", "x"]), rel(&["a", "x"])];
        let err = topo_sort(vec!["b"], relations.iter()).unwrap_err();
        assert_eq!(vec!["x", "y"], err);
    }

    #[test]
    fn test_topo_sort_cycle_excludes_downstream() {
        let relations = [rel(&["x", "y"]), rel(&["y", "x"]), rel(&["y", "z"])];
        let err = topo_sort(Vec::<&str>::new(), relations.iter()).unwrap_err();
        assert_eq!(vec!["x", "y"], err);
    }

    #[test]
    fn test_topo_sort_order_independent() {
        let a = [rel(&["t", "x", "y"]), rel(&["x", "y"]), rel(&["t", "u"])];
        let b = [rel(&["t", "u"]), rel(&["x", "y"]), rel(&["t", "x", "y"])];
        assert_eq!(
            topo_sort(vec!["y", "u"], a.iter()),
            topo_sort(vec!["u", "y"], b.iter())
        );
    }

    #[test]
    fn test_partial_order_tuple() {
        let mut relations = BTreeSet::new();
        relations.insert(smallvec!["t", "x"]);
        relations.insert(smallvec!["x", "y"]);
        let order = PartialOrderTuple::new(vec!["y", "x", "t"], relations).unwrap();
        assert_eq!(&["t", "x", "y"], &*order);
        assert!(order.respects(&["t", "y"]));
        assert!(!order.respects(&["y", "t"]));
        assert!(!order.respects(&["t", "q"]));
        assert_eq!("(t, x, y)", format!("{order}"));
    }

    #[test]
    fn test_partial_order_tuple_cycle() {
        let mut relations = BTreeSet::new();
        relations.insert(smallvec!["x", "y"]);
        relations.insert(smallvec!["y", "x"]);
        let err = PartialOrderTuple::new(vec!["x"], relations).unwrap_err();
        assert_eq!(ErrorKind::Ordering, err.kind);
        assert_eq!(ErrorCode::CircularDependency, err.code);
        assert_eq!(
            Some("cyclic dependency among x, y".to_owned()),
            err.get_details()
        );
    }
}
