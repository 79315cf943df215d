// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Canonical ordering of the Dimensions of an equation.
//!
//! Every access `f[i0, i1, ...]` implies that the Dimensions it indexes
//! with are iterated in that order.  Those relations, together with
//! parent-before-child and the same constraints lifted to root
//! Dimensions, are combined into a single deterministic linear order.

use std::collections::BTreeSet;

use smallvec::smallvec;
use stencil_core::PartialOrderTuple;
use tracing::debug;

use crate::common::Result;
use crate::dimensions::Dimension;
use crate::equation::Equation;
use crate::ordering_err;
use crate::symbolics::{AffineFunction, Expr, Indexed, split_affine};

/// Dimensions that must appear in exactly this relative order.
pub type Relation = stencil_core::Relation<Dimension>;

/// How one index expression contributes to the relation of its access.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum IndexClass {
    /// `a*d + b` for a single Dimension `d`
    Affine(Dimension),
    /// indirect indexing: the accesses used inside the index
    Nested(Vec<Indexed>),
    /// anything else: every Dimension in the index, by name
    Fallback(Vec<Dimension>),
}

pub(crate) fn classify_index(index: &Expr) -> IndexClass {
    if let Ok(AffineFunction {
        var: Some(Expr::Dim(dim)),
        ..
    }) = split_affine(index)
    {
        return IndexClass::Affine(dim);
    }

    if index.has_indexed() {
        return IndexClass::Nested(index.retrieve_indexed(false));
    }

    let dims: Vec<Dimension> = index.free_dims().into_iter().collect();
    if dims.is_empty() {
        debug!(index = %index, "index contributes no dimension to its relation");
    }
    IndexClass::Fallback(dims)
}

/// The relation implied by a single access, scanning its indices left to
/// right.
pub fn access_relation(indexed: &Indexed) -> Relation {
    let mut relation = Relation::new();
    for index in indexed.indices() {
        match classify_index(index) {
            IndexClass::Affine(dim) => relation.push(dim),
            IndexClass::Nested(accesses) => {
                for access in accesses.iter() {
                    relation.extend(access_relation(access));
                }
            }
            IndexClass::Fallback(dims) => relation.extend(dims),
        }
    }
    relation
}

/// Topologically sort the Dimensions of `eq`.
///
/// The result contains every Dimension used by the equation, every
/// Dimension of a Function it accesses (even one only indexed with
/// constants, as in `f[3]`), the implicit Dimensions, and every ancestor
/// of a derived Dimension.  Fails if the relations contradict each other.
pub fn dimension_sort(eq: &Equation) -> Result<PartialOrderTuple<Dimension>> {
    let mut relations: BTreeSet<Relation> = eq
        .retrieve_indexed(false)
        .iter()
        .map(access_relation)
        .filter(|relation| !relation.is_empty())
        .collect();

    if !eq.implicit_dims.is_empty() {
        relations.insert(eq.implicit_dims.iter().cloned().collect());
    }

    let mut extra = eq.free_dims();
    for indexed in eq.retrieve_indexed(true) {
        extra.extend(indexed.function().dimensions().iter().cloned());
    }
    extra.extend(eq.implicit_dims.iter().cloned());

    // close under `parent()` so every link of a derived chain is ordered
    let mut pending: Vec<Dimension> = extra.iter().cloned().collect();
    while let Some(dim) = pending.pop() {
        if let Some(parent) = dim.parent()
            && extra.insert(parent.clone())
        {
            pending.push(parent.clone());
        }
    }

    // (parent, child), never (child, parent): with `t` stepping over
    // `time` and relations `((time, t), (t, x, y), (x, y))`, reversing it
    // would let `x` precede `time`.
    let mut implicit: BTreeSet<Relation> = extra
        .iter()
        .filter_map(|dim| {
            dim.parent()
                .map(|parent| -> Relation { smallvec![parent.clone(), dim.clone()] })
        })
        .collect();

    // A sub-Dimension such as `xi` of `x` in `((time, xi), (x,))` yields
    // `(x, xi)` above, but only `(time, x)` keeps `x` after `time`.
    implicit.extend(
        relations
            .iter()
            .map(|relation| relation.iter().map(|dim| dim.root().clone()).collect::<Relation>()),
    );

    relations.extend(implicit);

    debug!(
        equation = %eq,
        dimensions = extra.len(),
        relations = relations.len(),
        "sorting dimensions"
    );

    match PartialOrderTuple::new(extra, relations) {
        Ok(order) => {
            debug!(order = %order, "canonical dimension order");
            Ok(order)
        }
        Err(err) => ordering_err!(
            CircularDependency,
            format!("{eq}: {}", err.details.unwrap_or_default())
        ),
    }
}
