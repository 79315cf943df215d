// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::{BTreeSet, HashSet};

use super::expr::{Call, Expr, Indexed};
use crate::dimensions::Dimension;

impl Expr {
    /// Every Dimension occurring anywhere in the tree, including inside
    /// index expressions and call arguments.
    pub fn free_dims(&self) -> BTreeSet<Dimension> {
        let mut dims = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Expr::Dim(dim) => {
                    dims.insert(dim.clone());
                }
                _ => stack.extend(expr.args()),
            }
        }
        dims
    }

    /// The distinct Indexed nodes in the tree.
    ///
    /// With `deep` unset the search does not descend into the index
    /// expressions of an Indexed it has found.  With `deep` set it does,
    /// and nested accesses are returned before the access containing them.
    pub fn retrieve_indexed(&self, deep: bool) -> Vec<Indexed> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        collect_indexed(self, deep, &mut found, &mut seen);
        found
    }

    /// The distinct Function calls in the tree, searching through call
    /// arguments and index expressions; inner calls come first.
    pub fn retrieve_calls(&self) -> Vec<Call> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        collect_calls(self, &mut found, &mut seen);
        found
    }

    /// True if an Indexed node occurs anywhere in the tree.
    pub fn has_indexed(&self) -> bool {
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Expr::Indexed(_) => return true,
                _ => stack.extend(expr.args()),
            }
        }
        false
    }
}

fn collect_indexed(expr: &Expr, deep: bool, found: &mut Vec<Indexed>, seen: &mut HashSet<Indexed>) {
    match expr {
        Expr::Indexed(indexed) => {
            if deep {
                for index in indexed.indices() {
                    collect_indexed(index, deep, found, seen);
                }
            }
            if seen.insert(indexed.clone()) {
                found.push(indexed.clone());
            }
        }
        _ => {
            for arg in expr.args() {
                collect_indexed(arg, deep, found, seen);
            }
        }
    }
}

fn collect_calls(expr: &Expr, found: &mut Vec<Call>, seen: &mut HashSet<Call>) {
    for arg in expr.args() {
        collect_calls(arg, found, seen);
    }
    if let Expr::Call(call) = expr
        && seen.insert(call.clone())
    {
        found.push(call.clone());
    }
}
