// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashMap;

use super::expr::{Call, Expr, Indexed};

/// A substitution from sub-terms to their replacements.
pub type Mapper = HashMap<Expr, Expr>;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Rebuild {
    /// rebuild changed nodes through the canonicalizing constructors
    Canonical,
    /// rebuild changed nodes exactly as they were
    Structural,
}

impl Expr {
    /// Replace every sub-term found in `mapper`, top-down: once a node
    /// matches, its replacement is not searched again.  Nodes whose
    /// children changed are rebuilt canonically, which folds constants
    /// exposed by the substitution.
    pub fn xreplace(&self, mapper: &Mapper) -> Expr {
        self.replace(mapper, Rebuild::Canonical)
    }

    /// Like [`Expr::xreplace`], but nodes on the path to a replacement are
    /// rebuilt with their existing structure and nothing is simplified.
    pub fn uxreplace(&self, mapper: &Mapper) -> Expr {
        self.replace(mapper, Rebuild::Structural)
    }

    fn replace(&self, mapper: &Mapper, mode: Rebuild) -> Expr {
        if mapper.is_empty() {
            return self.clone();
        }
        replace_node(self, mapper, mode).unwrap_or_else(|| self.clone())
    }
}

/// Returns None when nothing under `expr` was replaced.
fn replace_node(expr: &Expr, mapper: &Mapper, mode: Rebuild) -> Option<Expr> {
    if let Some(replacement) = mapper.get(expr) {
        return Some(replacement.clone());
    }

    match expr {
        Expr::Int(_) | Expr::Float(_) | Expr::Symbol(_) | Expr::Dim(_) => None,
        Expr::Call(call) => replace_all(call.args(), mapper, mode)
            .map(|args| Expr::Call(Call::new(call.function().clone(), args))),
        Expr::Indexed(indexed) => replace_all(indexed.indices(), mapper, mode)
            .map(|indices| Expr::Indexed(Indexed::new(indexed.function().clone(), indices))),
        Expr::Add(terms) => replace_all(terms, mapper, mode).map(|terms| match mode {
            Rebuild::Canonical => Expr::add_all(terms),
            Rebuild::Structural => Expr::Add(terms),
        }),
        Expr::Mul(factors) => replace_all(factors, mapper, mode).map(|factors| match mode {
            Rebuild::Canonical => Expr::mul_all(factors),
            Rebuild::Structural => Expr::Mul(factors),
        }),
        Expr::Pow(base, exp) => {
            let new_base = replace_node(base, mapper, mode);
            let new_exp = replace_node(exp, mapper, mode);
            if new_base.is_none() && new_exp.is_none() {
                return None;
            }
            let base = new_base.unwrap_or_else(|| base.as_ref().clone());
            let exp = new_exp.unwrap_or_else(|| exp.as_ref().clone());
            Some(match mode {
                Rebuild::Canonical => Expr::pow(base, exp),
                Rebuild::Structural => Expr::Pow(Box::new(base), Box::new(exp)),
            })
        }
    }
}

fn replace_all(exprs: &[Expr], mapper: &Mapper, mode: Rebuild) -> Option<Vec<Expr>> {
    let replaced: Vec<Option<Expr>> = exprs
        .iter()
        .map(|expr| replace_node(expr, mapper, mode))
        .collect();
    if replaced.iter().all(Option::is_none) {
        return None;
    }
    Some(
        replaced
            .into_iter()
            .zip(exprs)
            .map(|(new, old)| new.unwrap_or_else(|| old.clone()))
            .collect(),
    )
}
