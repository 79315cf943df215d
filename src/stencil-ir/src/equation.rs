// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeSet;
use std::fmt;

use crate::dimensions::Dimension;
use crate::subdomain::SubDomain;
use crate::symbolics::{Call, Expr, Indexed, Mapper};

/// `lhs = rhs`, plus the axes it iterates over without indexing them
/// and the region it is restricted to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
    pub implicit_dims: Vec<Dimension>,
    pub subdomain: Option<SubDomain>,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Equation {
            lhs,
            rhs,
            implicit_dims: vec![],
            subdomain: None,
        }
    }

    pub fn with_implicit_dims(mut self, dims: Vec<Dimension>) -> Self {
        self.implicit_dims = dims;
        self
    }

    pub fn with_subdomain(mut self, subdomain: SubDomain) -> Self {
        self.subdomain = Some(subdomain);
        self
    }

    pub fn free_dims(&self) -> BTreeSet<Dimension> {
        let mut dims = self.lhs.free_dims();
        dims.extend(self.rhs.free_dims());
        dims
    }

    /// Indexed nodes of both sides, lhs first, without duplicates.
    pub fn retrieve_indexed(&self, deep: bool) -> Vec<Indexed> {
        let mut found = self.lhs.retrieve_indexed(deep);
        for indexed in self.rhs.retrieve_indexed(deep) {
            if !found.contains(&indexed) {
                found.push(indexed);
            }
        }
        found
    }

    pub fn retrieve_calls(&self) -> Vec<Call> {
        let mut found = self.lhs.retrieve_calls();
        for call in self.rhs.retrieve_calls() {
            if !found.contains(&call) {
                found.push(call);
            }
        }
        found
    }

    /// The subdomain's dimension map as a substitution; empty without a
    /// subdomain.
    pub fn dimension_map(&self) -> Mapper {
        self.subdomain
            .as_ref()
            .map(SubDomain::mapper)
            .unwrap_or_default()
    }

    pub fn xreplace(&self, mapper: &Mapper) -> Equation {
        Equation {
            lhs: self.lhs.xreplace(mapper),
            rhs: self.rhs.xreplace(mapper),
            implicit_dims: self.implicit_dims.clone(),
            subdomain: self.subdomain.clone(),
        }
    }

    pub fn uxreplace(&self, mapper: &Mapper) -> Equation {
        Equation {
            lhs: self.lhs.uxreplace(mapper),
            rhs: self.rhs.uxreplace(mapper),
            implicit_dims: self.implicit_dims.clone(),
            subdomain: self.subdomain.clone(),
        }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Eq({}, {})", self.lhs, self.rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::Thickness;
    use crate::function::Function;

    #[test]
    fn test_queries() {
        let time = Dimension::time("time");
        let x = Dimension::space("x");
        let u = Function::new("u", vec![time.clone(), x.clone()]);

        let eq = Equation::new(
            u.index(vec![Expr::from(&time) + 1, Expr::from(&x)]),
            u.index(vec![Expr::from(&time), Expr::from(&x)]) + u.call(vec![Expr::from(&time), Expr::from(&x) + 1]),
        );

        assert_eq!(2, eq.retrieve_indexed(false).len());
        assert_eq!(1, eq.retrieve_calls().len());
        let dims: Vec<_> = eq.free_dims().into_iter().collect();
        assert_eq!(vec![time, x], dims);
        assert!(eq.dimension_map().is_empty());
        assert_eq!("Eq(u[time + 1, x], u(time, x + 1) + u[time, x])", format!("{eq}"));
    }

    #[test]
    fn test_dimension_map() {
        let x = Dimension::space("x");
        let inner = SubDomain::new("inner", &[(x.clone(), Thickness::Middle(2, 2))]);
        let eq = Equation::new(Expr::from(&x), Expr::Int(0)).with_subdomain(inner);
        assert_eq!(1, eq.dimension_map().len());
    }
}
