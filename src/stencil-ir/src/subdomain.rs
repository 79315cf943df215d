// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::dimensions::{Dimension, Thickness};
use crate::symbolics::{Expr, Mapper};

#[derive(PartialEq, Eq, Hash)]
struct SubDomainData {
    name: String,
    dimension_map: BTreeMap<Dimension, Dimension>,
}

/// A named restriction of the computational region.  Each restricted axis
/// is replaced by a derived sub-Dimension; axes not mentioned are used
/// as-is.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SubDomain(Arc<SubDomainData>);

impl SubDomain {
    /// Creates one sub-Dimension per restricted axis, named
    /// `<axis>_<subdomain>`.
    pub fn new(name: &str, restrictions: &[(Dimension, Thickness)]) -> Self {
        let dimension_map = restrictions
            .iter()
            .map(|(dim, thickness)| {
                let sub_name = format!("{}_{}", dim.name(), name);
                (dim.clone(), Dimension::sub(&sub_name, dim, *thickness))
            })
            .collect();
        SubDomain::from_map(name, dimension_map)
    }

    /// A SubDomain over an explicit axis -> substitute-axis mapping.
    pub fn from_map(name: &str, dimension_map: BTreeMap<Dimension, Dimension>) -> Self {
        SubDomain(Arc::new(SubDomainData {
            name: name.to_owned(),
            dimension_map,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn dimension_map(&self) -> &BTreeMap<Dimension, Dimension> {
        &self.0.dimension_map
    }

    /// The substitute for `dim` in this SubDomain, if it is restricted.
    pub fn get(&self, dim: &Dimension) -> Option<&Dimension> {
        self.0.dimension_map.get(dim)
    }

    /// The dimension map as a substitution over expressions.
    pub fn mapper(&self) -> Mapper {
        self.0
            .dimension_map
            .iter()
            .map(|(from, to)| (Expr::from(from), Expr::from(to)))
            .collect()
    }
}

impl fmt::Debug for SubDomain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SubDomain")
            .field("name", &self.0.name)
            .field("dimension_map", &self.0.dimension_map)
            .finish()
    }
}
