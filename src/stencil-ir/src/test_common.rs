// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Common test infrastructure for building test grids
//!
//! This module provides a builder-based API for declaring Dimensions,
//! Functions and SubDomains by name, going through the same datamodel
//! resolution a JSON description would.

use crate::compiler::LoweringOptions;
use crate::datamodel;
use crate::dimensions::{Dimension, Thickness};
use crate::function::Function;
use crate::grid::Grid;
use crate::subdomain::SubDomain;
use crate::symbolics::Expr;

/// Builder for test grids
#[derive(Clone, Debug, Default)]
pub struct TestGrid {
    pub dimensions: Vec<datamodel::Dimension>,
    pub functions: Vec<datamodel::Function>,
    pub subdomains: Vec<datamodel::SubDomain>,
    pub lowering: LoweringOptions,
}

impl TestGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn dimension_decl(
        mut self,
        name: &str,
        kind: datamodel::DimensionKind,
        parent: Option<&str>,
    ) -> Self {
        self.dimensions.push(datamodel::Dimension {
            name: name.to_string(),
            kind,
            parent: parent.map(|p| p.to_string()),
        });
        self
    }

    /// Add a plain index Dimension
    pub fn dimension(self, name: &str) -> Self {
        self.dimension_decl(name, datamodel::DimensionKind::Basic, None)
    }

    pub fn space(self, name: &str) -> Self {
        self.dimension_decl(name, datamodel::DimensionKind::Space, None)
    }

    pub fn time(self, name: &str) -> Self {
        self.dimension_decl(name, datamodel::DimensionKind::Time, None)
    }

    pub fn stepping(self, name: &str, parent: &str) -> Self {
        self.dimension_decl(name, datamodel::DimensionKind::Stepping, Some(parent))
    }

    pub fn conditional(self, name: &str, parent: &str, factor: u32) -> Self {
        self.dimension_decl(
            name,
            datamodel::DimensionKind::Conditional { factor },
            Some(parent),
        )
    }

    /// Add a Function with the same halo on both sides of every axis
    pub fn function(self, name: &str, dims: &[&str], halo: u32) -> Self {
        let extents = vec![(halo, halo); dims.len()];
        self.function_with(name, dims, &extents, &[])
    }

    /// Add a Function with explicit per-axis halo and padding
    pub fn function_with(
        mut self,
        name: &str,
        dims: &[&str],
        halo: &[(u32, u32)],
        padding: &[(u32, u32)],
    ) -> Self {
        self.functions.push(datamodel::Function {
            name: name.to_string(),
            kind: datamodel::FunctionKind::Function,
            dimensions: dims.iter().map(|d| d.to_string()).collect(),
            halo: halo.iter().map(|(l, r)| [*l, *r]).collect(),
            padding: padding.iter().map(|(l, r)| [*l, *r]).collect(),
        });
        self
    }

    pub fn subdomain(mut self, name: &str, restrictions: &[(&str, Thickness)]) -> Self {
        let dimensions = restrictions
            .iter()
            .map(|(dim, thickness)| datamodel::SubDomainDimension {
                name: dim.to_string(),
                thickness: match *thickness {
                    Thickness::Middle(left, right) => datamodel::Thickness::Middle { left, right },
                    Thickness::Left(n) => datamodel::Thickness::Left(n),
                    Thickness::Right(n) => datamodel::Thickness::Right(n),
                },
            })
            .collect();
        self.subdomains.push(datamodel::SubDomain {
            name: name.to_string(),
            dimensions,
        });
        self
    }

    pub fn unit_spacing(mut self) -> Self {
        self.lowering.unit_spacing = true;
        self
    }

    pub fn build_datamodel(&self) -> datamodel::Grid {
        datamodel::Grid {
            dimensions: self.dimensions.clone(),
            functions: self.functions.clone(),
            subdomains: self.subdomains.clone(),
            lowering: self.lowering.clone(),
        }
    }

    /// Resolve the grid, panicking on an invalid declaration
    pub fn build(&self) -> TestFixture {
        match Grid::from_datamodel(&self.build_datamodel()) {
            Ok(grid) => TestFixture { grid },
            Err(err) => panic!("invalid test grid: {err}"),
        }
    }
}

/// A resolved grid with panicking lookups, for terse tests
pub struct TestFixture {
    pub grid: Grid,
}

impl TestFixture {
    pub fn dim(&self, name: &str) -> Dimension {
        match self.grid.dimension(name) {
            Some(dim) => dim.clone(),
            None => panic!("unknown dimension {name}"),
        }
    }

    /// The Dimension `name` as an expression
    pub fn d(&self, name: &str) -> Expr {
        Expr::from(self.dim(name))
    }

    pub fn func(&self, name: &str) -> Function {
        match self.grid.function(name) {
            Some(function) => function.clone(),
            None => panic!("unknown function {name}"),
        }
    }

    pub fn subdomain(&self, name: &str) -> SubDomain {
        match self.grid.subdomain(name) {
            Some(subdomain) => subdomain.clone(),
            None => panic!("unknown subdomain {name}"),
        }
    }

    /// The grid spacing of Dimension `name`
    pub fn h(&self, name: &str) -> Expr {
        Expr::from(self.dim(name).spacing())
    }
}

#[test]
fn test_builder() {
    let fixture = TestGrid::new()
        .time("time")
        .stepping("t", "time")
        .space("x")
        .function("u", &["time", "x"], 2)
        .subdomain("inner", &[("x", Thickness::Middle(1, 1))])
        .build();

    assert_eq!("time", fixture.dim("t").root().name());
    assert_eq!(2, fixture.func("u").left_offset(1));
    assert_eq!(Expr::symbol("h_x"), fixture.h("x"));
    let inner = fixture.subdomain("inner");
    assert_eq!("x_inner", inner.get(&fixture.dim("x")).unwrap().name());
}
