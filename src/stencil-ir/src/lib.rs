// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub use stencil_core::PartialOrderTuple;

pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::compiler::{
    Lower, Lowering, LoweringOptions, Relation, access_relation, dimension_sort, lower_exprs,
};
pub use self::dimensions::{Dimension, DimensionKind, Thickness};
pub use self::equation::Equation;
pub use self::function::{Function, FunctionKind};
pub use self::grid::Grid;
pub use self::subdomain::SubDomain;
pub use self::symbolics::{Call, Expr, Indexed, Mapper, Symbol};

pub mod common;
mod compiler;
pub mod datamodel;
pub mod dimensions;
pub mod equation;
pub mod function;
pub mod grid;
#[cfg(test)]
mod ordering_proptest;
pub mod subdomain;
pub mod symbolics;
#[cfg(any(test, feature = "testing"))]
pub mod test_common;
