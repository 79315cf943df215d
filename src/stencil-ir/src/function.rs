// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::common::Result;
use crate::config_err;
use crate::dimensions::Dimension;
use crate::symbolics::{Call, Expr, Indexed};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionKind {
    Function,
    TimeFunction,
    Array,
}

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord)]
struct FunctionData {
    name: String,
    kind: FunctionKind,
    dimensions: Vec<Dimension>,
    halo: Vec<(u32, u32)>,
    padding: Vec<(u32, u32)>,
}

/// An array-like symbolic object defined over an ordered set of
/// Dimensions.  Storage along each axis is laid out as
/// `[left padding][left halo][domain][right halo][right padding]`.
#[derive(Clone)]
pub struct Function(Arc<FunctionData>);

impl Function {
    /// A Function with no halo and no padding.
    pub fn new(name: &str, dimensions: Vec<Dimension>) -> Self {
        let ndim = dimensions.len();
        Function(Arc::new(FunctionData {
            name: name.to_owned(),
            kind: FunctionKind::Function,
            dimensions,
            halo: vec![(0, 0); ndim],
            padding: vec![(0, 0); ndim],
        }))
    }

    /// `halo` and `padding` give the `(left, right)` extents per axis; an
    /// empty vector means zero on every axis.
    pub fn build(
        name: &str,
        kind: FunctionKind,
        dimensions: Vec<Dimension>,
        halo: Vec<(u32, u32)>,
        padding: Vec<(u32, u32)>,
    ) -> Result<Self> {
        let ndim = dimensions.len();
        let halo = if halo.is_empty() { vec![(0, 0); ndim] } else { halo };
        let padding = if padding.is_empty() {
            vec![(0, 0); ndim]
        } else {
            padding
        };

        if halo.len() != ndim || padding.len() != ndim {
            return config_err!(
                MismatchedDimensions,
                format!(
                    "function {name} has {ndim} dimensions, but {} halo and {} padding entries",
                    halo.len(),
                    padding.len()
                )
            );
        }

        Ok(Function(Arc::new(FunctionData {
            name: name.to_owned(),
            kind,
            dimensions,
            halo,
            padding,
        })))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> FunctionKind {
        self.0.kind
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.0.dimensions
    }

    pub fn halo(&self) -> &[(u32, u32)] {
        &self.0.halo
    }

    pub fn padding(&self) -> &[(u32, u32)] {
        &self.0.padding
    }

    /// Distance from the start of storage to the first domain point along
    /// `axis`.  Zero for an axis the Function doesn't have.
    pub fn left_offset(&self, axis: usize) -> i64 {
        let halo = self.0.halo.get(axis).map_or(0, |h| h.0);
        let padding = self.0.padding.get(axis).map_or(0, |p| p.0);
        i64::from(halo) + i64::from(padding)
    }

    /// `f(args...)`, in domain coordinates.
    pub fn call(&self, args: Vec<Expr>) -> Expr {
        Expr::Call(Call::new(self.clone(), args))
    }

    /// `f[indices...]`, in storage coordinates.
    pub fn index(&self, indices: Vec<Expr>) -> Expr {
        Expr::Indexed(Indexed::new(self.clone(), indices))
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Function {}

impl Hash for Function {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl PartialOrd for Function {
    fn partial_cmp(&self, other: &Function) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Function {
    fn cmp(&self, other: &Function) -> std::cmp::Ordering {
        if Arc::ptr_eq(&self.0, &other.0) {
            return std::cmp::Ordering::Equal;
        }
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let dims: Vec<_> = self.0.dimensions.iter().map(|d| d.name()).collect();
        write!(f, "{}({})", self.0.name, dims.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ErrorCode, ErrorKind};

    #[test]
    fn test_left_offset() {
        let x = Dimension::space("x");
        let y = Dimension::space("y");
        let f = Function::build(
            "f",
            FunctionKind::Function,
            vec![x, y],
            vec![(4, 4), (2, 2)],
            vec![(0, 0), (1, 3)],
        )
        .unwrap();

        assert_eq!(4, f.left_offset(0));
        assert_eq!(3, f.left_offset(1));
        assert_eq!(0, f.left_offset(2));
        assert_eq!("f(x, y)", format!("{f}"));
    }

    #[test]
    fn test_build_defaults_to_zero() {
        let f = Function::build(
            "f",
            FunctionKind::Array,
            vec![Dimension::new("i")],
            vec![],
            vec![],
        )
        .unwrap();
        assert_eq!(&[(0, 0)], f.halo());
        assert_eq!(&[(0, 0)], f.padding());
        assert_eq!(0, f.left_offset(0));
    }

    #[test]
    fn test_build_mismatched() {
        let err = Function::build(
            "f",
            FunctionKind::Function,
            vec![Dimension::space("x")],
            vec![(1, 1), (1, 1)],
            vec![],
        )
        .unwrap_err();
        assert_eq!(ErrorKind::Config, err.kind);
        assert_eq!(ErrorCode::MismatchedDimensions, err.code);
    }
}
