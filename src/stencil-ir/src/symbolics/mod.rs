// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The small symbolic layer the lowering pass is written against: an
//! expression tree with canonicalizing constructors, tree queries,
//! two substitution flavors and affine decomposition.

use std::fmt;
use std::sync::Arc;

mod affine;
mod expr;
mod number;
mod pretty;
mod search;
mod subs;

pub use self::affine::{AffineFunction, NotAffine, split_affine};
pub use self::expr::{Call, Expr, Indexed};
pub use self::number::Number;
pub use self::subs::Mapper;

/// A plain scalar symbol, such as a grid spacing `h_x`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
