// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::symbolics::Symbol;

/// Extent of a sub-region along one axis, relative to the full axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Thickness {
    /// everything except `left` points at the start and `right` at the end
    Middle(u32, u32),
    /// the first `n` points
    Left(u32),
    /// the last `n` points
    Right(u32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DimensionKind {
    Basic,
    Space,
    Time,
    /// iterates its parent modulo the buffer size, e.g. `t` over `time`
    Stepping,
    /// a restriction of the parent to a sub-region
    Sub(Thickness),
    /// a sub-sampling of the parent by `factor`
    Conditional { factor: u32 },
}

impl DimensionKind {
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            DimensionKind::Stepping | DimensionKind::Sub(_) | DimensionKind::Conditional { .. }
        )
    }
}

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord)]
struct DimensionData {
    name: String,
    kind: DimensionKind,
    parent: Option<Dimension>,
}

/// A named iteration axis.
///
/// Dimensions are shared, immutable handles.  Derived Dimensions point at
/// their parent; a parent never knows about its children.  Equality,
/// hashing and ordering look at the name first, so sorting a collection of
/// Dimensions sorts it by name.
#[derive(Clone)]
pub struct Dimension(Arc<DimensionData>);

impl Dimension {
    fn build(name: &str, kind: DimensionKind, parent: Option<Dimension>) -> Self {
        Dimension(Arc::new(DimensionData {
            name: name.to_owned(),
            kind,
            parent,
        }))
    }

    pub fn new(name: &str) -> Self {
        Dimension::build(name, DimensionKind::Basic, None)
    }

    pub fn space(name: &str) -> Self {
        Dimension::build(name, DimensionKind::Space, None)
    }

    pub fn time(name: &str) -> Self {
        Dimension::build(name, DimensionKind::Time, None)
    }

    pub fn stepping(name: &str, parent: &Dimension) -> Self {
        Dimension::build(name, DimensionKind::Stepping, Some(parent.clone()))
    }

    pub fn sub(name: &str, parent: &Dimension, thickness: Thickness) -> Self {
        Dimension::build(name, DimensionKind::Sub(thickness), Some(parent.clone()))
    }

    pub fn conditional(name: &str, parent: &Dimension, factor: u32) -> Self {
        Dimension::build(
            name,
            DimensionKind::Conditional { factor },
            Some(parent.clone()),
        )
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> DimensionKind {
        self.0.kind
    }

    pub fn parent(&self) -> Option<&Dimension> {
        self.0.parent.as_ref()
    }

    pub fn is_derived(&self) -> bool {
        self.0.parent.is_some()
    }

    /// The topmost ancestor, or self for a non-derived Dimension.
    pub fn root(&self) -> &Dimension {
        let mut dim = self;
        while let Some(parent) = dim.parent() {
            dim = parent;
        }
        dim
    }

    /// The grid spacing symbol along this axis, shared with the root.
    pub fn spacing(&self) -> Symbol {
        Symbol::new(&format!("h_{}", self.root().name()))
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Dimension) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Dimension {}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl PartialOrd for Dimension {
    fn partial_cmp(&self, other: &Dimension) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dimension {
    fn cmp(&self, other: &Dimension) -> std::cmp::Ordering {
        if Arc::ptr_eq(&self.0, &other.0) {
            return std::cmp::Ordering::Equal;
        }
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}
