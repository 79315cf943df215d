// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

mod lowering;
mod ordering;

pub use self::lowering::{Lower, Lowering, LoweringOptions, lower_exprs};
pub use self::ordering::{Relation, access_relation, dimension_sort};
