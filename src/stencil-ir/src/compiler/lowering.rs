// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Lowering rewrites symbolic accesses into storage-aligned Indexed form:
//!
//! 1. Function calls are indexified: `f(x - 2*h_x, y)` becomes
//!    `f[x - 2*h_x + 4, y + 4]` for a halo of 4.
//! 2. Explicit Indexed accesses are shifted the same way, nested accesses
//!    included.
//! 3. The subdomain's dimension map, if any, is applied to the indices.
//! 4. Caller supplied substitutions are applied last.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equation::Equation;
use crate::function::Function;
use crate::symbolics::{Call, Expr, Indexed, Mapper};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(default)]
pub struct LoweringOptions {
    /// Replace each axis' own grid spacing by 1 in call arguments, so that
    /// `f(x - 2*h_x)` addresses the point two cells to the left.
    pub unit_spacing: bool,
}

/// Something that can be lowered.  Lowering a collection yields a
/// collection of the same length and order.
pub trait Lower {
    type Output;

    fn lower_with(&self, lowering: &Lowering) -> Self::Output;
}

impl Lower for Equation {
    type Output = Equation;

    fn lower_with(&self, lowering: &Lowering) -> Equation {
        lowering.lower_equation(self)
    }
}

/// A bare expression has no subdomain, so no dimension map applies.
impl Lower for Expr {
    type Output = Expr;

    fn lower_with(&self, lowering: &Lowering) -> Expr {
        lowering.lower_expr(self, &Mapper::new())
    }
}

impl<T: Lower> Lower for [T] {
    type Output = Vec<T::Output>;

    fn lower_with(&self, lowering: &Lowering) -> Vec<T::Output> {
        self.iter().map(|item| item.lower_with(lowering)).collect()
    }
}

impl<T: Lower> Lower for Vec<T> {
    type Output = Vec<T::Output>;

    fn lower_with(&self, lowering: &Lowering) -> Vec<T::Output> {
        self.as_slice().lower_with(lowering)
    }
}

/// Lower `input`, applying `subs` afterwards if non-empty.  Substitutions
/// see the expression as written: the indices produced by the rewrite are
/// not searched again, so spacing symbols inside call arguments survive
/// unless [`LoweringOptions::unit_spacing`] is set.
pub fn lower_exprs<L: Lower + ?Sized>(input: &L, subs: &Mapper) -> L::Output {
    Lowering::new().with_subs(subs.clone()).lower(input)
}

#[derive(Clone, Debug, Default)]
pub struct Lowering {
    subs: Mapper,
    options: LoweringOptions,
}

impl Lowering {
    pub fn new() -> Self {
        Lowering::default()
    }

    pub fn with_subs(mut self, subs: Mapper) -> Self {
        self.subs = subs;
        self
    }

    pub fn with_options(mut self, options: LoweringOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LoweringOptions {
        &self.options
    }

    pub fn lower<L: Lower + ?Sized>(&self, input: &L) -> L::Output {
        input.lower_with(self)
    }

    /// Lower independent equations on the rayon thread pool.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn lower_all_par(&self, eqs: &[Equation]) -> Vec<Equation> {
        use rayon::prelude::*;

        eqs.par_iter().map(|eq| self.lower_equation(eq)).collect()
    }

    fn lower_equation(&self, eq: &Equation) -> Equation {
        let dimension_map = eq.dimension_map();
        let mapper = self.build_mapper(&eq.retrieve_calls(), &eq.retrieve_indexed(true), &dimension_map);

        debug!(
            equation = %eq,
            rewrites = mapper.len(),
            subdomain = eq.subdomain.as_ref().map(|s| s.name()).unwrap_or(""),
            "lowering equation"
        );

        if self.subs.is_empty() {
            eq.uxreplace(&mapper)
        } else {
            eq.xreplace(&self.merged(mapper))
        }
    }

    fn lower_expr(&self, expr: &Expr, dimension_map: &Mapper) -> Expr {
        let mapper = self.build_mapper(
            &expr.retrieve_calls(),
            &expr.retrieve_indexed(true),
            dimension_map,
        );

        if self.subs.is_empty() {
            expr.uxreplace(&mapper)
        } else {
            expr.xreplace(&self.merged(mapper))
        }
    }

    /// Caller substitutions take precedence over the lowering rewrites.
    fn merged(&self, mut mapper: Mapper) -> Mapper {
        mapper.extend(self.subs.iter().map(|(k, v)| (k.clone(), v.clone())));
        mapper
    }

    /// Index expressions are lowered on their own: without the caller's
    /// substitutions and without a dimension map, which the enclosing
    /// access applies once its indices are complete.
    fn nested(&self) -> Lowering {
        Lowering {
            subs: Mapper::new(),
            options: self.options.clone(),
        }
    }

    fn build_mapper(&self, calls: &[Call], accesses: &[Indexed], dimension_map: &Mapper) -> Mapper {
        let mut mapper = Mapper::with_capacity(calls.len() + accesses.len());
        for call in calls {
            mapper.insert(Expr::Call(call.clone()), self.indexify(call, dimension_map));
        }
        for access in accesses {
            mapper.insert(Expr::Indexed(access.clone()), self.realign(access, dimension_map));
        }
        mapper
    }

    /// `f(a0, a1, ...)` -> `f[lower(a0) + o0, lower(a1) + o1, ...]`.  Calls
    /// nested in the arguments are indexified by the recursive lowering.
    fn indexify(&self, call: &Call, dimension_map: &Mapper) -> Expr {
        let function = call.function();
        let indices = call
            .args()
            .iter()
            .enumerate()
            .map(|(axis, arg)| {
                let arg = if self.options.unit_spacing {
                    unit_spacing(function, axis, arg)
                } else {
                    arg.clone()
                };
                self.shifted(function, axis, &arg)
            })
            .collect();

        Expr::Indexed(Indexed::new(function.clone(), apply_dimension_map(indices, dimension_map)))
    }

    /// `f[i0, i1, ...]` -> `f[lower(i0) + o0, lower(i1) + o1, ...]`.
    fn realign(&self, access: &Indexed, dimension_map: &Mapper) -> Expr {
        let function = access.function();
        let indices = access
            .indices()
            .iter()
            .enumerate()
            .map(|(axis, index)| self.shifted(function, axis, index))
            .collect();

        Expr::Indexed(Indexed::new(function.clone(), apply_dimension_map(indices, dimension_map)))
    }

    fn shifted(&self, function: &Function, axis: usize, index: &Expr) -> Expr {
        let index = self.nested().lower_expr(index, &Mapper::new());
        index + function.left_offset(axis)
    }
}

fn apply_dimension_map(indices: Vec<Expr>, dimension_map: &Mapper) -> Vec<Expr> {
    if dimension_map.is_empty() {
        return indices;
    }
    indices.iter().map(|index| index.xreplace(dimension_map)).collect()
}

fn unit_spacing(function: &Function, axis: usize, arg: &Expr) -> Expr {
    match function.dimensions().get(axis) {
        Some(dim) => {
            let mapper: Mapper = [(Expr::from(dim.spacing()), Expr::Int(1))].into_iter().collect();
            arg.xreplace(&mapper)
        }
        None => arg.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::{Dimension, Thickness};
    use crate::function::FunctionKind;
    use crate::subdomain::SubDomain;

    fn haloed(name: &str, dims: Vec<Dimension>, halo: u32) -> Function {
        let ndim = dims.len();
        Function::build(
            name,
            FunctionKind::Function,
            dims,
            vec![(halo, halo); ndim],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_call_shift() {
        let x = Dimension::space("x");
        let h = Expr::from(x.spacing());
        let f = haloed("f", vec![x.clone()], 4);

        let lowered = lower_exprs(&f.call(vec![Expr::from(&x) - 2 * h.clone()]), &Mapper::new());
        assert_eq!(f.index(vec![Expr::from(&x) - 2 * h + 4]), lowered);
        assert_eq!("f[x - 2*h_x + 4]", format!("{lowered}"));
    }

    #[test]
    fn test_unit_spacing() {
        let x = Dimension::space("x");
        let y = Dimension::space("y");
        let f = haloed("f", vec![x.clone(), y.clone()], 4);

        let call = f.call(vec![
            Expr::from(&x) - 2 * Expr::from(x.spacing()),
            Expr::from(&y),
        ]);
        let lowering = Lowering::new().with_options(LoweringOptions { unit_spacing: true });
        assert_eq!("f[x + 2, y + 4]", format!("{}", lowering.lower(&call)));
    }

    #[test]
    fn test_unit_spacing_only_own_axis() {
        let x = Dimension::space("x");
        let y = Dimension::space("y");
        let f = haloed("f", vec![x.clone(), y.clone()], 0);

        // `h_y` is not the spacing of the first axis
        let call = f.call(vec![Expr::from(&x) + Expr::from(y.spacing()), Expr::from(&y)]);
        let lowering = Lowering::new().with_options(LoweringOptions { unit_spacing: true });
        assert_eq!("f[h_y + x, y]", format!("{}", lowering.lower(&call)));
    }

    #[test]
    fn test_indexed_shift() {
        let x = Dimension::space("x");
        let y = Dimension::space("y");
        let f = haloed("f", vec![x.clone(), y.clone()], 2);

        let access = f.index(vec![Expr::from(&x) + 1, Expr::Int(0)]);
        assert_eq!(
            f.index(vec![Expr::from(&x) + 3, Expr::Int(2)]),
            lower_exprs(&access, &Mapper::new())
        );
    }

    #[test]
    fn test_nested_access() {
        let x = Dimension::space("x");
        let i = Dimension::new("i");
        let a = haloed("a", vec![x.clone()], 4);
        let b = haloed("b", vec![i.clone()], 1);

        let access = a.index(vec![b.index(vec![Expr::from(&i)])]);
        let expected = a.index(vec![b.index(vec![Expr::from(&i) + 1]) + 4]);
        assert_eq!(expected, lower_exprs(&access, &Mapper::new()));
    }

    #[test]
    fn test_nested_call_in_access() {
        let x = Dimension::space("x");
        let i = Dimension::new("i");
        let a = haloed("a", vec![x.clone()], 4);
        let b = haloed("b", vec![i.clone()], 1);

        let access = a.index(vec![b.call(vec![Expr::from(&i)])]);
        let expected = a.index(vec![b.index(vec![Expr::from(&i) + 1]) + 4]);
        assert_eq!(expected, lower_exprs(&access, &Mapper::new()));
    }

    #[test]
    fn test_nested_call_in_call() {
        let x = Dimension::space("x");
        let f = haloed("f", vec![x.clone()], 2);
        let g = haloed("g", vec![x.clone()], 3);

        let call = f.call(vec![g.call(vec![Expr::from(&x)])]);
        let expected = f.index(vec![g.index(vec![Expr::from(&x) + 3]) + 2]);
        assert_eq!(expected, lower_exprs(&call, &Mapper::new()));
    }

    #[test]
    fn test_subdomain() {
        let time = Dimension::time("time");
        let x = Dimension::space("x");
        let u = haloed("u", vec![time.clone(), x.clone()], 2);
        let inner = SubDomain::new("inner", &[(x.clone(), Thickness::Middle(1, 1))]);
        let xi = inner.get(&x).unwrap().clone();

        let eq = Equation::new(
            u.call(vec![Expr::from(&time) + 1, Expr::from(&x)]),
            u.call(vec![Expr::from(&time), Expr::from(&x) + 1]),
        )
        .with_subdomain(inner);

        let lowered = lower_exprs(&eq, &Mapper::new());
        assert_eq!(
            u.index(vec![Expr::from(&time) + 3, Expr::from(&xi) + 2]),
            lowered.lhs
        );
        assert_eq!(
            u.index(vec![Expr::from(&time) + 2, Expr::from(&xi) + 3]),
            lowered.rhs
        );
        assert_eq!(eq.subdomain, lowered.subdomain);
    }

    #[test]
    fn test_subs_fold_constants() {
        let x = Dimension::space("x");
        let f = haloed("f", vec![x.clone()], 4);
        let raw = Expr::Add(vec![
            f.call(vec![Expr::from(&x)]),
            Expr::symbol("c"),
            Expr::Int(2),
        ]);
        let eq = Equation::new(Expr::symbol("s"), raw);

        let subs: Mapper = [(Expr::symbol("c"), Expr::Int(1))].into_iter().collect();
        let lowered = lower_exprs(&eq, &subs);
        assert_eq!(f.index(vec![Expr::from(&x) + 4]) + 3, lowered.rhs);
    }

    #[test]
    fn test_subs_skip_rewritten_indices() {
        let x = Dimension::space("x");
        let h = Expr::from(x.spacing());
        let f = haloed("f", vec![x.clone()], 4);
        let eq = Equation::new(Expr::symbol("s"), f.call(vec![Expr::from(&x) - h.clone()]) * h.clone());

        let subs: Mapper = [(h.clone(), Expr::Int(2))].into_iter().collect();
        let lowered = lower_exprs(&eq, &subs);
        assert_eq!(2 * f.index(vec![Expr::from(&x) - h + 4]), lowered.rhs);
    }

    #[test]
    fn test_subs_take_precedence() {
        let x = Dimension::space("x");
        let f = haloed("f", vec![x.clone()], 4);
        let call = f.call(vec![Expr::from(&x)]);
        let eq = Equation::new(Expr::symbol("s"), call.clone() + 1);

        let subs: Mapper = [(call, Expr::symbol("q"))].into_iter().collect();
        let lowered = lower_exprs(&eq, &subs);
        assert_eq!(Expr::symbol("q") + 1, lowered.rhs);
    }

    #[test]
    fn test_without_subs_structure_is_kept() {
        let x = Dimension::space("x");
        let f = haloed("f", vec![x.clone()], 1);
        // a sum nobody canonicalized
        let raw = Expr::Add(vec![
            f.index(vec![Expr::from(&x)]),
            Expr::Int(1),
            Expr::Int(2),
        ]);
        let lowered = lower_exprs(&raw, &Mapper::new());
        assert_eq!(
            Expr::Add(vec![
                f.index(vec![Expr::from(&x) + 1]),
                Expr::Int(1),
                Expr::Int(2),
            ]),
            lowered
        );
    }

    #[test]
    fn test_shape_is_preserved() {
        let x = Dimension::space("x");
        let f = haloed("f", vec![x.clone()], 1);
        let eqs = vec![
            Equation::new(Expr::symbol("a"), f.call(vec![Expr::from(&x)])),
            Equation::new(Expr::symbol("b"), Expr::Int(0)),
            Equation::new(Expr::symbol("c"), f.index(vec![Expr::from(&x)])),
        ];

        let lowered = lower_exprs(&eqs, &Mapper::new());
        assert_eq!(3, lowered.len());
        for (before, after) in eqs.iter().zip(lowered.iter()) {
            assert_eq!(before.lhs, after.lhs);
        }
        assert_eq!(Expr::Int(0), lowered[1].rhs);

        let single: Equation = lower_exprs(&eqs[0], &Mapper::new());
        assert_eq!(lowered[0], single);
        assert_eq!(lowered, lower_exprs(&eqs[..], &Mapper::new()));
    }

    #[test]
    fn test_lowering_is_repeatable() {
        let x = Dimension::space("x");
        let h = Expr::from(x.spacing());
        let f = haloed("f", vec![x.clone()], 4);
        let eq = Equation::new(
            f.index(vec![Expr::from(&x)]),
            f.call(vec![Expr::from(&x) - h.clone()]) * 2,
        );
        let subs: Mapper = [(h, Expr::from(0.5))].into_iter().collect();
        assert_eq!(lower_exprs(&eq, &subs), lower_exprs(&eq, &subs));
        assert_eq!(lower_exprs(&eq, &Mapper::new()), lower_exprs(&eq, &Mapper::new()));
    }

    #[test]
    fn test_constant_index() {
        let p = Dimension::new("p");
        let a = haloed("a", vec![p], 2);
        let access = a.index(vec![Expr::Int(3)]);
        assert_eq!(a.index(vec![Expr::Int(5)]), lower_exprs(&access, &Mapper::new()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let x = Dimension::space("x");
        let f = haloed("f", vec![x.clone()], 2);
        let eqs: Vec<Equation> = (0..16i64)
            .map(|k| Equation::new(Expr::symbol("s"), f.call(vec![Expr::from(&x) + k])))
            .collect();

        let lowering = Lowering::new();
        assert_eq!(lowering.lower(&eqs), lowering.lower_all_par(&eqs));
    }
}
