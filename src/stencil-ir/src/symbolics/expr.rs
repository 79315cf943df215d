// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

use ordered_float::OrderedFloat;

use super::Symbol;
use super::number::Number;
use crate::dimensions::Dimension;
use crate::function::Function;

/// An access to a Function at explicit per-axis index expressions,
/// `f[x + 4, y]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Indexed {
    function: Function,
    indices: Vec<Expr>,
}

impl Indexed {
    pub fn new(function: Function, indices: Vec<Expr>) -> Self {
        Indexed { function, indices }
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn indices(&self) -> &[Expr] {
        &self.indices
    }
}

/// A Function used with call notation, `f(x - 2*h_x, y)`: arguments are
/// logical (domain) coordinates, not yet aligned to storage.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Call {
    function: Function,
    args: Vec<Expr>,
}

impl Call {
    pub fn new(function: Function, args: Vec<Expr>) -> Self {
        Call { function, args }
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn args(&self) -> &[Expr] {
        &self.args
    }
}

/// A symbolic expression.
///
/// `Add`, `Mul` and `Pow` should normally be built through
/// [`Expr::add_all`], [`Expr::mul_all`] and [`Expr::pow`] (or the operator
/// overloads), which keep the tree canonical: nested sums and products are
/// flattened, numeric constants are folded, like terms are collected and
/// operands are sorted.  Building the variants directly skips all of that,
/// which is what structure-preserving substitution relies on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Expr {
    Int(i64),
    Float(OrderedFloat<f64>),
    Symbol(Symbol),
    Dim(Dimension),
    Call(Call),
    Indexed(Indexed),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn symbol(name: &str) -> Expr {
        Expr::Symbol(Symbol::new(name))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Expr::Int(_) | Expr::Float(_))
    }

    /// The direct children of this node.
    pub fn args(&self) -> Vec<&Expr> {
        match self {
            Expr::Int(_) | Expr::Float(_) | Expr::Symbol(_) | Expr::Dim(_) => vec![],
            Expr::Call(call) => call.args.iter().collect(),
            Expr::Indexed(indexed) => indexed.indices.iter().collect(),
            Expr::Add(terms) | Expr::Mul(terms) => terms.iter().collect(),
            Expr::Pow(base, exp) => vec![base.as_ref(), exp.as_ref()],
        }
    }

    pub fn add_all<I: IntoIterator<Item = Expr>>(terms: I) -> Expr {
        let mut pending: Vec<Expr> = terms.into_iter().collect();
        let mut constant = Number::Int(0);
        let mut collected: BTreeMap<Expr, Number> = BTreeMap::new();

        while let Some(term) = pending.pop() {
            // products built structurally may still hide a constant
            let term = match term {
                Expr::Mul(factors) => Expr::mul_all(factors),
                term => term,
            };
            if let Expr::Add(inner) = term {
                pending.extend(inner);
                continue;
            }
            if let Some(n) = Number::from_expr(&term) {
                constant = constant + n;
                continue;
            }
            let (coeff, rest) = term.as_coeff_mul();
            let entry = collected.entry(rest).or_insert(Number::Int(0));
            *entry = *entry + coeff;
        }

        let mut out: Vec<Expr> = collected
            .into_iter()
            .filter(|(_, coeff)| !coeff.is_zero())
            .map(|(rest, coeff)| Expr::scaled(coeff, rest))
            .collect();
        if !constant.is_zero() {
            out.push(constant.into());
        }

        match out.len() {
            0 => Expr::Int(0),
            1 => out.remove(0),
            _ => {
                out.sort();
                Expr::Add(out)
            }
        }
    }

    pub fn mul_all<I: IntoIterator<Item = Expr>>(factors: I) -> Expr {
        let mut pending: Vec<Expr> = factors.into_iter().collect();
        let mut coeff = Number::Int(1);
        let mut rest: Vec<Expr> = Vec::with_capacity(pending.len());

        while let Some(factor) = pending.pop() {
            if let Expr::Mul(inner) = factor {
                pending.extend(inner);
                continue;
            }
            match Number::from_expr(&factor) {
                Some(n) => coeff = coeff * n,
                None => rest.push(factor),
            }
        }

        if coeff.is_zero() {
            return Expr::Int(0);
        }
        if rest.is_empty() {
            return coeff.into();
        }
        if coeff.is_one() {
            if rest.len() == 1 {
                return rest.remove(0);
            }
            rest.sort();
            return Expr::Mul(rest);
        }
        // a numeric coefficient distributes over a single sum
        if rest.len() == 1
            && let Expr::Add(terms) = &rest[0]
        {
            return Expr::add_all(terms.iter().map(|t| Expr::scaled(coeff, t.clone())));
        }

        rest.sort();
        rest.insert(0, coeff.into());
        Expr::Mul(rest)
    }

    pub fn pow(base: Expr, exp: Expr) -> Expr {
        if let (Some(b), Some(e)) = (Number::from_expr(&base), Number::from_expr(&exp))
            && let Some(n) = b.pow(e)
        {
            return n.into();
        }
        match Number::from_expr(&exp) {
            Some(e) if e.is_one() => base,
            Some(e) if e.is_zero() => Expr::Int(1),
            _ => Expr::Pow(Box::new(base), Box::new(exp)),
        }
    }

    /// Split a term into its numeric coefficient and the remaining factors.
    pub fn as_coeff_mul(&self) -> (Number, Expr) {
        if let Expr::Mul(factors) = self
            && let Some((first, rest)) = factors.split_first()
            && let Some(coeff) = Number::from_expr(first)
        {
            let rest = match rest.len() {
                1 => rest[0].clone(),
                _ => Expr::Mul(rest.to_vec()),
            };
            return (coeff, rest);
        }
        (Number::Int(1), self.clone())
    }

    fn scaled(coeff: Number, term: Expr) -> Expr {
        if coeff.is_one() {
            term
        } else {
            Expr::mul_all([coeff.into(), term])
        }
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Expr {
        Expr::Int(n)
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Expr {
        Expr::Float(OrderedFloat(n))
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Expr {
        Expr::Symbol(symbol)
    }
}

impl From<Dimension> for Expr {
    fn from(dim: Dimension) -> Expr {
        Expr::Dim(dim)
    }
}

impl From<&Dimension> for Expr {
    fn from(dim: &Dimension) -> Expr {
        Expr::Dim(dim.clone())
    }
}

impl From<Indexed> for Expr {
    fn from(indexed: Indexed) -> Expr {
        Expr::Indexed(indexed)
    }
}

impl From<Call> for Expr {
    fn from(call: Call) -> Expr {
        Expr::Call(call)
    }
}

impl<T: Into<Expr>> Add<T> for Expr {
    type Output = Expr;

    fn add(self, rhs: T) -> Expr {
        Expr::add_all([self, rhs.into()])
    }
}

impl<T: Into<Expr>> Sub<T> for Expr {
    type Output = Expr;

    fn sub(self, rhs: T) -> Expr {
        Expr::add_all([self, -rhs.into()])
    }
}

impl<T: Into<Expr>> Mul<T> for Expr {
    type Output = Expr;

    fn mul(self, rhs: T) -> Expr {
        Expr::mul_all([self, rhs.into()])
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::mul_all([Expr::Int(-1), self])
    }
}

impl Add<Expr> for i64 {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::add_all([Expr::Int(self), rhs])
    }
}

impl Mul<Expr> for i64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::mul_all([Expr::Int(self), rhs])
    }
}
