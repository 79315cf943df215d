// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeMap;
use std::fmt;

use super::expr::Expr;
use super::number::Number;

/// `coeff * var + shift`.  `var` is None for a constant expression.
#[derive(Clone, Debug, PartialEq)]
pub struct AffineFunction {
    pub var: Option<Expr>,
    pub coeff: Number,
    pub shift: Number,
}

/// The expression is not affine in a single generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotAffine;

impl fmt::Display for NotAffine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "expression is not an affine function")
    }
}

impl std::error::Error for NotAffine {}

/// Split an expression that is affine in exactly one generator into its
/// components.  Generators are the non-numeric atoms of the expression:
/// symbols, Dimensions, calls and Indexed accesses.
///
/// `x + 2` and `3*x - 1` decompose with `var = x`; `x - 2*h_x` does not,
/// as it has two generators; `x*x` and `x**2` do not, as they aren't
/// linear.
pub fn split_affine(expr: &Expr) -> Result<AffineFunction, NotAffine> {
    let form = linear_form(expr).ok_or(NotAffine)?;
    let mut terms = form.terms.into_iter().filter(|(_, coeff)| !coeff.is_zero());

    match (terms.next(), terms.next()) {
        (None, _) => Ok(AffineFunction {
            var: None,
            coeff: Number::Int(0),
            shift: form.constant,
        }),
        (Some((var, coeff)), None) => Ok(AffineFunction {
            var: Some(var),
            coeff,
            shift: form.constant,
        }),
        (Some(_), Some(_)) => Err(NotAffine),
    }
}

struct LinearForm {
    terms: BTreeMap<Expr, Number>,
    constant: Number,
}

impl LinearForm {
    fn constant(n: Number) -> Self {
        LinearForm {
            terms: BTreeMap::new(),
            constant: n,
        }
    }

    fn generator(expr: &Expr) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(expr.clone(), Number::Int(1));
        LinearForm {
            terms,
            constant: Number::Int(0),
        }
    }

    fn is_constant(&self) -> bool {
        self.terms.values().all(|coeff| coeff.is_zero())
    }

    fn scale(mut self, by: Number) -> Self {
        for coeff in self.terms.values_mut() {
            *coeff = *coeff * by;
        }
        self.constant = self.constant * by;
        self
    }

    fn add(mut self, other: LinearForm) -> Self {
        for (generator, coeff) in other.terms {
            let entry = self.terms.entry(generator).or_insert(Number::Int(0));
            *entry = *entry + coeff;
        }
        self.constant = self.constant + other.constant;
        self
    }
}

fn linear_form(expr: &Expr) -> Option<LinearForm> {
    match expr {
        Expr::Int(_) | Expr::Float(_) => Number::from_expr(expr).map(LinearForm::constant),
        Expr::Symbol(_) | Expr::Dim(_) | Expr::Call(_) | Expr::Indexed(_) => {
            Some(LinearForm::generator(expr))
        }
        Expr::Add(terms) => {
            let mut acc = LinearForm::constant(Number::Int(0));
            for term in terms {
                acc = acc.add(linear_form(term)?);
            }
            Some(acc)
        }
        Expr::Mul(factors) => {
            let mut acc = LinearForm::constant(Number::Int(1));
            for factor in factors {
                let form = linear_form(factor)?;
                acc = if acc.is_constant() {
                    form.scale(acc.constant)
                } else if form.is_constant() {
                    acc.scale(form.constant)
                } else {
                    return None;
                };
            }
            Some(acc)
        }
        Expr::Pow(base, exp) => {
            let exp = linear_form(exp)?;
            if !exp.is_constant() {
                return None;
            }
            let exp = exp.constant;
            let base = linear_form(base)?;
            if base.is_constant() {
                base.constant.pow(exp).map(LinearForm::constant)
            } else if exp.is_one() {
                Some(base)
            } else if exp.is_zero() {
                Some(LinearForm::constant(Number::Int(1)))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::Dimension;
    use crate::function::Function;

    fn x() -> Expr {
        Expr::from(Dimension::space("x"))
    }

    #[test]
    fn test_single_generator() {
        let affine = split_affine(&(3 * x() - 1)).unwrap();
        assert_eq!(Some(x()), affine.var);
        assert_eq!(Number::Int(3), affine.coeff);
        assert_eq!(Number::Int(-1), affine.shift);

        let affine = split_affine(&x()).unwrap();
        assert_eq!(Some(x()), affine.var);
        assert_eq!(Number::Int(1), affine.coeff);
        assert_eq!(Number::Int(0), affine.shift);
    }

    #[test]
    fn test_constant() {
        let affine = split_affine(&Expr::Int(3)).unwrap();
        assert_eq!(None, affine.var);
        assert_eq!(Number::Int(3), affine.shift);

        // the generators cancel out
        let raw = Expr::Add(vec![x(), Expr::Mul(vec![Expr::Int(-1), x()]), Expr::Int(2)]);
        assert_eq!(None, split_affine(&raw).unwrap().var);
    }

    #[test]
    fn test_not_affine() {
        let h = Expr::symbol("h_x");
        assert_eq!(Err(NotAffine), split_affine(&(x() - 2 * h.clone())));
        assert_eq!(Err(NotAffine), split_affine(&(x() * h)));
        assert_eq!(Err(NotAffine), split_affine(&Expr::pow(x(), Expr::Int(2))));
    }

    #[test]
    fn test_access_is_a_generator() {
        let i = Dimension::new("i");
        let b = Function::new("b", vec![i.clone()]);
        let access = b.index(vec![Expr::from(&i)]);

        let affine = split_affine(&(access.clone() + 1)).unwrap();
        assert_eq!(Some(access), affine.var);
    }
}
