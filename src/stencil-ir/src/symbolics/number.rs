// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::ops::{Add, Mul, Neg};

use float_cmp::approx_eq;
use ordered_float::OrderedFloat;

use super::expr::Expr;

/// A numeric constant as seen by constant folding.  Integer arithmetic
/// falls back to floating point on overflow.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn from_expr(expr: &Expr) -> Option<Number> {
        match expr {
            Expr::Int(n) => Some(Number::Int(*n)),
            Expr::Float(n) => Some(Number::Float(n.0)),
            _ => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(n) => n == 0.0,
        }
    }

    pub fn is_one(self) -> bool {
        match self {
            Number::Int(n) => n == 1,
            Number::Float(n) => n == 1.0,
        }
    }

    pub fn is_negative(self) -> bool {
        match self {
            Number::Int(n) => n < 0,
            Number::Float(n) => n < 0.0,
        }
    }

    /// `self ** exp`, or None if the result isn't a finite number.
    pub fn pow(self, exp: Number) -> Option<Number> {
        let result = match (self, exp) {
            (Number::Int(base), Number::Int(exp)) if exp >= 0 => {
                match u32::try_from(exp).ok().and_then(|exp| base.checked_pow(exp)) {
                    Some(n) => Number::Int(n),
                    None => Number::Float((base as f64).powf(exp as f64)),
                }
            }
            (base, exp) => Number::Float(base.as_f64().powf(exp.as_f64())),
        };
        match result {
            Number::Float(n) if !n.is_finite() => None,
            result => Some(result),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => approx_eq!(f64, a.as_f64(), b.as_f64()),
        }
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_add(b) {
                Some(n) => Number::Int(n),
                None => Number::Float(a as f64 + b as f64),
            },
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_mul(b) {
                Some(n) => Number::Int(n),
                None => Number::Float(a as f64 * b as f64),
            },
            (a, b) => Number::Float(a.as_f64() * b.as_f64()),
        }
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Int(n) => match n.checked_neg() {
                Some(n) => Number::Int(n),
                None => Number::Float(-(n as f64)),
            },
            Number::Float(n) => Number::Float(-n),
        }
    }
}

impl From<Number> for Expr {
    fn from(n: Number) -> Expr {
        match n {
            Number::Int(n) => Expr::Int(n),
            Number::Float(n) => Expr::Float(OrderedFloat(n)),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Float(n) => write!(f, "{n:?}"),
        }
    }
}
